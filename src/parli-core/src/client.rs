//! Client for the hosted text-generation endpoint.
//!
//! One `generateContent` call shape serves every request kind; callers
//! differ only in prompt content and in which validator profile they apply
//! to the returned text. Failures are classified and terminal for the call
//! that raised them. Retry, if any, is the caller's decision.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ApiErrorKind, DebateError};
use crate::prompts::Prompt;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Credential and model selection for the generation endpoint.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub model: String,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
    candidate_count: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 8192,
            candidate_count: 1,
        }
    }
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: "BLOCK_MEDIUM_AND_ABOVE",
    })
    .collect()
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: ErrorDetail,
}

#[derive(Deserialize, Default)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Client holding an explicit, replaceable configuration. No global state:
/// sessions sharing a client share exactly the configuration they were
/// handed, nothing else.
pub struct GenerationClient {
    config: Option<ApiConfig>,
    http: reqwest::Client,
    base_url: String,
}

impl GenerationClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config: Some(config),
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// A client with no credential. Every generation fails until
    /// [`reconfigure`](Self::reconfigure) is called.
    pub fn unconfigured() -> Self {
        Self {
            config: None,
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point at a different endpoint. Used by tests and self-hosted proxies.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn reconfigure(&mut self, config: ApiConfig) {
        self.config = Some(config);
    }

    pub fn clear(&mut self) {
        self.config = None;
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    fn config(&self) -> Result<&ApiConfig, DebateError> {
        let config = self.config.as_ref().ok_or(DebateError::MissingApiKey)?;
        if config.api_key.is_empty() {
            return Err(DebateError::MissingApiKey);
        }
        // Superficial shape check before any network traffic.
        if !config.api_key.starts_with("AIzaSy") {
            return Err(DebateError::MalformedApiKey);
        }
        Ok(config)
    }

    /// Send one generation request and return the raw text.
    pub async fn generate(&self, prompt: &Prompt) -> Result<String, DebateError> {
        let config = self.config()?;

        let combined = if prompt.system.is_empty() {
            prompt.body.clone()
        } else {
            format!("{}\n\n{}", prompt.system, prompt.body)
        };

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &combined }],
            }],
            generation_config: GenerationConfig::default(),
            safety_settings: safety_settings(),
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, config.model, config.api_key
        );
        debug!(model = %config.model, prompt_chars = combined.len(), "dispatching generation request");

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            let kind = ApiErrorKind::from_status(status.as_u16());
            let message = if body.error.message.is_empty() {
                format!("HTTP {}", status.as_u16())
            } else {
                body.error.message
            };
            warn!(%status, %kind, "generation request failed");
            return Err(DebateError::Api { kind, message });
        }

        let body: GenerateResponse = response.json().await?;
        let candidate = body.candidates.into_iter().next().ok_or_else(|| {
            warn!("no candidates in response, content likely filtered");
            DebateError::ContentWithheld {
                reason: "no candidates returned".to_string(),
            }
        })?;

        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason == "SAFETY" || reason == "RECITATION" {
                warn!(%reason, "generation withheld");
                return Err(DebateError::ContentWithheld {
                    reason: reason.to_string(),
                });
            }
        }

        let text = candidate
            .content
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(DebateError::EmptyGeneration);
        }
        Ok(text)
    }

    /// One-shot probe that the credential and endpoint work at all.
    pub async fn test_connection(&self) -> Result<(), DebateError> {
        let probe = Prompt {
            system: "Respond with a simple greeting.".to_string(),
            body: "Hello".to_string(),
        };
        self.generate(&probe).await.map(|_| ())
    }
}
