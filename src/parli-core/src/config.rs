//! Configuration module for loading TOML config files.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::client::{ApiConfig, DEFAULT_MODEL};
use crate::error::DebateError;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub debate: DebateSettings,
}

/// Settings for the generation endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Credential for the generation endpoint. Usually left unset here and
    /// supplied via the GEMINI_API_KEY environment variable instead.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
        }
    }
}

/// Defaults for new debate sessions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DebateSettings {
    pub human_name: String,
    pub ai_skill: String,
}

impl Default for DebateSettings {
    fn default() -> Self {
        Self {
            human_name: "You".to_string(),
            ai_skill: "intermediate".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DebateError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| DebateError::Config(format!("failed to read config: {e}")))?;
        Self::parse(&content)
    }

    /// Load configuration from string content.
    pub fn parse(content: &str) -> Result<Self, DebateError> {
        toml::from_str(content)
            .map_err(|e| DebateError::Config(format!("failed to parse config: {e}")))
    }

    /// Resolve the client configuration, preferring the given key (usually
    /// from the environment) over the config file.
    pub fn api_config(&self, key_override: Option<String>) -> Option<ApiConfig> {
        let api_key = key_override.or_else(|| self.api.api_key.clone())?;
        Some(ApiConfig::new(api_key, self.api.model.clone()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            debate: DebateSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.model, DEFAULT_MODEL);
        assert!(config.api.api_key.is_none());
        assert_eq!(config.debate.ai_skill, "intermediate");
    }

    #[test]
    fn test_parse_partial_file() {
        let config = Config::parse(
            r#"
            [api]
            model = "gemini-1.5-pro"

            [debate]
            human_name = "Sam"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.model, "gemini-1.5-pro");
        assert_eq!(config.debate.human_name, "Sam");
        assert_eq!(config.debate.ai_skill, "intermediate");
    }

    #[test]
    fn test_api_config_prefers_env_key() {
        let config = Config::parse(
            r#"
            [api]
            api_key = "AIzaSyFromFile"
            "#,
        )
        .unwrap();
        let resolved = config.api_config(Some("AIzaSyFromEnv".to_string())).unwrap();
        assert_eq!(resolved.api_key, "AIzaSyFromEnv");

        let fallback = config.api_config(None).unwrap();
        assert_eq!(fallback.api_key, "AIzaSyFromFile");
    }

    #[test]
    fn test_api_config_absent_without_any_key() {
        let config = Config::default();
        assert!(config.api_config(None).is_none());
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let err = Config::parse("not [valid toml").unwrap_err();
        assert!(matches!(err, DebateError::Config(_)));
    }
}
