//! Error types for the debate system.

use thiserror::Error;

use crate::session::DebatePhase;

/// Classification of a failed call to the generation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    RateLimited,
    ServerError,
    Other,
}

impl ApiErrorKind {
    /// Map an HTTP status code onto a failure class.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            429 => ApiErrorKind::RateLimited,
            500..=599 => ApiErrorKind::ServerError,
            _ => ApiErrorKind::Other,
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApiErrorKind::BadRequest => "bad request",
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::RateLimited => "rate limited",
            ApiErrorKind::ServerError => "server error",
            ApiErrorKind::Other => "API error",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
pub enum DebateError {
    // Configuration failures. No network call is attempted for these.
    #[error("API key is not configured")]
    MissingApiKey,

    #[error("API key has an unexpected format (Google AI keys start with \"AIzaSy\")")]
    MalformedApiKey,

    #[error("configuration error: {0}")]
    Config(String),

    // Transport failures, terminal for the call that raised them.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{kind}: {message}")]
    Api { kind: ApiErrorKind, message: String },

    #[error("generation withheld by the model ({reason})")]
    ContentWithheld { reason: String },

    #[error("the model returned an empty generation")]
    EmptyGeneration,

    // Parse and validation failures. The raw model output is retained so
    // callers can surface it for diagnostics.
    #[error("no JSON payload found in model output")]
    Unparsable { raw: String },

    #[error("model output is not valid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("model output is missing or malformed field `{field}`")]
    MissingField { field: String, raw: String },

    // Sequencing violations, rejected synchronously before any side effect.
    #[error("no active debate session")]
    NoSession,

    #[error("operation requires phase {expected:?}, session is in {actual:?}")]
    WrongPhase {
        expected: DebatePhase,
        actual: DebatePhase,
    },

    #[error("it is not the human participant's turn to speak")]
    NotHumanTurn,

    #[error("the current speaker is not an AI debater")]
    NotAiTurn,

    #[error("a speech generation is already in flight for this session")]
    GenerationInFlight,

    #[error("an adjudication is already in flight for this session")]
    AdjudicationInFlight,

    #[error("no adjudication has been started for this session")]
    AdjudicationNotStarted,

    #[error("the debate needs {expected} speeches before judging, only {actual} recorded")]
    DebateUnfinished { expected: usize, actual: usize },

    #[error("role `{role}` sits on the {role_side} bench, not {requested}")]
    SideMismatch {
        role: String,
        role_side: String,
        requested: String,
    },

    #[error("unknown role `{0}`")]
    UnknownRole(String),

    // Persistence failures.
    #[error("history store I/O error: {0}")]
    HistoryIo(#[from] std::io::Error),

    #[error("history store format error: {0}")]
    HistoryFormat(#[from] serde_json::Error),

    #[error("history entry `{0}` not found")]
    HistoryEntryNotFound(String),
}

impl DebateError {
    /// Raw model output attached to a parse or validation failure, if any.
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            DebateError::Unparsable { raw }
            | DebateError::InvalidJson { raw, .. }
            | DebateError::MissingField { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Whether re-invoking the same operation may succeed without any
    /// local state change in between. Sequencing and configuration errors
    /// are caller bugs and are excluded.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DebateError::Transport(_)
                | DebateError::Api { .. }
                | DebateError::ContentWithheld { .. }
                | DebateError::EmptyGeneration
                | DebateError::Unparsable { .. }
                | DebateError::InvalidJson { .. }
                | DebateError::MissingField { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::BadRequest);
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Unauthorized);
        assert_eq!(ApiErrorKind::from_status(403), ApiErrorKind::Forbidden);
        assert_eq!(ApiErrorKind::from_status(429), ApiErrorKind::RateLimited);
        assert_eq!(ApiErrorKind::from_status(500), ApiErrorKind::ServerError);
        assert_eq!(ApiErrorKind::from_status(503), ApiErrorKind::ServerError);
        assert_eq!(ApiErrorKind::from_status(418), ApiErrorKind::Other);
    }

    #[test]
    fn test_raw_output_retained() {
        let err = DebateError::MissingField {
            field: "winner".to_string(),
            raw: "{\"score\": {}}".to_string(),
        };
        assert_eq!(err.raw_output(), Some("{\"score\": {}}"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_sequencing_errors_not_retryable() {
        assert!(!DebateError::NotHumanTurn.is_retryable());
        assert!(!DebateError::GenerationInFlight.is_retryable());
        assert!(!DebateError::AdjudicationNotStarted.is_retryable());
        assert!(!DebateError::MissingApiKey.is_retryable());
    }
}
