use adk_core::AdkError;

#[derive(Debug, thiserror::Error)]
pub enum TravelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Agent framework error: {0}")]
    Adk(#[from] AdkError),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Evaluation error: {0}")]
    Eval(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<adk_eval::EvalError> for TravelError {
    fn from(err: adk_eval::EvalError) -> Self {
        TravelError::Eval(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TravelError>;
