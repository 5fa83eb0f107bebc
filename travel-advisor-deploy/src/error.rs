#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Manifest parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid resource name: {0}")]
    InvalidResource(String),

    #[error("API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Operation failed: {0}")]
    Operation(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeployError>;
