//! Runtime configuration loaded from the environment (and `.env`).

use crate::agent::{AGENT_NAME, ModelRef, Provider};
use crate::error::{Result, TravelError};

pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_DB_URL: &str = "sqlite://travel_advisor.db?mode=rwc";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub model: ModelRef,
    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub database_url: String,
    pub app_name: String,
    pub port: u16,
}

impl AdvisorConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let model = ModelRef::parse(&get("TRAVEL_ADVISOR_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()))?;

        let port = match get("TRAVEL_ADVISOR_PORT").or_else(|| get("PORT")) {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| TravelError::Config(format!("invalid port '{raw}'")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            model,
            openai_api_key: get("OPENAI_API_KEY"),
            google_api_key: get("GOOGLE_API_KEY").or_else(|| get("GEMINI_API_KEY")),
            database_url: get("TRAVEL_ADVISOR_DB_URL").unwrap_or_else(|| DEFAULT_DB_URL.to_string()),
            app_name: get("TRAVEL_ADVISOR_APP_NAME").unwrap_or_else(|| AGENT_NAME.to_string()),
            port,
        })
    }

    /// The credential required by the configured model provider.
    pub fn api_key(&self) -> Result<&str> {
        let (key, var) = match self.model.provider {
            Provider::OpenAi => (self.openai_api_key.as_deref(), "OPENAI_API_KEY"),
            Provider::Gemini => (self.google_api_key.as_deref(), "GOOGLE_API_KEY"),
        };
        key.ok_or_else(|| {
            TravelError::Config(format!("{var} must be set to use model '{}'", self.model))
        })
    }
}
