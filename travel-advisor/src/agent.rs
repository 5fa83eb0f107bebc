use crate::error::{Result, TravelError};
use crate::prompt::{DESCRIPTION, INSTRUCTION};
use crate::tools::travel_tools;
use adk_agent::{LlmAgent, LlmAgentBuilder};
use adk_core::Llm;
use adk_model::GeminiModel;
use adk_model::openai::{OpenAIClient, OpenAIConfig};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const AGENT_NAME: &str = "travel_advisor_agent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }
}

impl FromStr for Provider {
    type Err = TravelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "gemini" | "google" => Ok(Provider::Gemini),
            other => Err(TravelError::Config(format!("unsupported model provider '{other}'"))),
        }
    }
}

/// A `provider/model` reference such as `openai/gpt-4o-mini`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub provider: Provider,
    pub model: String,
}

impl ModelRef {
    /// Parses `provider/model`. A bare model name is treated as an OpenAI model.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (provider, model) = match raw.split_once('/') {
            Some((provider, model)) => (provider.parse::<Provider>()?, model.trim()),
            None => (Provider::OpenAi, raw),
        };
        if model.is_empty() {
            return Err(TravelError::Config(format!("model reference '{raw}' has no model name")));
        }
        Ok(Self { provider, model: model.to_string() })
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider.as_str(), self.model)
    }
}

/// Creates the LLM client for a model reference.
pub fn build_model(model: &ModelRef, api_key: &str) -> Result<Arc<dyn Llm>> {
    let llm: Arc<dyn Llm> = match model.provider {
        Provider::OpenAi => {
            Arc::new(OpenAIClient::new(OpenAIConfig::new(api_key, model.model.clone()))?)
        }
        Provider::Gemini => Arc::new(GeminiModel::new(api_key, model.model.clone())?),
    };
    tracing::info!(model = %model, "model client created");
    Ok(llm)
}

/// The travel advisor agent: prompt, model and the three travel tools.
pub fn build_agent(model: Arc<dyn Llm>) -> Result<LlmAgent> {
    let builder = travel_tools().into_iter().fold(
        LlmAgentBuilder::new(AGENT_NAME)
            .description(DESCRIPTION)
            .instruction(INSTRUCTION)
            .model(model),
        |builder, tool| builder.tool(tool),
    );
    Ok(builder.build()?)
}
