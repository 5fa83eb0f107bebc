//! Mock travel tools exposed to the agent.
//!
//! Every tool returns a [`ToolOutcome`]: a flat JSON object with a `status`
//! field drawn from [`ToolStatus`], the tool's value fields on success, and an
//! optional human-readable `message`. None of the tools perform I/O; their data
//! is hardcoded so that runs are reproducible.

pub mod attractions;
pub mod exchange;
mod places;
pub mod weather;

pub use attractions::{Attraction, AttractionList, LocalAttractionsTool, get_local_attractions};
pub use exchange::{ExchangeRate, ExchangeRateTool, get_exchange_rate};
pub use weather::{WeatherReport, WeatherTool, get_weather};

use adk_core::Tool;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome class shared by all tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolStatus {
    Success,
    NotFound,
    Error,
}

impl ToolStatus {
    pub const ALL: [ToolStatus; 3] = [ToolStatus::Success, ToolStatus::NotFound, ToolStatus::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Success => "success",
            ToolStatus::NotFound => "not_found",
            ToolStatus::Error => "error",
        }
    }
}

/// Result of a tool call. Serializes flat: `{"status": .., <value fields>.., "message": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolOutcome<T> {
    pub status: ToolStatus,
    #[serde(flatten)]
    pub value: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ToolOutcome<T> {
    pub fn success(value: T) -> Self {
        Self { status: ToolStatus::Success, value: Some(value), message: None }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self { status: ToolStatus::NotFound, value: None, message: Some(message.into()) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { status: ToolStatus::Error, value: None, message: Some(message.into()) }
    }

    pub fn is_success(&self) -> bool {
        self.status == ToolStatus::Success
    }
}

/// All travel tools, in the order they are registered on the agent.
pub fn travel_tools() -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(WeatherTool), Arc::new(ExchangeRateTool), Arc::new(LocalAttractionsTool)]
}

/// Names of the registered tools.
pub fn tool_names() -> Vec<String> {
    travel_tools().iter().map(|tool| tool.name().to_string()).collect()
}

/// Trims, lowercases and collapses inner whitespace.
pub(crate) fn normalize(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}
