use super::{ToolOutcome, places::resolve_city};
use adk_core::{AdkError, Result, Tool, ToolContext};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: String,
    pub condition: String,
    pub temperature_c: i32,
    pub humidity: u8,
    pub report: String,
}

// (city, condition, temperature °C, humidity %)
const CONDITIONS: &[(&str, &str, i32, u8)] = &[
    ("Seoul", "cloudy", 18, 55),
    ("Tokyo", "light rain", 21, 78),
    ("Vientiane", "sunny", 32, 70),
    ("Luang Prabang", "partly cloudy", 29, 75),
    ("Bangkok", "thunderstorms", 33, 80),
    ("Paris", "sunny", 22, 50),
    ("London", "drizzle", 15, 82),
    ("New York", "clear", 24, 60),
];

/// Looks up the current (mock) weather for a location.
pub fn get_weather(location: &str) -> ToolOutcome<WeatherReport> {
    if location.trim().is_empty() {
        return ToolOutcome::error("The 'location' parameter must not be empty.");
    }

    let found = resolve_city(location)
        .and_then(|city| CONDITIONS.iter().find(|(name, ..)| *name == city));

    match found {
        Some(&(city, condition, temperature_c, humidity)) => ToolOutcome::success(WeatherReport {
            location: city.to_string(),
            condition: condition.to_string(),
            temperature_c,
            humidity,
            report: format!(
                "The weather in {city} is {condition} with a temperature of {temperature_c}°C and {humidity}% humidity."
            ),
        }),
        None => ToolOutcome::not_found(format!(
            "Weather information for '{}' is not available.",
            location.trim()
        )),
    }
}

#[derive(Debug, Deserialize)]
struct WeatherParams {
    location: String,
}

/// `get_weather` as an agent tool.
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Retrieves the current weather report for a city or country. \
         Returns status 'success' with condition, temperature_c, humidity and report, \
         or status 'not_found' when no data exists for the location."
    }

    fn parameters_schema(&self) -> Option<Value> {
        Some(json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City or country name, e.g. 'Seoul' or 'Laos'"
                }
            },
            "required": ["location"]
        }))
    }

    async fn execute(&self, _ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value> {
        let params: WeatherParams = serde_json::from_value(args)
            .map_err(|e| AdkError::Tool(format!("get_weather: invalid arguments: {e}")))?;
        let outcome = get_weather(&params.location);
        tracing::debug!(tool = "get_weather", location = %params.location, status = outcome.status.as_str(), "tool executed");
        serde_json::to_value(outcome).map_err(|e| AdkError::Tool(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolStatus;

    #[test]
    fn test_known_city() {
        let outcome = get_weather("Vientiane");
        assert_eq!(outcome.status, ToolStatus::Success);
        let report = outcome.value.unwrap();
        assert_eq!(report.location, "Vientiane");
        assert_eq!(report.temperature_c, 32);
        assert!(report.report.contains("sunny"));
    }

    #[test]
    fn test_country_alias_resolves_to_city() {
        let outcome = get_weather("laos");
        assert_eq!(outcome.value.unwrap().location, "Vientiane");
    }

    #[test]
    fn test_unknown_location() {
        let outcome = get_weather("Atlantis");
        assert_eq!(outcome.status, ToolStatus::NotFound);
        assert_eq!(
            outcome.message.as_deref(),
            Some("Weather information for 'Atlantis' is not available.")
        );
        assert!(outcome.value.is_none());
    }

    #[test]
    fn test_blank_location() {
        assert_eq!(get_weather("   ").status, ToolStatus::Error);
    }

    #[test]
    fn test_table_covers_every_city() {
        for city in crate::tools::places::CITIES {
            assert!(get_weather(city).is_success(), "no weather for {city}");
        }
    }

    #[test]
    fn test_schema_requires_location() {
        let schema = WeatherTool.parameters_schema().unwrap();
        assert_eq!(schema["required"], json!(["location"]));
    }
}
