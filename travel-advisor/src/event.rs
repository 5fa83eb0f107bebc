//! A tolerant, typed view over streamed agent events.
//!
//! Events arrive as JSON from two places: the local SSE API (ADK-Rust event
//! encoding) and Vertex AI Agent Engine `streamQuery` (ADK-Python encoding,
//! snake_case or camelCase). [`StreamEvent::from_json`] accepts both.

use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EventPart {
    Text(String),
    FunctionCall { name: String, args: Value },
    FunctionResponse { name: String, response: Value },
    Other(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamEvent {
    pub id: Option<String>,
    pub author: String,
    pub parts: Vec<EventPart>,
    pub partial: bool,
    pub raw: Value,
}

fn field<'a>(value: &'a Value, snake: &str, camel: &str) -> Option<&'a Value> {
    value.get(snake).or_else(|| value.get(camel))
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn parse_part(part: &Value) -> EventPart {
    if let Some(text) = part.get("text").and_then(Value::as_str) {
        return EventPart::Text(text.to_string());
    }
    if let Some(call) = field(part, "function_call", "functionCall") {
        return EventPart::FunctionCall {
            name: str_field(call, "name").unwrap_or_default(),
            args: call.get("args").cloned().unwrap_or(Value::Null),
        };
    }
    if let Some(resp) = field(part, "function_response", "functionResponse") {
        return EventPart::FunctionResponse {
            name: str_field(resp, "name").unwrap_or_default(),
            response: resp.get("response").cloned().unwrap_or(Value::Null),
        };
    }
    // ADK-Rust encodes function calls as a bare {"name", "args"} part.
    if let (Some(name), Some(args)) = (part.get("name").and_then(Value::as_str), part.get("args")) {
        return EventPart::FunctionCall { name: name.to_string(), args: args.clone() };
    }
    EventPart::Other(part.clone())
}

impl StreamEvent {
    pub fn from_json(raw: Value) -> Self {
        let parts = raw
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
            .map(|parts| parts.iter().map(parse_part).collect())
            .unwrap_or_default();

        Self {
            id: str_field(&raw, "id"),
            author: str_field(&raw, "author").unwrap_or_default(),
            parts,
            partial: raw.get("partial").and_then(Value::as_bool).unwrap_or(false),
            raw,
        }
    }

    /// Concatenated text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                EventPart::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn function_calls(&self) -> Vec<(&str, &Value)> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                EventPart::FunctionCall { name, args } => Some((name.as_str(), args)),
                _ => None,
            })
            .collect()
    }

    pub fn is_final_response(&self) -> bool {
        !self.partial && !self.text().is_empty() && self.function_calls().is_empty()
    }
}

impl fmt::Display for StreamEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let author = if self.author.is_empty() { "?" } else { self.author.as_str() };
        write!(f, "[{author}]")?;
        for part in &self.parts {
            match part {
                EventPart::Text(text) => write!(f, " {text}")?,
                EventPart::FunctionCall { name, args } => write!(f, " -> {name}({args})")?,
                EventPart::FunctionResponse { name, response } => {
                    write!(f, " <- {name}: {response}")?
                }
                EventPart::Other(value) => write!(f, " {value}")?,
            }
        }
        Ok(())
    }
}
