//! In-process execution: drive the travel advisor through `adk_runner::Runner`.

use crate::error::Result;
use crate::event::StreamEvent;
use crate::session::{SessionKey, ensure_session};
use adk_core::{Agent, Content, EventStream};
use adk_runner::{Runner, RunnerConfig};
use adk_session::SessionService;
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;

/// A tool invocation observed while answering.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    pub args: Value,
}

/// The drained result of one conversation turn.
#[derive(Debug, Clone, Default)]
pub struct Reply {
    /// Text of the final response.
    pub text: String,
    /// Tool calls in the order the model made them.
    pub tool_calls: Vec<ToolCall>,
    pub events: Vec<StreamEvent>,
}

impl Reply {
    fn from_events(events: Vec<StreamEvent>) -> Self {
        let tool_calls = events
            .iter()
            .flat_map(|event| event.function_calls())
            .map(|(name, args)| ToolCall { name: name.to_string(), args: args.clone() })
            .collect();

        // Prefer the last complete response; fall back to streamed chunks.
        let text = match events.iter().rev().find(|event| event.is_final_response()) {
            Some(event) => event.text(),
            None => events.iter().filter(|event| event.partial).map(StreamEvent::text).collect(),
        };

        Self { text, tool_calls, events }
    }
}

pub struct Advisor {
    runner: Runner,
    sessions: Arc<dyn SessionService>,
    app_name: String,
}

impl Advisor {
    pub fn new(
        agent: Arc<dyn Agent>,
        sessions: Arc<dyn SessionService>,
        app_name: impl Into<String>,
    ) -> Result<Self> {
        let app_name = app_name.into();
        let runner = Runner::new(RunnerConfig {
            app_name: app_name.clone(),
            agent,
            session_service: sessions.clone(),
            artifact_service: None,
            memory_service: None,
            plugin_manager: None,
            run_config: None,
            compaction_config: None,
        })?;
        Ok(Self { runner, sessions, app_name })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// A key for `user_id` in this advisor's app, with a new session id.
    pub fn new_key(&self, user_id: &str) -> Result<SessionKey> {
        SessionKey::generate(&self.app_name, user_id)
    }

    /// Runs one turn and returns the raw framework event stream.
    pub async fn stream(&self, key: &SessionKey, message: &str) -> Result<EventStream> {
        ensure_session(self.sessions.as_ref(), key).await?;
        tracing::debug!(session = %key, "running turn");
        let content = Content::new("user").with_text(message);
        let events = self
            .runner
            .run(key.user_id().to_string(), key.session_id().to_string(), content)
            .await?;
        Ok(events)
    }

    /// Runs one turn to completion.
    pub async fn ask(&self, key: &SessionKey, message: &str) -> Result<Reply> {
        let mut stream = self.stream(key, message).await?;
        let mut events = Vec::new();
        while let Some(event) = stream.next().await {
            let event = event?;
            events.push(StreamEvent::from_json(serde_json::to_value(&event)?));
        }
        let reply = Reply::from_events(events);
        tracing::info!(
            session = %key,
            events = reply.events.len(),
            tool_calls = reply.tool_calls.len(),
            "turn complete"
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_collects_calls_and_final_text() {
        let events = vec![
            StreamEvent::from_json(json!({
                "author": "travel_advisor_agent",
                "content": {"parts": [{"name": "get_weather", "args": {"location": "Paris"}}]}
            })),
            StreamEvent::from_json(json!({
                "author": "travel_advisor_agent",
                "content": {"parts": [{"functionResponse": {"name": "get_weather", "response": {}}}]}
            })),
            StreamEvent::from_json(json!({
                "author": "travel_advisor_agent",
                "content": {"parts": [{"text": "It is mild in Paris."}]}
            })),
        ];
        let reply = Reply::from_events(events);
        assert_eq!(reply.text, "It is mild in Paris.");
        assert_eq!(
            reply.tool_calls,
            vec![ToolCall { name: "get_weather".into(), args: json!({"location": "Paris"}) }]
        );
        assert_eq!(reply.events.len(), 3);
    }

    #[test]
    fn test_reply_joins_partial_chunks() {
        let chunk = |text: &str| {
            StreamEvent::from_json(json!({
                "author": "a", "partial": true, "content": {"parts": [{"text": text}]}
            }))
        };
        let reply = Reply::from_events(vec![chunk("Bon "), chunk("voyage")]);
        assert_eq!(reply.text, "Bon voyage");
    }
}
