//! HTTP client for the SSE API served by [`crate::server`].

use crate::error::{Result, TravelError};
use crate::event::StreamEvent;
use crate::session::SessionKey;
use futures::{Stream, StreamExt};
use serde_json::{Value, json};
use std::pin::Pin;

pub type StreamEventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// One dispatched server-sent event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SseMessage {
    pub event: Option<String>,
    pub id: Option<String>,
    pub data: String,
}

/// Incremental SSE decoder. Feed it byte chunks as they arrive; chunk
/// boundaries may fall anywhere, including inside a UTF-8 sequence.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    current: SseMessage,
    has_data: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes a chunk and returns every event it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseMessage> {
        self.buffer.extend_from_slice(chunk);
        let mut messages = Vec::new();

        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            let line = String::from_utf8_lossy(&line);
            if let Some(message) = self.process_line(&line) {
                messages.push(message);
            }
        }
        messages
    }

    /// Flushes a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Option<SseMessage> {
        if !self.buffer.is_empty() {
            let rest = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&rest);
            let line = line.trim_end_matches('\r').to_string();
            if let Some(message) = self.process_line(&line) {
                return Some(message);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<SseMessage> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "data" => {
                if self.has_data {
                    self.current.data.push('\n');
                }
                self.current.data.push_str(value);
                self.has_data = true;
            }
            "event" => self.current.event = Some(value.to_string()),
            "id" => self.current.id = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseMessage> {
        let message = std::mem::take(&mut self.current);
        let has_data = std::mem::take(&mut self.has_data);
        has_data.then_some(message)
    }
}

fn to_event(message: SseMessage) -> Option<StreamEvent> {
    match serde_json::from_str::<Value>(&message.data) {
        Ok(value) => Some(StreamEvent::from_json(value)),
        Err(e) => {
            tracing::warn!(error = %e, data = %message.data, "skipping non-JSON SSE payload");
            None
        }
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TravelError::Http { status: status.as_u16(), body })
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<Value> {
        let response = self.http.get(format!("{}/api/health", self.base_url)).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// Creates the session named by `key` on the server.
    pub async fn create_session(&self, key: &SessionKey) -> Result<Value> {
        let body = json!({
            "app_name": key.app_name(),
            "user_id": key.user_id(),
            "session_id": key.session_id(),
        });
        let response =
            self.http.post(format!("{}/api/sessions", self.base_url)).json(&body).send().await?;
        let session = check(response).await?.json().await?;
        tracing::debug!(session = %key, "session created");
        Ok(session)
    }

    /// Sends `message` and streams the agent's events back.
    pub async fn run_sse(&self, key: &SessionKey, message: &str) -> Result<StreamEventStream> {
        let url = format!(
            "{}/api/run/{}/{}/{}",
            self.base_url,
            key.app_name(),
            key.user_id(),
            key.session_id()
        );
        let response = self
            .http
            .post(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(&json!({ "new_message": message }))
            .send()
            .await?;
        let response = check(response).await?;

        let stream = async_stream::stream! {
            let mut bytes = response.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(TravelError::Request(e));
                        return;
                    }
                };
                for message in decoder.push(&chunk) {
                    if let Some(event) = to_event(message) {
                        yield Ok(event);
                    }
                }
            }
            if let Some(event) = decoder.finish().and_then(to_event) {
                yield Ok(event);
            }
        };
        Ok(Box::pin(stream))
    }
}
