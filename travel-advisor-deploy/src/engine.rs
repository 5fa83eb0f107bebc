//! Vertex AI Agent Engine ("reasoning engines") REST client.
//!
//! Covers the control plane (create, poll, get, list, delete) and the data
//! plane of a deployed ADK app (`:query` for sessions, `:streamQuery` for
//! conversation turns).

use crate::auth::TokenSource;
use crate::error::{DeployError, Result};
use crate::http::{authorize, check, normalize_endpoint, send_json};
use crate::manifest::EnvVar;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use travel_advisor::StreamEvent;

const API_VERSION: &str = "v1";

pub type RemoteEventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// Body of a reasoning engine create request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEngineRequest {
    pub display_name: String,
    pub description: String,
    pub spec: EngineSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSpec {
    pub package_spec: PackageSpec,
    pub deployment_spec: DeploymentSpec,
    pub agent_framework: String,
    pub class_methods: Vec<ClassMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    /// Serialized Python object that serves the class methods. Without it the
    /// engine is created but cannot answer queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickle_object_gcs_uri: Option<String>,
    pub dependency_files_gcs_uri: String,
    pub requirements_gcs_uri: String,
    pub python_version: String,
}

/// An operation the deployed app exposes through `:query` or `:streamQuery`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMethod {
    pub name: String,
    /// Empty for `:query`, `"stream"` for `:streamQuery`.
    pub api_mode: String,
    pub parameters: Value,
}

impl ClassMethod {
    fn new(name: &str, api_mode: &str, params: &[&str]) -> Self {
        let properties: serde_json::Map<String, Value> = params
            .iter()
            .map(|param| (param.to_string(), json!({ "type": "string" })))
            .collect();
        Self {
            name: name.to_string(),
            api_mode: api_mode.to_string(),
            parameters: json!({ "type": "object", "properties": properties, "required": params }),
        }
    }
}

/// The session and query methods an ADK app serves, matching the calls made
/// by [`AgentEngineClient`].
pub fn adk_class_methods() -> Vec<ClassMethod> {
    vec![
        ClassMethod::new("create_session", "", &["user_id"]),
        ClassMethod::new("list_sessions", "", &["user_id"]),
        ClassMethod::new("stream_query", "stream", &["user_id", "session_id", "message"]),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentSpec {
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReasoningEngine {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
}

/// A long-running operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Operation {
    pub name: String,
    pub done: bool,
    pub error: Option<Value>,
    pub response: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ListEnginesResponse {
    reasoning_engines: Vec<ReasoningEngine>,
    next_page_token: Option<String>,
}

fn is_engine_resource(name: &str) -> bool {
    let segments: Vec<&str> = name.split('/').collect();
    segments.len() == 6
        && segments[0] == "projects"
        && segments[2] == "locations"
        && segments[4] == "reasoningEngines"
        && segments.iter().all(|segment| !segment.trim().is_empty())
}

/// Parses one line of a `:streamQuery` response. Lines may be bare JSON or
/// SSE `data:` lines.
pub fn parse_stream_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    let line = line.strip_prefix("data:").map(str::trim_start).unwrap_or(line);
    if line.is_empty() || line.starts_with(':') {
        return None;
    }
    match serde_json::from_str::<Value>(line) {
        Ok(value) => Some(StreamEvent::from_json(value)),
        Err(e) => {
            tracing::warn!(error = %e, "skipping non-JSON stream line");
            None
        }
    }
}

#[derive(Clone)]
pub struct AgentEngineClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    location: String,
    tokens: Arc<dyn TokenSource>,
}

impl AgentEngineClient {
    pub fn new(
        project_id: impl Into<String>,
        location: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        let location = location.into();
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("https://{location}-aiplatform.googleapis.com"),
            project_id: project_id.into(),
            location,
            tokens,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Self {
        self.endpoint = normalize_endpoint(endpoint.as_ref());
        self
    }

    fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{API_VERSION}/{path}", self.endpoint)
    }

    /// Expands a numeric engine id to a full resource name; full names pass through.
    pub fn resource_name(&self, engine: &str) -> Result<String> {
        let engine = engine.trim();
        if !engine.is_empty() && engine.chars().all(|c| c.is_ascii_digit()) {
            return Ok(format!("{}/reasoningEngines/{engine}", self.parent()));
        }
        if is_engine_resource(engine) {
            return Ok(engine.to_string());
        }
        Err(DeployError::InvalidResource(format!(
            "'{engine}' is not a reasoning engine id or projects/*/locations/*/reasoningEngines/* name"
        )))
    }

    #[tracing::instrument(skip(self, request), fields(display_name = %request.display_name))]
    pub async fn create(&self, request: &CreateEngineRequest) -> Result<Operation> {
        let url = self.url(&format!("{}/reasoningEngines", self.parent()));
        let value = send_json(self.tokens.as_ref(), self.http.post(url).json(request)).await?;
        let operation: Operation = serde_json::from_value(value)?;
        tracing::info!(operation = %operation.name, "create requested");
        Ok(operation)
    }

    pub async fn get_operation(&self, name: &str) -> Result<Operation> {
        let value = send_json(self.tokens.as_ref(), self.http.get(self.url(name))).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Polls `operation` until done and returns the created resource name.
    pub async fn wait(
        &self,
        operation: Operation,
        poll_interval: Duration,
        max_wait: Duration,
    ) -> Result<String> {
        let started = tokio::time::Instant::now();
        let mut operation = operation;

        loop {
            if operation.done {
                if let Some(error) = operation.error {
                    let message = error
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| error.to_string());
                    return Err(DeployError::Operation(message));
                }
                return operation
                    .response
                    .as_ref()
                    .and_then(|response| response.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        DeployError::Operation(format!(
                            "operation {} finished without a resource name",
                            operation.name
                        ))
                    });
            }

            if started.elapsed() >= max_wait {
                return Err(DeployError::Timeout(format!(
                    "operation {} not done after {}s",
                    operation.name,
                    max_wait.as_secs()
                )));
            }
            tokio::time::sleep(poll_interval).await;
            tracing::debug!(operation = %operation.name, "polling");
            operation = self.get_operation(&operation.name).await?;
        }
    }

    pub async fn get(&self, engine: &str) -> Result<ReasoningEngine> {
        let name = self.resource_name(engine)?;
        let value = send_json(self.tokens.as_ref(), self.http.get(self.url(&name))).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn list(&self) -> Result<Vec<ReasoningEngine>> {
        let url = self.url(&format!("{}/reasoningEngines", self.parent()));
        let mut engines = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(&url);
            if let Some(token) = page_token.as_ref() {
                request = request.query(&[("pageToken", token)]);
            }
            let page: ListEnginesResponse =
                serde_json::from_value(send_json(self.tokens.as_ref(), request).await?)?;
            engines.extend(page.reasoning_engines);

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(engines)
    }

    /// Deletes the engine. `force` also deletes its sessions.
    pub async fn delete(&self, engine: &str, force: bool) -> Result<Operation> {
        let name = self.resource_name(engine)?;
        let mut request = self.http.delete(self.url(&name));
        if force {
            request = request.query(&[("force", "true")]);
        }
        let value = send_json(self.tokens.as_ref(), request).await?;
        tracing::info!(engine = %name, force, "delete requested");
        Ok(serde_json::from_value(value)?)
    }

    /// Invokes a class method of the deployed app through `:query` and returns its output.
    pub async fn query(&self, engine: &str, class_method: &str, input: Value) -> Result<Value> {
        let name = self.resource_name(engine)?;
        let body = json!({ "classMethod": class_method, "input": input });
        let request = self.http.post(self.url(&format!("{name}:query"))).json(&body);
        let mut value = send_json(self.tokens.as_ref(), request).await?;
        Ok(value.get_mut("output").map(Value::take).unwrap_or(Value::Null))
    }

    pub async fn create_session(&self, engine: &str, user_id: &str) -> Result<String> {
        let output = self.query(engine, "create_session", json!({ "user_id": user_id })).await?;
        output
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| DeployError::Operation(format!("create_session returned no id: {output}")))
    }

    pub async fn list_sessions(&self, engine: &str, user_id: &str) -> Result<Vec<Value>> {
        let output = self.query(engine, "list_sessions", json!({ "user_id": user_id })).await?;
        let sessions = match output {
            Value::Array(sessions) => sessions,
            Value::Object(mut map) => match map.remove("sessions") {
                Some(Value::Array(sessions)) => sessions,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(sessions)
    }

    /// Sends one message to a remote session and streams the resulting events.
    pub async fn stream_query(
        &self,
        engine: &str,
        user_id: &str,
        session_id: &str,
        message: &str,
    ) -> Result<RemoteEventStream> {
        let name = self.resource_name(engine)?;
        let body = json!({
            "classMethod": "stream_query",
            "input": { "user_id": user_id, "session_id": session_id, "message": message },
        });
        let request = self
            .http
            .post(self.url(&format!("{name}:streamQuery")))
            .query(&[("alt", "sse")])
            .json(&body);
        let response = check(authorize(self.tokens.as_ref(), request).await?.send().await?).await?;
        tracing::debug!(engine = %name, session = session_id, "stream opened");

        let stream = async_stream::stream! {
            let mut bytes = response.bytes_stream();
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        yield Err(DeployError::Request(e));
                        return;
                    }
                };
                buffer.extend_from_slice(&chunk);
                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    if let Some(event) = parse_stream_line(&String::from_utf8_lossy(&line)) {
                        yield Ok(event);
                    }
                }
            }
            if let Some(event) = parse_stream_line(&String::from_utf8_lossy(&buffer)) {
                yield Ok(event);
            }
        };
        Ok(Box::pin(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;

    fn client() -> AgentEngineClient {
        AgentEngineClient::new("travel-demo", "asia-northeast1", Arc::new(StaticToken::new("t")))
    }

    #[test]
    fn test_resource_name() {
        let client = client();
        assert_eq!(
            client.resource_name("6508739400526987264").unwrap(),
            "projects/travel-demo/locations/asia-northeast1/reasoningEngines/6508739400526987264"
        );
        let full = "projects/1033622830055/locations/asia-northeast1/reasoningEngines/42";
        assert_eq!(client.resource_name(full).unwrap(), full);
    }

    #[test]
    fn test_invalid_resource_names() {
        let client = client();
        for bad in ["", "my-engine", "projects/p/locations/l/reasoningEngines/", "projects/p/x/l/reasoningEngines/1"] {
            assert!(
                matches!(client.resource_name(bad), Err(DeployError::InvalidResource(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_default_endpoint_is_regional() {
        assert_eq!(client().endpoint, "https://asia-northeast1-aiplatform.googleapis.com");
    }

    #[test]
    fn test_parse_stream_line() {
        let event = parse_stream_line(
            r#"{"author":"travel_advisor_agent","content":{"parts":[{"text":"Hi"}]}}"#,
        )
        .unwrap();
        assert_eq!(event.text(), "Hi");
        assert!(parse_stream_line("data: {\"author\":\"a\"}").is_some());
        assert!(parse_stream_line("   ").is_none());
        assert!(parse_stream_line("garbage").is_none());
    }

    #[test]
    fn test_create_request_shape() {
        let request = CreateEngineRequest {
            display_name: "Travel Advisor Agent".into(),
            description: "d".into(),
            spec: EngineSpec {
                package_spec: PackageSpec {
                    pickle_object_gcs_uri: None,
                    dependency_files_gcs_uri: "gs://b/bundle.tar.gz".into(),
                    requirements_gcs_uri: "gs://b/requirements.txt".into(),
                    python_version: "3.12".into(),
                },
                deployment_spec: DeploymentSpec {
                    env: vec![EnvVar { name: "A".into(), value: "1".into() }],
                },
                agent_framework: "google-adk".into(),
                class_methods: adk_class_methods(),
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["displayName"], "Travel Advisor Agent");
        assert_eq!(value["spec"]["packageSpec"]["dependencyFilesGcsUri"], "gs://b/bundle.tar.gz");
        assert_eq!(value["spec"]["deploymentSpec"]["env"][0]["name"], "A");
        assert_eq!(value["spec"]["agentFramework"], "google-adk");
        assert_eq!(value["spec"]["packageSpec"]["pythonVersion"], "3.12");
        assert!(value["spec"]["packageSpec"].get("pickleObjectGcsUri").is_none());
    }

    #[test]
    fn test_class_methods_match_client_calls() {
        let methods = serde_json::to_value(adk_class_methods()).unwrap();
        let names: Vec<&str> =
            methods.as_array().unwrap().iter().map(|m| m["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["create_session", "list_sessions", "stream_query"]);
        assert_eq!(methods[2]["api_mode"], "stream");
        assert_eq!(methods[0]["api_mode"], "");
        assert_eq!(methods[2]["parameters"]["required"], json!(["user_id", "session_id", "message"]));
        assert_eq!(methods[1]["parameters"]["properties"]["user_id"]["type"], "string");
    }
}
