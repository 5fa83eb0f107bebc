use adk_core::{
    AdkError, CallbackContext, Content, EventActions, MemoryEntry, ReadonlyContext, Result, Tool,
    ToolContext,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use travel_advisor::tools::{ExchangeRateTool, LocalAttractionsTool, WeatherTool};
use travel_advisor::travel_tools;

struct MockToolContext {
    actions: EventActions,
    content: Content,
}

impl MockToolContext {
    fn new() -> Self {
        Self { actions: EventActions::default(), content: Content::new("user") }
    }
}

#[async_trait]
impl ReadonlyContext for MockToolContext {
    fn invocation_id(&self) -> &str { "inv-1" }
    fn agent_name(&self) -> &str { "travel_advisor_agent" }
    fn user_id(&self) -> &str { "u_123" }
    fn app_name(&self) -> &str { "travel_advisor_agent" }
    fn session_id(&self) -> &str { "session-1" }
    fn branch(&self) -> &str { "" }
    fn user_content(&self) -> &Content { &self.content }
}

#[async_trait]
impl CallbackContext for MockToolContext {
    fn artifacts(&self) -> Option<Arc<dyn adk_core::Artifacts>> { None }
}

#[async_trait]
impl ToolContext for MockToolContext {
    fn function_call_id(&self) -> &str { "call-1" }
    fn actions(&self) -> &EventActions { &self.actions }
    async fn search_memory(&self, _query: &str) -> Result<Vec<MemoryEntry>> {
        Ok(vec![])
    }
}

fn ctx() -> Arc<dyn ToolContext> {
    Arc::new(MockToolContext::new())
}

#[tokio::test]
async fn test_weather_tool_returns_flat_outcome() {
    let result = WeatherTool.execute(ctx(), json!({"location": "Laos"})).await.unwrap();
    assert_eq!(result["status"], "success");
    assert_eq!(result["location"], "Vientiane");
    assert_eq!(result["temperature_c"], 32);
    assert!(result.get("message").is_none());
    assert!(result.get("value").is_none());
}

#[tokio::test]
async fn test_weather_tool_not_found_carries_message() {
    let result = WeatherTool.execute(ctx(), json!({"location": "Atlantis"})).await.unwrap();
    assert_eq!(result["status"], "not_found");
    assert!(result["message"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn test_weather_tool_rejects_missing_args() {
    let err = WeatherTool.execute(ctx(), json!({})).await.unwrap_err();
    assert!(matches!(err, AdkError::Tool(ref m) if m.starts_with("get_weather")));
}

#[tokio::test]
async fn test_exchange_tool() {
    let result = ExchangeRateTool
        .execute(ctx(), json!({"base_currency": "USD", "target_currency": "KRW"}))
        .await
        .unwrap();
    assert_eq!(result["status"], "success");
    assert_eq!(result["rate"], 1380.0);

    let result = ExchangeRateTool
        .execute(ctx(), json!({"base_currency": "USD", "target_currency": "DOLLARS"}))
        .await
        .unwrap();
    assert_eq!(result["status"], "error");

    let err = ExchangeRateTool.execute(ctx(), json!({"base_currency": "USD"})).await.unwrap_err();
    assert!(matches!(err, AdkError::Tool(_)));
}

#[tokio::test]
async fn test_attractions_tool() {
    let result =
        LocalAttractionsTool.execute(ctx(), json!({"location": "Luang Prabang"})).await.unwrap();
    assert_eq!(result["status"], "success");
    assert!(!result["attractions"].as_array().unwrap().is_empty());

    let err = LocalAttractionsTool.execute(ctx(), json!({"location": 7})).await.unwrap_err();
    assert!(matches!(err, AdkError::Tool(_)));
}

#[tokio::test]
async fn test_registered_tools_declare_required_params() {
    for tool in travel_tools() {
        let schema = tool.parameters_schema().unwrap();
        assert_eq!(schema["type"], "object", "{}", tool.name());
        assert!(!schema["required"].as_array().unwrap().is_empty(), "{}", tool.name());
    }
}
