use adk_core::{Content, LlmResponse};
use adk_model::MockLlm;
use adk_session::{DatabaseSessionService, GetRequest, SessionService};
use std::sync::Arc;
use travel_advisor::{
    AGENT_NAME, Advisor, SessionKey, TravelError, build_agent, new_session, open_session_store,
};

async fn sessions() -> Arc<DatabaseSessionService> {
    Arc::new(open_session_store(":memory:").await.unwrap())
}

fn advisor_with_reply(sessions: Arc<DatabaseSessionService>, text: &str) -> Advisor {
    let model = MockLlm::new("mock")
        .with_response(LlmResponse::new(Content::new("model").with_text(text)));
    let agent = build_agent(Arc::new(model)).unwrap();
    Advisor::new(Arc::new(agent), sessions, AGENT_NAME).unwrap()
}

#[tokio::test]
async fn test_ask_returns_final_text() {
    let advisor = advisor_with_reply(sessions().await, "Seoul is cloudy today.");
    let key = advisor.new_key("u_123").unwrap();

    let reply = advisor.ask(&key, "What's the weather in Seoul?").await.unwrap();

    assert_eq!(reply.text, "Seoul is cloudy today.");
    assert!(reply.tool_calls.is_empty());
    assert!(reply.events.iter().any(|event| event.author == AGENT_NAME));
}

#[tokio::test]
async fn test_ask_creates_and_persists_session() {
    let store = sessions().await;
    let advisor = advisor_with_reply(store.clone(), "Pack an umbrella.");
    let key = SessionKey::new(AGENT_NAME, "u_123", "trip-1").unwrap();

    advisor.ask(&key, "Heading to London").await.unwrap();
    advisor.ask(&key, "Anything else?").await.unwrap();

    let session = store
        .get(GetRequest {
            app_name: AGENT_NAME.to_string(),
            user_id: "u_123".to_string(),
            session_id: "trip-1".to_string(),
            num_recent_events: None,
            after: None,
        })
        .await
        .unwrap();
    assert_eq!(session.id(), "trip-1");
    assert!(session.events().len() >= 2);
}

#[tokio::test]
async fn test_new_session_generates_distinct_ids() {
    let store = sessions().await;
    let a = new_session(store.as_ref(), AGENT_NAME, "u_123").await.unwrap();
    let b = new_session(store.as_ref(), AGENT_NAME, "u_123").await.unwrap();
    assert_ne!(a.session_id(), b.session_id());
}

#[tokio::test]
async fn test_file_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("sessions.db").display());
    let key = SessionKey::new(AGENT_NAME, "u_123", "trip-2").unwrap();

    {
        let store = Arc::new(open_session_store(&url).await.unwrap());
        let advisor = advisor_with_reply(store, "Bring sunscreen.");
        advisor.ask(&key, "Going to Bangkok").await.unwrap();
    }

    let reopened = open_session_store(&url).await.unwrap();
    let session = reopened
        .get(GetRequest {
            app_name: AGENT_NAME.to_string(),
            user_id: "u_123".to_string(),
            session_id: "trip-2".to_string(),
            num_recent_events: None,
            after: None,
        })
        .await
        .unwrap();
    assert!(dir.path().join("sessions.db").exists());
    assert!(session.events().len() >= 2);
}

#[test]
fn test_empty_user_is_rejected_before_running() {
    let err = SessionKey::new(AGENT_NAME, "", "s1").unwrap_err();
    assert!(matches!(err, TravelError::InvalidIdentifier(_)));
}
