//! Session identifiers and the SQLite-backed session store.
//!
//! The store itself is `adk_session::DatabaseSessionService`; this module
//! only opens it and passes identifiers through.

use crate::error::{Result, TravelError};
use adk_core::AdkError;
use adk_session::{CreateRequest, DatabaseSessionService, GetRequest, Session, SessionService};
use std::collections::HashMap;
use std::fmt;

/// (app name, user id, session id). All three must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    app_name: String,
    user_id: String,
    session_id: String,
}

fn require(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TravelError::InvalidIdentifier(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

impl SessionKey {
    pub fn new(
        app_name: impl AsRef<str>,
        user_id: impl AsRef<str>,
        session_id: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            app_name: require("app_name", app_name.as_ref())?,
            user_id: require("user_id", user_id.as_ref())?,
            session_id: require("session_id", session_id.as_ref())?,
        })
    }

    /// A key with a freshly generated session id.
    pub fn generate(app_name: impl AsRef<str>, user_id: impl AsRef<str>) -> Result<Self> {
        Self::new(app_name, user_id, uuid::Uuid::new_v4().to_string())
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.app_name, self.user_id, self.session_id)
    }
}

/// Connects to the session database and applies the framework's schema.
#[tracing::instrument]
pub async fn open_session_store(database_url: &str) -> Result<DatabaseSessionService> {
    let service = DatabaseSessionService::new(database_url).await?;
    service.migrate().await?;
    tracing::info!("session store ready");
    Ok(service)
}

/// Fetches the session for `key`, creating it on first use.
pub async fn ensure_session(
    service: &dyn SessionService,
    key: &SessionKey,
) -> Result<Box<dyn Session>> {
    let existing = service
        .get(GetRequest {
            app_name: key.app_name.clone(),
            user_id: key.user_id.clone(),
            session_id: key.session_id.clone(),
            num_recent_events: None,
            after: None,
        })
        .await;

    match existing {
        Ok(session) => Ok(session),
        Err(AdkError::Session(message)) if is_not_found(&message) => {
            tracing::debug!(session = %key, "creating session");
            let session = service
                .create(CreateRequest {
                    app_name: key.app_name.clone(),
                    user_id: key.user_id.clone(),
                    session_id: Some(key.session_id.clone()),
                    state: HashMap::new(),
                })
                .await?;
            Ok(session)
        }
        Err(e) => {
            tracing::debug!(session = %key, error = %e, "session lookup failed");
            Err(e.into())
        }
    }
}

fn is_not_found(message: &str) -> bool {
    message.to_ascii_lowercase().contains("not found")
}

/// Creates a session with a generated id and returns its key.
pub async fn new_session(
    service: &dyn SessionService,
    app_name: &str,
    user_id: &str,
) -> Result<SessionKey> {
    let key = SessionKey::generate(app_name, user_id)?;
    service
        .create(CreateRequest {
            app_name: key.app_name.clone(),
            user_id: key.user_id.clone(),
            session_id: Some(key.session_id.clone()),
            state: HashMap::new(),
        })
        .await?;
    Ok(key)
}
