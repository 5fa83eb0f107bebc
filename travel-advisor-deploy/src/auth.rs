//! Google Cloud credentials for the staging and Agent Engine clients.

use crate::error::{DeployError, Result};
use async_trait::async_trait;
use google_cloud_auth::credentials::{self, CacheableResource, Credentials};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::sync::{Arc, RwLock};

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Environment variable holding a pre-minted OAuth access token.
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Produces the authorization headers attached to every API request.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn auth_headers(&self) -> Result<HeaderMap>;
}

/// Application Default Credentials with the cloud-platform scope.
pub struct AdcTokenSource {
    credentials: Credentials,
    cached: RwLock<Option<HeaderMap>>,
}

impl AdcTokenSource {
    pub fn new() -> Result<Self> {
        let credentials = credentials::Builder::default()
            .with_scopes([CLOUD_PLATFORM_SCOPE])
            .build()
            .map_err(|e| DeployError::Auth(format!("failed to build ADC credentials: {e}")))?;
        Ok(Self::with_credentials(credentials))
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self { credentials, cached: RwLock::new(None) }
    }
}

#[async_trait]
impl TokenSource for AdcTokenSource {
    async fn auth_headers(&self) -> Result<HeaderMap> {
        let headers = self.credentials.headers(Default::default()).await.map_err(|e| {
            DeployError::Auth(format!("failed to obtain google cloud auth headers: {e}"))
        })?;

        match headers {
            CacheableResource::New { data, .. } => {
                let mut cached = self
                    .cached
                    .write()
                    .map_err(|_| DeployError::Auth("auth header cache poisoned".to_string()))?;
                *cached = Some(data.clone());
                Ok(data)
            }
            CacheableResource::NotModified => self
                .cached
                .read()
                .map_err(|_| DeployError::Auth("auth header cache poisoned".to_string()))?
                .clone()
                .ok_or_else(|| {
                    DeployError::Auth(
                        "credentials returned NotModified before any headers were cached"
                            .to_string(),
                    )
                }),
        }
    }
}

/// A fixed bearer token.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn auth_headers(&self) -> Result<HeaderMap> {
        let value = HeaderValue::from_str(&format!("Bearer {}", self.token))
            .map_err(|e| DeployError::Auth(format!("invalid access token: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }
}

/// `GOOGLE_OAUTH_ACCESS_TOKEN` when set, Application Default Credentials otherwise.
pub fn token_source_from_env() -> Result<Arc<dyn TokenSource>> {
    match std::env::var(ACCESS_TOKEN_ENV).ok().filter(|token| !token.trim().is_empty()) {
        Some(token) => {
            tracing::debug!("using access token from {ACCESS_TOKEN_ENV}");
            Ok(Arc::new(StaticToken::new(token.trim())))
        }
        None => Ok(Arc::new(AdcTokenSource::new()?)),
    }
}
