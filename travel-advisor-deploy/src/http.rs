//! Request plumbing shared by the Google Cloud clients.

use crate::auth::TokenSource;
use crate::error::{DeployError, Result};
use reqwest::RequestBuilder;
use serde_json::{Map, Value};

const MAX_ERROR_BODY: usize = 512;

/// Trims a trailing slash and upgrades plain `http://` to `https://` unless the
/// endpoint is local.
pub(crate) fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.starts_with("https://") || is_local(endpoint) {
        endpoint.to_string()
    } else {
        format!("https://{}", endpoint.trim_start_matches("http://"))
    }
}

fn is_local(endpoint: &str) -> bool {
    endpoint.starts_with("http://127.0.0.1") || endpoint.starts_with("http://localhost")
}

pub(crate) fn truncate_for_error(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

pub(crate) async fn authorize(
    tokens: &dyn TokenSource,
    request: RequestBuilder,
) -> Result<RequestBuilder> {
    Ok(request.headers(tokens.auth_headers().await?))
}

/// Fails with [`DeployError::Api`] on a non-2xx status.
pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let body = if body.trim().is_empty() { "<empty body>".to_string() } else { body };
    Err(DeployError::Api { status: status.as_u16(), body: truncate_for_error(&body) })
}

/// Sends the request and decodes a JSON body; an empty body decodes to `{}`.
pub(crate) async fn send_json(tokens: &dyn TokenSource, request: RequestBuilder) -> Result<Value> {
    let response = check(authorize(tokens, request).await?.send().await?).await?;
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(
            normalize_endpoint("https://us-central1-aiplatform.googleapis.com/"),
            "https://us-central1-aiplatform.googleapis.com"
        );
        assert_eq!(normalize_endpoint("http://example.com"), "https://example.com");
        assert_eq!(normalize_endpoint("http://127.0.0.1:8080"), "http://127.0.0.1:8080");
        assert_eq!(normalize_endpoint("http://localhost:9000"), "http://localhost:9000");
    }

    #[test]
    fn test_truncate_for_error() {
        assert_eq!(truncate_for_error("short"), "short");
        let long = "é".repeat(400);
        let truncated = truncate_for_error(&long);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= MAX_ERROR_BODY + 3);
    }
}
