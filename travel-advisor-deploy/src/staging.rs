//! Uploads deployment artifacts to the Cloud Storage staging bucket.

use crate::auth::TokenSource;
use crate::error::Result;
use crate::http::{normalize_endpoint, send_json};
use crate::manifest::parse_gcs_uri;
use std::sync::Arc;

pub const STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

#[derive(Clone)]
pub struct StagingClient {
    http: reqwest::Client,
    endpoint: String,
    tokens: Arc<dyn TokenSource>,
}

impl StagingClient {
    pub fn new(tokens: Arc<dyn TokenSource>) -> Self {
        Self { http: reqwest::Client::new(), endpoint: STORAGE_ENDPOINT.to_string(), tokens }
    }

    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Self {
        self.endpoint = normalize_endpoint(endpoint.as_ref());
        self
    }

    /// Uploads `bytes` as `object` under the `gs://bucket[/prefix]` location and
    /// returns the object's `gs://` URI.
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(
        &self,
        bucket_uri: &str,
        object: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let (bucket, prefix) = parse_gcs_uri(bucket_uri)?;
        let object = if prefix.is_empty() { object.to_string() } else { format!("{prefix}/{object}") };

        let url = format!("{}/upload/storage/v1/b/{bucket}/o", self.endpoint);
        let request = self
            .http
            .post(url)
            .query(&[("uploadType", "media"), ("name", object.as_str())])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        send_json(self.tokens.as_ref(), request).await?;

        let uri = format!("gs://{bucket}/{object}");
        tracing::info!(%uri, "uploaded");
        Ok(uri)
    }
}
