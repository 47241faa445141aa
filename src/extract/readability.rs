use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::{ContentExtractor, ExtractorError, ExtractorResponse};
use crate::config::ExtractorConfig;

/// HTTP client for the readability extraction service.
///
/// `POST {endpoint}` with `{"url": ...}`; the service answers with an
/// [`ExtractorResponse`] body.
pub struct ReadabilityClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ReadabilityClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ExtractorError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("clarity-web/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::new(config.url.clone(), config.timeout())
    }
}

#[async_trait]
impl ContentExtractor for ReadabilityClient {
    async fn extract(&self, url: &str) -> Result<ExtractorResponse, ExtractorError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await?
            .error_for_status()?;

        response
            .json::<ExtractorResponse>()
            .await
            .map_err(|e| ExtractorError::InvalidResponse(e.to_string()))
    }
}
