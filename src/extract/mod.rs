use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod readability;

pub use readability::ReadabilityClient;

/// Generic message returned when the collaborator faults
pub const EXTRACTION_FAULT_MESSAGE: &str = "An error occurred while extracting content";

/// Message used when the collaborator reports failure without saying why
pub const EXTRACTION_FAILED_MESSAGE: &str = "Failed to extract content";

/// Raw reply of the extraction collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorResponse {
    pub success: bool,
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub byline: Option<String>,
    pub site_name: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Extractor request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Extractor returned an unusable response: {0}")]
    InvalidResponse(String),
}

/// Readability-style content extraction for a URL
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<ExtractorResponse, ExtractorError>;
}

/// Normalized result handed back to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            title: None,
            content: None,
            excerpt: None,
            byline: None,
            site_name: None,
            error: Some(message.into()),
        }
    }
}

impl From<ExtractorResponse> for ExtractionOutcome {
    fn from(response: ExtractorResponse) -> Self {
        if !response.success {
            return Self::failure(
                response
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| EXTRACTION_FAILED_MESSAGE.to_string()),
            );
        }

        Self {
            success: true,
            title: response.title,
            content: Some(response.content.unwrap_or_default()),
            excerpt: response.excerpt,
            byline: response.byline,
            site_name: response.site_name,
            error: None,
        }
    }
}

/// Run the extractor for `url` and normalize whatever comes back.
///
/// Never fails: collaborator faults are logged and turned into a generic
/// failure outcome.
pub async fn extract_content(extractor: &dyn ContentExtractor, url: &str) -> ExtractionOutcome {
    match extractor.extract(url).await {
        Ok(response) => {
            let outcome = ExtractionOutcome::from(response);
            if !outcome.success {
                tracing::warn!("Extraction of {} reported failure: {:?}", url, outcome.error);
            }
            outcome
        }
        Err(e) => {
            tracing::error!("Extraction of {} failed: {}", url, e);
            ExtractionOutcome::failure(EXTRACTION_FAULT_MESSAGE)
        }
    }
}
