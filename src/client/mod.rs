//! HTTP client for the document analysis endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::models::AnalysisResult;

/// Message shown to the user for any failed attempt.
pub const GENERIC_FAILURE: &str = "Failed to analyze document. Please try again.";

/// Errors from a single analysis attempt. All are terminal for the attempt.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Document is empty")]
    EmptyDocument,

    #[error("Analysis request failed: {0}")]
    NetworkOrServerError(String),

    #[error("Analysis response has an unexpected shape: {0}")]
    InvalidResponseShape(String),
}

impl ClientError {
    /// Text suitable for display; details stay in the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            ClientError::EmptyDocument => "The selected document has no text to analyze.",
            _ => GENERIC_FAILURE,
        }
    }
}

/// Anything that can turn document text into an analysis.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, document: &str) -> Result<AnalysisResult, ClientError>;
}

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    #[serde(rename = "documentContent")]
    document_content: &'a str,
}

/// Client for `POST {endpoint}` with `{"documentContent": ...}`.
pub struct AnalysisClient {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl AnalysisClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::NetworkOrServerError(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, document: &str) -> Result<AnalysisResult, ClientError> {
        if document.trim().is_empty() {
            return Err(ClientError::EmptyDocument);
        }

        let mut request = self.client.post(&self.endpoint).json(&AnalyzeRequest {
            document_content: document,
        });
        if let Some(ref key) = self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        debug!("POST {} ({} bytes)", self.endpoint, document.len());
        let resp = request
            .send()
            .await
            .map_err(|e| ClientError::NetworkOrServerError(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ClientError::NetworkOrServerError(e.to_string()))?;

        if !status.is_success() {
            let detail = server_error_message(&body)
                .unwrap_or_else(|| String::from_utf8_lossy(&body).into_owned());
            warn!("Analysis endpoint returned {}: {}", status, detail);
            return Err(ClientError::NetworkOrServerError(format!(
                "HTTP {}: {}",
                status, detail
            )));
        }

        parse_result(&body)
    }
}

/// Extract `error` from a `{ "error": "..." }` body.
fn server_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

fn parse_result(body: &[u8]) -> Result<AnalysisResult, ClientError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ClientError::InvalidResponseShape(format!("not JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ClientError::InvalidResponseShape(
            "expected a JSON object".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| ClientError::InvalidResponseShape(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::SectionKey;

    #[tokio::test]
    async fn test_empty_document_fails_fast() {
        // Port 9 (discard) is never contacted: the check happens first.
        let config = ClientConfig {
            endpoint: "http://127.0.0.1:9/analyze-document".to_string(),
            ..ClientConfig::default()
        };
        let client = AnalysisClient::new(&config).unwrap();

        for doc in ["", "   ", "\n\t"] {
            let err = client.analyze(doc).await.unwrap_err();
            assert!(matches!(err, ClientError::EmptyDocument));
        }
    }

    #[test]
    fn test_parse_result_shapes() {
        let good = serde_json::to_vec(&AnalysisResult::sample()).unwrap();
        let result = parse_result(&good).unwrap();
        assert_eq!(result.get(SectionKey::Settlement).content.len(), 4);

        assert!(matches!(
            parse_result(b"<html>oops</html>"),
            Err(ClientError::InvalidResponseShape(_))
        ));
        assert!(matches!(
            parse_result(b"[1,2,3]"),
            Err(ClientError::InvalidResponseShape(_))
        ));
        assert!(matches!(
            parse_result(br#"{"overview":{"title":"x","content":[]}}"#),
            Err(ClientError::InvalidResponseShape(_))
        ));
    }

    #[test]
    fn test_server_error_message() {
        assert_eq!(
            server_error_message(br#"{"error":"Document content is required"}"#).as_deref(),
            Some("Document content is required")
        );
        assert_eq!(server_error_message(b"Bad Gateway"), None);
    }

    #[test]
    fn test_user_message_is_generic() {
        let err = ClientError::NetworkOrServerError("HTTP 500: secret detail".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        let err = ClientError::InvalidResponseShape("missing field".to_string());
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }
}
