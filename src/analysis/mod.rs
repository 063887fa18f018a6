//! Server-side document analysis.
//!
//! Validates the submitted document, asks the completion provider for a
//! four-section analysis, and parses the completion into an
//! [`AnalysisResult`]. Every failure is terminal for the request.

mod parser;

pub use parser::{parse_completion, parse_completion_with, ParseError, SectionMapping};

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::llm::{CompletionProvider, LlmConfig, LlmError};
use crate::models::AnalysisResult;

/// Errors from the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Request body is not valid JSON: {0}")]
    MalformedRequest(String),

    #[error("Document content is required")]
    MissingDocumentContent,

    #[error("Document content must be a string")]
    InvalidDocumentContent,

    #[error("Upstream provider error: {0}")]
    UpstreamProviderError(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl AnalysisError {
    /// Message safe to return to the caller. Provider failures are reported
    /// generically; everything else is returned as-is.
    pub fn public_message(&self) -> String {
        match self {
            AnalysisError::UpstreamProviderError(_) => {
                "Upstream provider request failed".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Body of `POST /analyze-document`.
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(rename = "documentContent", default)]
    document_content: Option<serde_json::Value>,
}

/// Decode and validate a raw request body, returning the document text.
///
/// Missing, null, empty and whitespace-only content are all rejected before
/// any provider call.
pub fn document_from_body(body: &[u8]) -> Result<String, AnalysisError> {
    let request: AnalyzeRequest = serde_json::from_slice(body)
        .map_err(|e| AnalysisError::MalformedRequest(e.to_string()))?;

    match request.document_content {
        None | Some(serde_json::Value::Null) => Err(AnalysisError::MissingDocumentContent),
        Some(serde_json::Value::String(text)) => {
            if text.trim().is_empty() {
                Err(AnalysisError::MissingDocumentContent)
            } else {
                Ok(text)
            }
        }
        Some(_) => Err(AnalysisError::InvalidDocumentContent),
    }
}

/// Runs one document through the provider and the parser.
#[derive(Clone)]
pub struct AnalysisService {
    provider: Arc<dyn CompletionProvider>,
    system_prompt: String,
    mapping: SectionMapping,
}

impl AnalysisService {
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &LlmConfig) -> Self {
        Self {
            provider,
            system_prompt: config.get_system_prompt().to_string(),
            mapping: config.section_mapping,
        }
    }

    pub fn with_mapping(mut self, mapping: SectionMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Analyze one document.
    pub async fn analyze(&self, document: &str) -> Result<AnalysisResult, AnalysisError> {
        if document.trim().is_empty() {
            return Err(AnalysisError::MissingDocumentContent);
        }

        info!(
            "Received document for analysis, length: {}",
            document.len()
        );
        let completion = self
            .provider
            .complete(&self.system_prompt, document)
            .await?;
        debug!("Completion length: {}", completion.len());

        let result = parse_completion_with(&completion, self.mapping)?;
        info!(
            "Parsed analysis with {} bullets via {}",
            result.bullet_count(),
            self.provider.name()
        );
        Ok(result)
    }
}
