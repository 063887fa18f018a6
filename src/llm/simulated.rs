//! Offline provider that answers every request with a fixed analysis.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{CompletionProvider, LlmError};
use crate::models::AnalysisResult;

/// Returns the sample analysis as completion text, optionally after a delay.
///
/// The text still goes through the response parser, so the full server path
/// is exercised without an LLM.
#[derive(Debug, Clone, Default)]
pub struct SimulatedProvider {
    delay: Duration,
}

impl SimulatedProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CompletionProvider for SimulatedProvider {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn complete(&self, _system_prompt: &str, document: &str) -> Result<String, LlmError> {
        debug!(
            "Simulating analysis of {} bytes (delay {:?})",
            document.len(),
            self.delay
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(AnalysisResult::sample().to_completion_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_completion_is_four_sections() {
        let provider = SimulatedProvider::default();
        let text = provider.complete("system", "case text").await.unwrap();
        assert!(text.starts_with("1. "));
        assert!(text.contains("\n2. "));
        assert!(text.contains("\n3. "));
        assert!(text.contains("\n4. "));
    }
}
