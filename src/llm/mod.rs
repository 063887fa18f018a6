//! LLM integration for mediation analysis.
//!
//! The analysis service only sees [`CompletionProvider`]; the concrete
//! provider is chosen from [`LlmConfig`].

mod client;
mod simulated;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

pub use client::{LlmClient, LlmConfig, LlmError, LlmProvider, DEFAULT_SYSTEM_PROMPT};
pub use simulated::SimulatedProvider;

/// Something that turns a system prompt plus document text into one
/// free-text completion.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Short provider name for logs and health output.
    fn name(&self) -> &str;

    async fn complete(&self, system_prompt: &str, document: &str) -> Result<String, LlmError>;
}

/// Build the provider selected by the configuration.
pub fn provider_from_config(config: &LlmConfig) -> Result<Arc<dyn CompletionProvider>, LlmError> {
    match config.provider {
        LlmProvider::Simulated => Ok(Arc::new(SimulatedProvider::new(Duration::from_millis(
            config.simulated_delay_ms,
        )))),
        LlmProvider::Ollama | LlmProvider::OpenAI => Ok(Arc::new(LlmClient::new(config.clone())?)),
    }
}
