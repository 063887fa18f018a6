//! LLM client configuration.

use serde::{Deserialize, Serialize};

use super::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::analysis::SectionMapping;

/// LLM provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Canned analysis, no network (default)
    #[default]
    Simulated,
    /// Ollama API (local)
    Ollama,
    /// OpenAI-compatible API (OpenAI, Groq, Together.ai, etc.)
    OpenAI,
}

impl LlmProvider {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "simulated" | "mock" => Some(Self::Simulated),
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
        }
    }
}

/// Configuration for the upstream completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// LLM provider (simulated, ollama or openai)
    #[serde(default)]
    pub provider: LlmProvider,
    /// API endpoint (provider-specific defaults apply)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// API key for OpenAI-compatible providers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model to use for analysis
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Custom system prompt (must still ask for four numbered sections)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Maximum bytes of document content to send to the LLM (cut on a UTF-8 boundary)
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Artificial delay for the simulated provider, in milliseconds
    #[serde(default)]
    pub simulated_delay_ms: u64,
    /// How parsed sections are matched to analysis keys
    #[serde(default)]
    pub section_mapping: SectionMapping,
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_content_chars() -> usize {
    24000
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self::base_default().with_env_overrides()
    }
}

impl LlmConfig {
    /// Base default without env overrides.
    pub fn base_default() -> Self {
        Self {
            provider: LlmProvider::default(),
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            system_prompt: None,
            max_content_chars: default_max_content_chars(),
            timeout_secs: default_timeout_secs(),
            simulated_delay_ms: 0,
            section_mapping: SectionMapping::default(),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `LLM_PROVIDER`: "simulated" (default), "ollama", "openai", "groq", or "together"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key for OpenAI-compatible providers
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_TEMPERATURE`: Generation temperature (0.0-1.0)
    /// - `LLM_MAX_CONTENT_CHARS`: Max document bytes to send
    /// - `LLM_SYSTEM_PROMPT`: Custom system prompt
    /// - `LLM_SECTION_MAPPING`: "auto", "headers" or "positional"
    ///
    /// Without `LLM_PROVIDER`, a `GROQ_API_KEY` or `OPENAI_API_KEY` in the
    /// environment selects the matching OpenAI-compatible provider.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let explicit_provider = var("LLM_PROVIDER");
        if let Some(ref val) = explicit_provider {
            if let Some(provider) = LlmProvider::from_name(val) {
                self.provider = provider;
            }
        }

        let explicit_endpoint = var("LLM_ENDPOINT");
        if let Some(ref endpoint) = explicit_endpoint {
            self.endpoint = endpoint.clone();
        }

        if let Some(val) = var("LLM_API_KEY") {
            self.api_key = Some(val);
        }

        if let Some(ref provider_str) = explicit_provider {
            let provider_lower = provider_str.to_lowercase();

            if explicit_endpoint.is_none() {
                match provider_lower.as_str() {
                    "groq" => self.endpoint = "https://api.groq.com/openai".to_string(),
                    "openai" => self.endpoint = "https://api.openai.com".to_string(),
                    "together" => self.endpoint = "https://api.together.xyz".to_string(),
                    _ => {}
                }
            }

            if self.api_key.is_none() {
                match provider_lower.as_str() {
                    "groq" => self.api_key = var("GROQ_API_KEY"),
                    "openai" => self.api_key = var("OPENAI_API_KEY"),
                    _ => {}
                }
            }
        } else if self.api_key.is_none() {
            if let Some(key) = var("GROQ_API_KEY") {
                self.api_key = Some(key);
                self.provider = LlmProvider::OpenAI;
                if explicit_endpoint.is_none() {
                    self.endpoint = "https://api.groq.com/openai".to_string();
                }
            } else if let Some(key) = var("OPENAI_API_KEY") {
                self.api_key = Some(key);
                self.provider = LlmProvider::OpenAI;
                if explicit_endpoint.is_none() {
                    self.endpoint = "https://api.openai.com".to_string();
                }
            }
        }

        if let Some(val) = var("LLM_MODEL") {
            self.model = val;
        }
        if let Some(n) = var("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        if let Some(n) = var("LLM_MAX_CONTENT_CHARS").and_then(|v| v.parse().ok()) {
            self.max_content_chars = n;
        }
        if let Some(val) = var("LLM_SYSTEM_PROMPT") {
            self.system_prompt = Some(val);
        }
        if let Some(mapping) = var("LLM_SECTION_MAPPING").and_then(|v| SectionMapping::from_name(&v))
        {
            self.section_mapping = mapping;
        }
        self
    }

    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Get the system prompt, using custom or default.
    pub fn get_system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_base_default_is_simulated() {
        let config = LlmConfig::base_default();
        assert_eq!(config.provider, LlmProvider::Simulated);
        assert!(config.system_prompt.is_none());
        assert!(config.get_system_prompt().contains("1. Case Overview"));
    }

    #[test]
    fn test_groq_key_autodetects_provider() {
        let config = LlmConfig::base_default().with_overrides(lookup(&[("GROQ_API_KEY", "gsk")]));
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.endpoint, "https://api.groq.com/openai");
        assert_eq!(config.api_key.as_deref(), Some("gsk"));
    }

    #[test]
    fn test_explicit_provider_wins() {
        let config = LlmConfig::base_default().with_overrides(lookup(&[
            ("LLM_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-1"),
            ("GROQ_API_KEY", "gsk"),
            ("LLM_MODEL", "gpt-4o-mini"),
        ]));
        assert_eq!(config.provider, LlmProvider::OpenAI);
        assert_eq!(config.endpoint, "https://api.openai.com");
        assert_eq!(config.api_key.as_deref(), Some("sk-1"));
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_numeric_and_mapping_overrides() {
        let config = LlmConfig::base_default().with_overrides(lookup(&[
            ("LLM_MAX_TOKENS", "2048"),
            ("LLM_TEMPERATURE", "not-a-number"),
            ("LLM_SECTION_MAPPING", "Headers"),
        ]));
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.section_mapping, SectionMapping::Headers);
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(LlmProvider::from_name("Groq"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::from_name("mock"), Some(LlmProvider::Simulated));
        assert_eq!(LlmProvider::from_name("bard"), None);
    }
}
