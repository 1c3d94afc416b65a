use std::fmt;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use sb_core::GenerationParams;

pub mod audit;
pub mod client;
pub mod models;
pub mod prompt;

/// Which `InferenceModel` implementation to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Any server speaking the OpenAI chat-completions API (vLLM, Ollama, ...)
    #[default]
    OpenAi,
    /// Offline echo model, no network
    Dummy,
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "dummy" => Ok(Self::Dummy),
            other => Err(format!("Unknown backend: {} (expected openai or dummy)", other)),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub backend: Backend,
    pub api_base: String,
    pub api_key: String,
    pub default_model: String,
    pub generation: GenerationParams,
    /// Per-attempt limit for every outbound call
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub response_log: PathBuf,
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("backend", &self.backend)
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("default_model", &self.default_model)
            .field("generation", &self.generation)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("response_log", &self.response_log)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            api_base: "http://localhost:8000/v1".to_string(),
            api_key: "not-needed".to_string(),
            default_model: "gemma".to_string(),
            generation: GenerationParams::default(),
            timeout_secs: 120,
            max_attempts: 3,
            response_log: PathBuf::from("responses/responses.jsonl"),
        }
    }
}

pub mod prelude {
    pub use super::{Backend, InferenceConfig};
    pub use super::client::{ModelClient, RetryPolicy};
    pub use super::models::create_model;
    pub use super::prompt::{format_chat_prompt, summary_prompt};
    pub use sb_core::{ChatMessage, GenerationParams, ModelDescriptor, Result, Error};
}

pub use client::ModelClient;
pub use models::create_model;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_debug_redacts_key() {
        let config = InferenceConfig {
            api_key: "sk-secret".to_string(),
            ..Default::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: InferenceConfig =
            serde_json::from_str(r#"{"api_base": "http://gpu-box:8000/v1", "backend": "dummy"}"#).unwrap();
        assert_eq!(config.api_base, "http://gpu-box:8000/v1");
        assert_eq!(config.backend, Backend::Dummy);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.generation, GenerationParams::default());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("OpenAI".parse::<Backend>().unwrap(), Backend::OpenAi);
        assert_eq!("dummy".parse::<Backend>().unwrap(), Backend::Dummy);
        assert!("ollama".parse::<Backend>().is_err());
    }
}
