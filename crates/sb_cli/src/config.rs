use std::fs;
use std::path::Path;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use sb_inference::{Backend, InferenceConfig};
use sb_metrics::MetricsConfig;
use sb_pipeline::PipelineConfig;
use sb_storage::StorageConfig;

/// Everything the commands need, built once in `main`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub inference: InferenceConfig,
    pub storage: StorageConfig,
    pub metrics: MetricsConfig,
    pub pipeline: PipelineConfig,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub backend: Option<Backend>,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(api_base) = overrides.api_base {
            self.inference.api_base = api_base;
        }
        if let Some(api_key) = overrides.api_key {
            self.inference.api_key = api_key;
        }
        if let Some(backend) = overrides.backend {
            self.inference.backend = backend;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_metrics::EmbedderKind;
    use std::path::PathBuf;

    #[test]
    fn test_missing_path_uses_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.inference.api_base, "http://localhost:8000/v1");
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.metrics.batch_size, 32);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sb.json");
        fs::write(
            &path,
            r#"{"inference": {"default_model": "phi"}, "metrics": {"embedder": "lexical"}}"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(config.inference.default_model, "phi");
        assert_eq!(config.inference.max_attempts, 3);
        assert_eq!(config.metrics.embedder, EmbedderKind::Lexical);
        assert_eq!(config.storage.summaries_dir, PathBuf::from("summaries"));
    }

    #[test]
    fn test_flags_override_file() {
        let config = AppConfig::default().apply(Overrides {
            api_base: Some("http://gpu:8000/v1".to_string()),
            api_key: None,
            backend: Some(Backend::Dummy),
        });
        assert_eq!(config.inference.api_base, "http://gpu:8000/v1");
        assert_eq!(config.inference.api_key, "not-needed");
        assert_eq!(config.inference.backend, Backend::Dummy);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
