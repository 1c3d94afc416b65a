use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use sb_core::{ChatMessage, Error, GenerationParams, InferenceModel, ModelDescriptor, Result};
use crate::audit::AuditLog;
use crate::InferenceConfig;

/// Timeout and exponential backoff applied to every outbound call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(120),
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(32),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &InferenceConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            timeout: Duration::from_secs(config.timeout_secs),
            ..Default::default()
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Soft-failing front for an `InferenceModel`.
///
/// Nothing here returns an error: failures are logged and surface as an empty
/// model list or `None`, so callers can treat "no answer" uniformly.
pub struct ModelClient {
    model: Arc<dyn InferenceModel>,
    params: GenerationParams,
    retry: RetryPolicy,
    audit: Option<AuditLog>,
}

impl ModelClient {
    pub fn new(model: Arc<dyn InferenceModel>, params: GenerationParams, retry: RetryPolicy) -> Self {
        Self { model, params, retry, audit: None }
    }

    pub fn from_config(model: Arc<dyn InferenceModel>, config: &InferenceConfig) -> Self {
        Self::new(model, config.generation.clone(), RetryPolicy::from_config(config))
            .with_audit_log(AuditLog::new(config.response_log.clone()))
    }

    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn backend_name(&self) -> &str {
        self.model.name()
    }

    pub async fn list_models(&self) -> Vec<ModelDescriptor> {
        match self.with_retry("list models", || self.model.list_models()).await {
            Ok(models) => {
                info!("📋 {} models available from {}", models.len(), self.model.name());
                models
            }
            Err(e) => {
                error!("Failed to list models: {}", e);
                Vec::new()
            }
        }
    }

    /// Run one completion with the configured parameters.
    pub async fn generate(&self, messages: &[ChatMessage], model: &str) -> Option<String> {
        self.generate_with(messages, model, &self.params).await
    }

    /// Run one completion with a caller-supplied parameter set that replaces the configured one.
    pub async fn generate_with(
        &self,
        messages: &[ChatMessage],
        model: &str,
        params: &GenerationParams,
    ) -> Option<String> {
        if params.stream {
            error!("Generation failed: streaming responses are not supported");
            return None;
        }

        let completion = match self
            .with_retry("chat completion", || self.model.chat(messages, model, params))
            .await
        {
            Ok(completion) => completion,
            Err(e) => {
                error!("Generation failed: {}", e);
                return None;
            }
        };

        if let Some(audit) = &self.audit {
            if let Err(e) = audit.append(model, messages, &completion.raw) {
                warn!("Failed to write response log {}: {}", audit.path().display(), e);
            }
        }
        Some(completion.content)
    }

    async fn with_retry<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = match tokio::time::timeout(self.retry.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(Error::Timeout(self.retry.timeout)),
            };

            match result {
                Ok(value) => {
                    if attempt > 1 {
                        debug!("{} succeeded on attempt {}", what, attempt);
                    }
                    return Ok(value);
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let wait = self.retry.backoff(attempt);
                    warn!(
                        attempt,
                        max_attempts,
                        backoff_ms = wait.as_millis() as u64,
                        error = %e,
                        "Retrying {} after transient error",
                        what
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
