use async_trait::async_trait;
use crate::types::{ChatCompletion, ChatMessage, GenerationParams, ModelDescriptor};
use crate::Result;

#[async_trait]
pub trait InferenceModel: Send + Sync {
    /// Short backend name used in log lines
    fn name(&self) -> &str;

    /// Models currently served by the backend
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>>;

    /// Run one chat completion and return the reply with its raw payload
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        params: &GenerationParams,
    ) -> Result<ChatCompletion>;
}
