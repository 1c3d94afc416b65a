use std::fmt;
use serde_json::json;
use sb_core::{ChatCompletion, ChatMessage, GenerationParams, ModelDescriptor, Result, Role};
use super::InferenceModel;

const SUMMARY_WORDS: usize = 20;

pub struct DummyModel;

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InferenceModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        Ok(vec![ModelDescriptor {
            id: "dummy".to_string(),
            root: Some("dummy".to_string()),
            max_model_len: Some(4096),
        }])
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        _params: &GenerationParams,
    ) -> Result<ChatCompletion> {
        // Echo the first words of the last user turn
        let input = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        let words: Vec<&str> = input.split_whitespace().take(SUMMARY_WORDS).collect();
        let content = words.join(" ");

        let raw = json!({
            "object": "chat.completion",
            "model": model,
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        });
        Ok(ChatCompletion { content, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dummy_model() {
        let model = DummyModel::new();

        let models = model.list_models().await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "dummy");

        let messages = vec![
            ChatMessage::system("You are a helpful assistant."),
            ChatMessage::user("This is a test article. It has multiple sentences. This is the third sentence."),
        ];
        let completion = model
            .chat(&messages, "dummy", &GenerationParams::default())
            .await
            .unwrap();
        assert!(completion.content.starts_with("This is a test article"));
        assert_eq!(completion.raw["choices"][0]["message"]["content"], completion.content.as_str());
    }

    #[tokio::test]
    async fn test_dummy_model_truncates_long_input() {
        let model = DummyModel::new();
        let long = vec!["wort"; 50].join(" ");
        let completion = model
            .chat(&[ChatMessage::user(long)], "dummy", &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(completion.content.split_whitespace().count(), SUMMARY_WORDS);
    }
}
