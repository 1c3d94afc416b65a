use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use sb_core::{ChatCompletion, ChatMessage, Error, GenerationParams, ModelDescriptor, Result};
use crate::InferenceConfig;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(flatten)]
    params: &'a GenerationParams,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelDescriptor>,
}

/// Client for servers exposing the OpenAI `/models` and `/chat/completions` routes.
pub struct OpenAiCompatModel {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiCompatModel {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let parsed = Url::parse(&config.api_base)
            .map_err(|e| Error::InvalidInput(format!("api_base {:?}: {}", config.api_base, e)))?;
        let client = Client::builder().connect_timeout(CONNECT_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl fmt::Debug for OpenAiCompatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Pull the assistant text out of a chat-completion payload.
fn extract_content(raw: &Value) -> Result<String> {
    let choice = raw
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .ok_or_else(|| Error::Inference("response has no choices".to_string()))?;
    choice
        .pointer("/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::Inference("choice has no message content".to_string()))
}

#[async_trait]
impl super::InferenceModel for OpenAiCompatModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>> {
        let response = self.client
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json::<ModelList>()
            .await?;
        Ok(response.data)
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        params: &GenerationParams,
    ) -> Result<ChatCompletion> {
        let request = ChatRequest { model, messages, params };

        let raw = self.client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let content = extract_content(&raw)?;
        Ok(ChatCompletion { content, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InferenceModel;
    use axum::{http::HeaderMap, routing::{get, post}, Json, Router};
    use serde_json::json;

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/v1", addr)
    }

    async fn models() -> Json<Value> {
        Json(json!({
            "object": "list",
            "data": [
                {"id": "gemma", "object": "model", "root": "google/gemma-2-9b-it", "max_model_len": 8192},
                {"id": "phi", "object": "model"}
            ]
        }))
    }

    async fn chat(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
        let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or("");
        let user = body["messages"][1]["content"].as_str().unwrap_or("");
        Json(json!({
            "id": "cmpl-1",
            "model": body["model"],
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": format!("{}|{}|{}|{}", auth, user, body["max_tokens"], body["stream"])
                }
            }]
        }))
    }

    async fn empty_choices() -> Json<Value> {
        Json(json!({"id": "cmpl-2", "choices": []}))
    }

    fn config_for(api_base: String) -> InferenceConfig {
        InferenceConfig {
            api_base,
            api_key: "test-key".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_models() {
        let base = spawn_server(Router::new().route("/v1/models", get(models))).await;
        let model = OpenAiCompatModel::new(&config_for(base)).unwrap();

        let listed = model.list_models().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "gemma");
        assert_eq!(listed[0].root.as_deref(), Some("google/gemma-2-9b-it"));
        assert_eq!(listed[0].max_model_len, Some(8192));
        assert_eq!(listed[1].max_model_len, None);
    }

    #[tokio::test]
    async fn test_chat_sends_params_and_key() {
        let base = spawn_server(Router::new().route("/v1/chat/completions", post(chat))).await;
        let model = OpenAiCompatModel::new(&config_for(base)).unwrap();

        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hallo")];
        let completion = model
            .chat(&messages, "gemma", &GenerationParams::default())
            .await
            .unwrap();
        assert_eq!(completion.content, "Bearer test-key|hallo|1024|false");
        assert_eq!(completion.raw["model"], "gemma");
    }

    #[tokio::test]
    async fn test_chat_without_choices_fails() {
        let base = spawn_server(Router::new().route("/v1/chat/completions", post(empty_choices))).await;
        let model = OpenAiCompatModel::new(&config_for(base)).unwrap();

        let err = model
            .chat(&[ChatMessage::user("x")], "gemma", &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let model = OpenAiCompatModel::new(&config_for("http://localhost:8000/v1/".to_string())).unwrap();
        assert_eq!(model.endpoint("models"), "http://localhost:8000/v1/models");
    }
}
