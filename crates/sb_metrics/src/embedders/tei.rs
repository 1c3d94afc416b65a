use std::fmt;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;
use sb_core::{Error, Result};
use crate::MetricsConfig;
use super::{TokenEmbedder, TokenEmbeddings};

#[derive(Serialize)]
struct EmbedAllRequest<'a> {
    inputs: &'a [String],
    truncate: bool,
}

/// Token embeddings from a text-embeddings-inference server (`POST /embed_all`).
pub struct TeiEmbedder {
    client: Client,
    endpoint: String,
    strip_special_tokens: bool,
}

impl fmt::Debug for TeiEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeiEmbedder")
            .field("client", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint)
            .field("strip_special_tokens", &self.strip_special_tokens)
            .finish()
    }
}

impl TeiEmbedder {
    pub fn new(config: &MetricsConfig) -> Result<Self> {
        let base = Url::parse(&config.embedder_url)
            .map_err(|e| Error::InvalidInput(format!("embedder_url {:?}: {}", config.embedder_url, e)))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/embed_all", base.as_str().trim_end_matches('/')),
            strip_special_tokens: config.strip_special_tokens,
        })
    }

    fn strip(&self, mut tokens: TokenEmbeddings) -> TokenEmbeddings {
        if !self.strip_special_tokens {
            return tokens;
        }
        // [CLS] ... [SEP]
        if tokens.len() < 2 {
            return Vec::new();
        }
        tokens.pop();
        tokens.remove(0);
        tokens
    }
}

#[async_trait]
impl TokenEmbedder for TeiEmbedder {
    fn name(&self) -> &str {
        "TEI"
    }

    async fn embed_tokens(&self, texts: &[String]) -> Result<Vec<TokenEmbeddings>> {
        let request = EmbedAllRequest { inputs: texts, truncate: true };
        let response = self.client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<TokenEmbeddings>>()
            .await?;

        if response.len() != texts.len() {
            return Err(Error::Metric(format!(
                "embedder returned {} results for {} inputs",
                response.len(),
                texts.len()
            )));
        }
        Ok(response.into_iter().map(|tokens| self.strip(tokens)).collect())
    }
}
