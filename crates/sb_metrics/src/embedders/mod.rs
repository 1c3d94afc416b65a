use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sb_core::Result;
use crate::MetricsConfig;

pub mod lexical;
pub mod tei;

pub use lexical::LexicalEmbedder;
pub use tei::TeiEmbedder;

/// One matrix of token vectors per input text.
pub type TokenEmbeddings = Vec<Vec<f32>>;

#[async_trait]
pub trait TokenEmbedder: Send + Sync {
    fn name(&self) -> &str;

    /// Contextual token embeddings for each text, in input order
    async fn embed_tokens(&self, texts: &[String]) -> Result<Vec<TokenEmbeddings>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// text-embeddings-inference server
    #[default]
    Tei,
    /// Hashed one-hot word vectors, no model
    Lexical,
}

pub fn create_embedder(config: &MetricsConfig) -> Result<Arc<dyn TokenEmbedder>> {
    let embedder: Arc<dyn TokenEmbedder> = match config.embedder {
        EmbedderKind::Tei => Arc::new(TeiEmbedder::new(config)?),
        EmbedderKind::Lexical => Arc::new(LexicalEmbedder::default()),
    };
    Ok(embedder)
}
