use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use async_trait::async_trait;
use sb_core::Result;
use crate::text::word_tokens;
use super::{TokenEmbedder, TokenEmbeddings};

const DIMENSIONS: usize = 4096;

/// Offline stand-in: every word token maps to a hashed one-hot vector.
///
/// Cosine similarity is 1 for equal tokens and 0 otherwise, so BERTScore
/// computed on top of it reduces to token-level F1.
#[derive(Debug, Clone)]
pub struct LexicalEmbedder {
    dimensions: usize,
}

impl Default for LexicalEmbedder {
    fn default() -> Self {
        Self { dimensions: DIMENSIONS }
    }
}

impl LexicalEmbedder {
    fn embed_token(&self, token: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let mut vector = vec![0.0; self.dimensions];
        vector[(hasher.finish() % self.dimensions as u64) as usize] = 1.0;
        vector
    }
}

#[async_trait]
impl TokenEmbedder for LexicalEmbedder {
    fn name(&self) -> &str {
        "Lexical"
    }

    async fn embed_tokens(&self, texts: &[String]) -> Result<Vec<TokenEmbeddings>> {
        Ok(texts
            .iter()
            .map(|text| word_tokens(text).iter().map(|t| self.embed_token(t)).collect())
            .collect())
    }
}
