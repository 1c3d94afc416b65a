//! Summary similarity metrics.
//!
//! ROUGE, BLEU and METEOR are scored per pair and averaged; BERTScore embeds
//! the whole corpus once through a [`TokenEmbedder`].

use std::sync::Arc;
use serde::{Deserialize, Serialize};
use tracing::info;
use sb_core::{Error, EvaluationReport, Result, RougeReport};

pub mod bertscore;
pub mod bleu;
pub mod embedders;
pub mod meteor;
pub mod rouge;
pub mod text;

pub use embedders::{create_embedder, EmbedderKind, TokenEmbedder};
pub use text::{Language, TextStemmer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Snowball stemmer used for ROUGE/BLEU preprocessing and METEOR stem matching
    pub language: Language,
    pub embedder: EmbedderKind,
    pub embedder_url: String,
    pub batch_size: usize,
    pub strip_special_tokens: bool,
    pub timeout_secs: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            language: Language::German,
            embedder: EmbedderKind::Tei,
            embedder_url: "http://localhost:8080".to_string(),
            batch_size: 32,
            strip_special_tokens: true,
            timeout_secs: 300,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    values.sum::<f64>() / n as f64
}

pub struct Evaluator {
    stemmer: TextStemmer,
    embedder: Arc<dyn TokenEmbedder>,
    batch_size: usize,
}

impl Evaluator {
    pub fn new(config: &MetricsConfig, embedder: Arc<dyn TokenEmbedder>) -> Self {
        Self {
            stemmer: TextStemmer::new(config.language),
            embedder,
            batch_size: config.batch_size,
        }
    }

    pub fn from_config(config: &MetricsConfig) -> Result<Self> {
        Ok(Self::new(config, create_embedder(config)?))
    }

    /// Score `generated[i]` against `references[i]` for every `i`.
    ///
    /// Both slices must be non-empty and of equal length. Any metric failure
    /// aborts the whole evaluation.
    pub async fn evaluate(&self, references: &[String], generated: &[String]) -> Result<EvaluationReport> {
        if references.len() != generated.len() {
            return Err(Error::LengthMismatch {
                references: references.len(),
                generated: generated.len(),
            });
        }
        if references.is_empty() {
            return Err(Error::EmptyInput);
        }
        let n = references.len();
        info!("📐 Evaluating {} summaries", n);

        let stemmed_refs: Vec<String> = references.iter().map(|t| self.stemmer.preprocess(t)).collect();
        let stemmed_gen: Vec<String> = generated.iter().map(|t| self.stemmer.preprocess(t)).collect();

        let rouge_scores: Vec<rouge::RougeScores> = stemmed_refs
            .iter()
            .zip(&stemmed_gen)
            .map(|(r, g)| rouge::score(r, g))
            .collect();
        let rouge = RougeReport {
            rouge1: mean(rouge_scores.iter().map(|s| s.rouge1.fmeasure), n),
            rouge2: mean(rouge_scores.iter().map(|s| s.rouge2.fmeasure), n),
            rouge_l: mean(rouge_scores.iter().map(|s| s.rouge_l.fmeasure), n),
        };

        let bleu = mean(
            stemmed_refs.iter().zip(&stemmed_gen).map(|(r, g)| {
                let reference: Vec<&str> = r.split_whitespace().collect();
                let hypothesis: Vec<&str> = g.split_whitespace().collect();
                bleu::sentence_bleu(&reference, &hypothesis)
            }),
            n,
        );

        let meteor = mean(
            references.iter().zip(generated).map(|(r, g)| {
                meteor::meteor(&text::word_tokens(r), &text::word_tokens(g), &self.stemmer)
            }),
            n,
        );

        let bert_score =
            bertscore::bert_score(self.embedder.as_ref(), references, generated, self.batch_size).await?;

        info!(
            rouge1 = rouge.rouge1,
            bleu,
            meteor,
            bert_f1 = bert_score.f1,
            "📊 Evaluation finished"
        );
        Ok(EvaluationReport { rouge, bleu, meteor, bert_score })
    }
}
