use serde::{Deserialize, Serialize};

/// A named collection of documents with reference and generated summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dataset_name: String,
    pub data: Vec<Record>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub text: String,
    pub reference: String,
    /// Empty until a model has produced a summary.
    #[serde(default)]
    pub summary: String,
}

impl Record {
    pub fn new(text: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reference: reference.into(),
            summary: String::new(),
        }
    }
}

impl Dataset {
    pub fn references(&self) -> Vec<String> {
        self.data.iter().map(|r| r.reference.clone()).collect()
    }

    pub fn summaries(&self) -> Vec<String> {
        self.data.iter().map(|r| r.summary.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// A model advertised by the inference server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub max_model_len: Option<u64>,
}

/// Sampling parameters sent with every chat completion.
///
/// Callers replace the whole value; there is no field-by-field merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub stream: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1024,
            top_p: 0.95,
            stream: false,
        }
    }
}

/// Reply text together with the provider payload it was extracted from.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
    pub raw: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RougeReport {
    pub rouge1: f64,
    pub rouge2: f64,
    #[serde(rename = "rougeL")]
    pub rouge_l: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BertScoreReport {
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
    #[serde(rename = "F1")]
    pub f1: f64,
}

/// Corpus-level means of every metric, written as one JSON document per run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    #[serde(rename = "ROUGE")]
    pub rouge: RougeReport,
    #[serde(rename = "BLEU")]
    pub bleu: f64,
    #[serde(rename = "METEOR")]
    pub meteor: f64,
    #[serde(rename = "BERTScore")]
    pub bert_score: BertScoreReport,
}
