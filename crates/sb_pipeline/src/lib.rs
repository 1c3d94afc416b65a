use serde::{Deserialize, Serialize};
use sb_inference::prompt::DEFAULT_SUMMARY_INSTRUCTION;

pub mod evaluate;
pub mod summarize;

pub use evaluate::{evaluate_summaries, model_from_path};
pub use summarize::{SummaryStats, Summarizer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Instruction placed before each source text in the summary prompt
    pub instruction: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { instruction: DEFAULT_SUMMARY_INSTRUCTION.to_string() }
    }
}

pub mod prelude {
    pub use super::{evaluate_summaries, PipelineConfig, Summarizer, SummaryStats};
    pub use sb_core::{Dataset, EvaluationReport, Result, Error};
}
