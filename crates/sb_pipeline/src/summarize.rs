use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use sb_core::{Dataset, Result};
use sb_inference::prompt::summary_prompt;
use sb_inference::ModelClient;
use sb_storage::DatasetStore;
use crate::PipelineConfig;

const SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryStats {
    pub records: usize,
    pub generated: usize,
    pub failed: usize,
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

pub struct Summarizer {
    client: Arc<ModelClient>,
    instruction: String,
}

impl Summarizer {
    pub fn new(client: Arc<ModelClient>, config: &PipelineConfig) -> Self {
        Self { client, instruction: config.instruction.clone() }
    }

    /// Summarize every record into a fresh copy of the dataset.
    ///
    /// A failed record gets an empty summary and the batch moves on; the input
    /// dataset is left untouched.
    pub async fn summarize(&self, dataset: &Dataset, model: &str) -> (Dataset, SummaryStats) {
        let mut output = Dataset {
            dataset_name: dataset.dataset_name.clone(),
            data: dataset.data.clone(),
        };
        let mut stats = SummaryStats { records: output.data.len(), ..Default::default() };

        info!("🤖 Starting summarization of {} with model: {}", dataset.dataset_name, model);
        for (i, record) in output.data.iter_mut().enumerate() {
            info!("📝 [{}/{}] Generating summary for text: {}...", i + 1, stats.records, snippet(&record.text));

            let messages = summary_prompt(&self.instruction, &record.text);
            match self.client.generate(&messages, model).await {
                Some(summary) if !summary.is_empty() => {
                    record.summary = summary;
                    stats.generated += 1;
                }
                _ => {
                    error!("Failed to generate summary. Leaving the field empty.");
                    record.summary = String::new();
                    stats.failed += 1;
                }
            }
        }

        info!(
            records = stats.records,
            generated = stats.generated,
            failed = stats.failed,
            "✨ Summarization finished"
        );
        (output, stats)
    }

    /// Summarize and persist the result as the next versioned run for `(dataset, model)`.
    pub async fn run(&self, dataset: &Dataset, model: &str, store: &DatasetStore) -> Result<(PathBuf, SummaryStats)> {
        let (output, stats) = self.summarize(dataset, model).await;
        let path = store.save_summaries(&output, model)?;
        Ok((path, stats))
    }
}
