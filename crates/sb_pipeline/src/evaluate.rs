use std::path::{Path, PathBuf};
use tracing::info;
use sb_core::{Error, EvaluationReport, Result};
use sb_metrics::Evaluator;
use sb_storage::{load_dataset, DatasetStore};

/// The model segment of `summaries/<dataset>/<model>/<n>.json`.
pub fn model_from_path(path: &Path) -> Result<String> {
    path.parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidInput(format!("Cannot derive model name from {}", path.display())))
}

/// Score a summary file and store the report under the evaluation tree.
///
/// The report is written only once every metric succeeded.
pub async fn evaluate_summaries(
    input: &Path,
    evaluator: &Evaluator,
    store: &DatasetStore,
) -> Result<(EvaluationReport, PathBuf)> {
    let dataset = load_dataset(input)?;
    let model = model_from_path(input)?;
    info!("🔍 Evaluating {} ({} records, model {})", input.display(), dataset.data.len(), model);

    let report = evaluator.evaluate(&dataset.references(), &dataset.summaries()).await?;
    let path = store.save_report(&dataset.dataset_name, &model, &report)?;
    Ok((report, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use sb_core::{Dataset, Record};
    use sb_metrics::embedders::{LexicalEmbedder, TokenEmbedder, TokenEmbeddings};
    use sb_metrics::MetricsConfig;
    use sb_storage::{write_indexed, StorageConfig};

    fn store(root: &Path) -> DatasetStore {
        DatasetStore::new(StorageConfig {
            data_dir: root.join("data"),
            summaries_dir: root.join("summaries"),
            evaluation_dir: root.join("evaluation"),
        })
    }

    fn evaluator() -> Evaluator {
        Evaluator::new(&MetricsConfig::default(), Arc::new(LexicalEmbedder::default()))
    }

    fn summarized(records: Vec<Record>) -> Dataset {
        Dataset { dataset_name: "mlsum_de".to_string(), data: records }
    }

    #[test]
    fn test_model_from_path() {
        let path = Path::new("summaries/mlsum_de/phi/0.json");
        assert_eq!(model_from_path(path).unwrap(), "phi");
        assert!(model_from_path(Path::new("0.json")).is_err());
    }

    #[tokio::test]
    async fn test_report_is_written_per_dataset_and_model() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let mut record = Record::new("Text", "Der Hund läuft.");
        record.summary = "Der Hund läuft.".to_string();
        let input = write_indexed(&dir.path().join("summaries/mlsum_de/phi"), &summarized(vec![record])).unwrap();

        let (report, path) = evaluate_summaries(&input, &evaluator(), &store).await.unwrap();

        assert_eq!(path, dir.path().join("evaluation/mlsum_de/phi/0.json"));
        assert!((report.rouge.rouge1 - 1.0).abs() < 1e-9);
        assert!((report.bert_score.f1 - 1.0).abs() < 1e-6);

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written["ROUGE"]["rougeL"].is_number());
        assert!(written["BERTScore"]["F1"].is_number());
    }

    /// Rejects blank inputs the way a TEI server does.
    struct NonBlankEmbedder;

    #[async_trait::async_trait]
    impl TokenEmbedder for NonBlankEmbedder {
        fn name(&self) -> &str {
            "NonBlank"
        }

        async fn embed_tokens(&self, texts: &[String]) -> Result<Vec<TokenEmbeddings>> {
            if texts.iter().any(|t| t.trim().is_empty()) {
                return Err(Error::Metric("422 `inputs` cannot be empty".to_string()));
            }
            LexicalEmbedder::default().embed_tokens(texts).await
        }
    }

    #[tokio::test]
    async fn test_run_with_failed_summaries_still_gets_a_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let mut done = Record::new("Text eins", "Der Hund läuft.");
        done.summary = "Der Hund läuft.".to_string();
        // left empty by a failed generation
        let failed = Record::new("Text zwei", "Die Katze schläft.");
        let input = write_indexed(&dir.path().join("summaries/mlsum_de/phi"), &summarized(vec![done, failed])).unwrap();
        let evaluator = Evaluator::new(&MetricsConfig::default(), Arc::new(NonBlankEmbedder));

        let (report, path) = evaluate_summaries(&input, &evaluator, &store).await.unwrap();

        assert!(path.exists());
        assert_eq!(path, dir.path().join("evaluation/mlsum_de/phi/0.json"));
        assert!((report.rouge.rouge1 - 0.5).abs() < 1e-9);
        assert!((report.bert_score.f1 - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_empty_dataset_writes_no_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let input = write_indexed(&dir.path().join("summaries/mlsum_de/phi"), &summarized(Vec::new())).unwrap();

        let err = evaluate_summaries(&input, &evaluator(), &store).await.unwrap_err();

        assert!(matches!(err, Error::EmptyInput));
        assert!(!dir.path().join("evaluation").exists());
    }
}
