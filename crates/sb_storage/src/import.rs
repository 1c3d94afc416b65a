use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use serde_json::Value;
use tracing::info;
use sb_core::{Dataset, Error, Record, Result};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub name: String,
    pub limit: usize,
    pub text_field: String,
    pub reference_field: String,
}

impl ImportOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            limit: 30,
            text_field: "text".to_string(),
            reference_field: "summary".to_string(),
        }
    }
}

fn string_field(object: &Value, field: &str, line_no: usize) -> Result<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidInput(format!("line {}: missing string field {:?}", line_no, field)))
}

/// Build a dataset from the first `limit` records of a JSON-lines corpus export.
pub fn import_jsonl(corpus: &Path, options: &ImportOptions) -> Result<Dataset> {
    let file = File::open(corpus)
        .map_err(|e| Error::Storage(format!("Failed to open corpus {}: {}", corpus.display(), e)))?;

    let mut data = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        if data.len() >= options.limit {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = i + 1;
        let object: Value = serde_json::from_str(&line)
            .map_err(|e| Error::InvalidInput(format!("line {}: {}", line_no, e)))?;
        data.push(Record::new(
            string_field(&object, &options.text_field, line_no)?,
            string_field(&object, &options.reference_field, line_no)?,
        ));
    }

    info!("📥 Imported {} records from {} as {}", data.len(), corpus.display(), options.name);
    Ok(Dataset { dataset_name: options.name.clone(), data })
}
