use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use sb_core::{ChatMessage, Result};

#[derive(Serialize)]
struct AuditEntry<'a> {
    model: &'a str,
    timestamp: String,
    request: &'a [ChatMessage],
    response: &'a Value,
}

/// Append-only JSON-lines record of every successful completion.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, model: &str, request: &[ChatMessage], response: &Value) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entry = AuditEntry {
            model,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            request,
            response,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entries_are_appended_as_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::new(dir.path().join("responses").join("responses.jsonl"));
        let request = vec![ChatMessage::user("Hallo")];

        log.append("gemma", &request, &json!({"id": "a"})).unwrap();
        log.append("gemma", &request, &json!({"id": "b"})).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["model"], "gemma");
        assert_eq!(first["request"][0]["role"], "user");
        assert_eq!(first["response"]["id"], "a");
        assert!(first["timestamp"].as_str().unwrap().ends_with('Z'));

        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["response"]["id"], "b");
    }
}
