use std::path::PathBuf;
use serde::{Deserialize, Serialize};

pub mod allocator;
pub mod dataset;
pub mod import;

pub use allocator::{allocate_indexed, latest_indexed, write_indexed, IndexedFile};
pub use dataset::{list_datasets, load_dataset, path_segment, DatasetStore};
pub use import::{import_jsonl, ImportOptions};

/// Directory layout shared by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub summaries_dir: PathBuf,
    pub evaluation_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            summaries_dir: PathBuf::from("summaries"),
            evaluation_dir: PathBuf::from("evaluation"),
        }
    }
}

pub mod prelude {
    pub use super::{DatasetStore, StorageConfig};
    pub use sb_core::{Dataset, Record, Result, Error};
}
