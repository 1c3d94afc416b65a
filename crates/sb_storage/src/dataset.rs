use std::fs::{self, OpenOptions};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use serde::Serialize;
use tracing::info;
use sb_core::{Dataset, Error, Result};
use crate::allocator::{latest_indexed, write_indexed, write_pretty};
use crate::StorageConfig;

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let file = fs::File::open(path)
        .map_err(|e| Error::Storage(format!("Failed to open dataset {}: {}", path.display(), e)))?;
    let dataset: Dataset = serde_json::from_reader(BufReader::new(file))?;
    Ok(dataset)
}

/// `*.json` files in `dir`, sorted by file name.
pub fn list_datasets(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::Storage(format!("Data directory '{}' does not exist", dir.display())));
    }
    let mut datasets = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            datasets.push(path);
        }
    }
    datasets.sort();
    Ok(datasets)
}

/// Turn a dataset or model name into a single directory component.
///
/// Model ids such as `org/model:tag` would otherwise spread over several
/// directories and break model-name recovery from the parent directory.
pub fn path_segment(name: &str) -> Result<String> {
    let segment: String = name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    if segment.is_empty() || segment == "." || segment == ".." {
        return Err(Error::InvalidInput(format!("{:?} cannot be used as a directory name", name)));
    }
    Ok(segment)
}

/// Filesystem layout for datasets, summary runs and evaluation reports.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    config: StorageConfig,
}

impl DatasetStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn list(&self) -> Result<Vec<PathBuf>> {
        list_datasets(&self.config.data_dir)
    }

    pub fn summaries_dir(&self, dataset_name: &str, model: &str) -> Result<PathBuf> {
        Ok(self.config.summaries_dir.join(path_segment(dataset_name)?).join(path_segment(model)?))
    }

    pub fn evaluation_dir(&self, dataset_name: &str, model: &str) -> Result<PathBuf> {
        Ok(self.config.evaluation_dir.join(path_segment(dataset_name)?).join(path_segment(model)?))
    }

    /// Write a summarized copy of a dataset to the next free slot for `(dataset, model)`.
    pub fn save_summaries(&self, dataset: &Dataset, model: &str) -> Result<PathBuf> {
        let dir = self.summaries_dir(&dataset.dataset_name, model)?;
        let path = write_indexed(&dir, dataset)?;
        info!("💾 Updated dataset with summaries saved to {}", path.display());
        Ok(path)
    }

    pub fn save_report<T: Serialize + ?Sized>(&self, dataset_name: &str, model: &str, report: &T) -> Result<PathBuf> {
        let dir = self.evaluation_dir(dataset_name, model)?;
        let path = write_indexed(&dir, report)?;
        info!("💾 Evaluation results saved to {}", path.display());
        Ok(path)
    }

    pub fn latest_summaries(&self, dataset_name: &str, model: &str) -> Result<Option<PathBuf>> {
        latest_indexed(&self.summaries_dir(dataset_name, model)?)
    }

    /// Store a new dataset as `<data_dir>/<name>.json`, refusing to replace an existing one.
    pub fn create_dataset(&self, dataset: &Dataset) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.data_dir)?;
        let path = self
            .config
            .data_dir
            .join(format!("{}.json", path_segment(&dataset.dataset_name)?));
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::Storage(format!("Dataset {} already exists", path.display())));
            }
            Err(e) => return Err(e.into()),
        };
        if let Err(e) = write_pretty(file, dataset) {
            let _ = fs::remove_file(&path);
            return Err(e);
        }
        info!("💾 Dataset saved to {}", path.display());
        Ok(path)
    }
}
