use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Metric error: {0}")]
    Metric(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Cannot evaluate an empty set of summaries")]
    EmptyInput,

    #[error("Length mismatch: {references} references but {generated} generated summaries")]
    LengthMismatch { references: usize, generated: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Timeout(_) => true,
            Error::Http(e) => match e.status() {
                Some(status) => status.is_server_error() || status.as_u16() == 429,
                None => e.is_timeout() || e.is_connect() || e.is_request(),
            },
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
