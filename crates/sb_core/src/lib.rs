pub mod error;
pub mod models;
pub mod types;

pub use error::{Error, Result};
pub use models::InferenceModel;
pub use types::{
    BertScoreReport, ChatCompletion, ChatMessage, Dataset, EvaluationReport, GenerationParams,
    ModelDescriptor, Record, Role, RougeReport,
};
