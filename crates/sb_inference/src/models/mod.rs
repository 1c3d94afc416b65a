use std::sync::Arc;
use sb_core::Result;
use crate::{Backend, InferenceConfig};

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiCompatModel;
pub use sb_core::InferenceModel;

pub fn create_model(config: &InferenceConfig) -> Result<Arc<dyn InferenceModel>> {
    let model: Arc<dyn InferenceModel> = match config.backend {
        Backend::OpenAi => Arc::new(OpenAiCompatModel::new(config)?),
        Backend::Dummy => Arc::new(DummyModel::new()),
    };
    tracing::debug!("Created {} inference backend", model.name());
    Ok(model)
}
