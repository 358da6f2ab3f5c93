//! Error types for the recommendation engine.
//!
//! Prediction failures and empty filter results are not errors: the engine
//! recovers from them by falling back to the popularity ranking. What is
//! left here are load failures and invalid requests.

use data_loader::DataLoadError;
use emotion_model::ModelError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid recommendation request: {0}")]
    InvalidRequest(String),

    #[error("Catalog contains no movies")]
    EmptyCatalog,

    #[error("Failed to load catalog: {0}")]
    Catalog(#[from] DataLoadError),

    #[error("Failed to load emotion model: {0}")]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
