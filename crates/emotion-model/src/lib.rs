//! Emotion score model.
//!
//! This crate provides the trained mapping from genre indicator features to
//! a predicted emotion score. It handles:
//! - The `FeatureModel` seam the recommendation engine depends on
//! - Loading a fitted linear regressor exported as JSON
//! - Validating prediction input before it reaches the model

use thiserror::Error;

pub mod linear;

pub use linear::LinearEmotionModel;

/// Errors that can occur when loading or invoking an emotion model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse model definition: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model definition: {0}")]
    InvalidModel(String),

    #[error("Expected {expected} features but received {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Model produced a non-finite prediction: {0}")]
    NonFinitePrediction(f64),
}

/// A pre-trained regressor over named binary feature columns.
///
/// Implementations are immutable once loaded: the feature list returned by
/// [`feature_names`](FeatureModel::feature_names) never changes, and
/// [`predict`](FeatureModel::predict) takes `&self`, so one model can serve
/// any number of concurrent callers.
pub trait FeatureModel: Send + Sync {
    /// The recognised feature columns, in the order `predict` expects them
    fn feature_names(&self) -> &[String];

    /// Predict a single emotion score from one row of features.
    ///
    /// # Arguments
    /// * `features` - One value per entry of `feature_names`, same order
    ///
    /// # Returns
    /// * `Ok(score)` - The predicted emotion score
    /// * `Err` - If the row is malformed or the model cannot produce a score
    fn predict(&self, features: &[f64]) -> Result<f64, ModelError>;
}
