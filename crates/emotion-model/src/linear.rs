//! Linear regression emotion model loaded from a JSON export.
//!
//! File format:
//! ```json
//! {
//!   "feature_names": ["genre_rock", "genre_pop", "genre_hip_hop"],
//!   "coefficients": [1.25, 2.5, -0.75],
//!   "intercept": 4.0
//! }
//! ```

use crate::{FeatureModel, ModelError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// A fitted linear regressor: `intercept + Σ coefficient_i * x_i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearEmotionModel {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearEmotionModel {
    /// Build a model, checking that the definition is coherent.
    ///
    /// Feature names must be non-empty and unique, there must be exactly one
    /// finite coefficient per feature, and the intercept must be finite.
    pub fn new(
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, ModelError> {
        let model = Self {
            feature_names,
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse a model from its JSON definition
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Load a model from a JSON file on disk
    pub fn load_from_file(path: &Path) -> Result<Self, ModelError> {
        info!("Loading emotion model from {:?}", path);

        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let model = Self::from_json(&json)?;

        info!("Emotion model ready with {} features", model.feature_names.len());
        Ok(model)
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.feature_names.is_empty() {
            return Err(ModelError::InvalidModel("model has no features".into()));
        }
        if self.coefficients.len() != self.feature_names.len() {
            return Err(ModelError::InvalidModel(format!(
                "{} feature names but {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.feature_names.len());
        for name in &self.feature_names {
            if name.trim().is_empty() {
                return Err(ModelError::InvalidModel("empty feature name".into()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ModelError::InvalidModel(format!(
                    "duplicate feature name '{}'",
                    name
                )));
            }
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::InvalidModel(
                "coefficients and intercept must be finite".into(),
            ));
        }
        Ok(())
    }
}

impl FeatureModel for LinearEmotionModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
                found: features.len(),
            });
        }

        let score = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>();

        if !score.is_finite() {
            return Err(ModelError::NonFinitePrediction(score));
        }
        debug!("Predicted emotion score {:.3}", score);
        Ok(score)
    }
}
