//! Engine configuration and per-call request parameters.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default half-width of the emotion band around the predicted score
pub const DEFAULT_TOLERANCE: f64 = 3.0;
/// Default number of movies returned per call
pub const DEFAULT_TOP_N: usize = 3;
/// Default size of the ranked pool that results are sampled from
pub const DEFAULT_CANDIDATE_POOL: usize = 15;

/// Where the engine's resources live, plus default request parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub catalog_path: PathBuf,
    pub model_path: PathBuf,
    pub tolerance: f64,
    pub top_n: usize,
    pub candidate_pool: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/movie_df_ml.csv"),
            model_path: PathBuf::from("data/emotion_score_model.json"),
            tolerance: DEFAULT_TOLERANCE,
            top_n: DEFAULT_TOP_N,
            candidate_pool: DEFAULT_CANDIDATE_POOL,
        }
    }
}

impl EngineConfig {
    /// A request for `genre_keyword` using this config's defaults
    pub fn request(&self, genre_keyword: impl Into<String>) -> RecommendationRequest {
        RecommendationRequest::new(genre_keyword)
            .with_tolerance(self.tolerance)
            .with_top_n(self.top_n)
            .with_candidate_pool(self.candidate_pool)
    }
}

/// Parameters of a single `recommend` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub genre_keyword: String,
    pub tolerance: f64,
    pub top_n: usize,
    pub candidate_pool: usize,
}

impl RecommendationRequest {
    pub fn new(genre_keyword: impl Into<String>) -> Self {
        Self {
            genre_keyword: genre_keyword.into(),
            tolerance: DEFAULT_TOLERANCE,
            top_n: DEFAULT_TOP_N,
            candidate_pool: DEFAULT_CANDIDATE_POOL,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_candidate_pool(mut self, candidate_pool: usize) -> Self {
        self.candidate_pool = candidate_pool;
        self
    }

    /// Check the preconditions the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.top_n < 1 {
            return Err(EngineError::InvalidRequest(
                "top_n must be at least 1".to_string(),
            ));
        }
        if self.candidate_pool < 1 {
            return Err(EngineError::InvalidRequest(
                "candidate_pool must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
