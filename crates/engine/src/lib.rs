//! Genre-to-movie matching engine.
//!
//! This crate provides:
//! - GenreFeatures for turning a genre keyword into a model feature row
//! - Filter trait and the EmotionBandFilter for narrowing the catalog
//! - Deterministic ranking plus random sampling from the ranked pool
//! - RecommendationEngine tying it all together
//!
//! ## Architecture
//! A call moves through these stages:
//! 1. The genre keyword is matched against the model's feature columns
//! 2. The model predicts a target emotion score from the multi-hot row
//! 3. The emotion band filter keeps movies close to that score
//! 4. Survivors are ranked by final score, the top of the ranking is sampled
//!
//! Any stage that comes up empty sends the call to the popularity ranking.
//!
//! ## Example Usage
//! ```ignore
//! use engine::{EngineConfig, RecommendationEngine};
//!
//! let config = EngineConfig::default();
//! let engine = RecommendationEngine::load(&config)?;
//!
//! let result = engine.recommend(&config.request("indie rock"))?;
//! for movie in &result.movies {
//!     println!("{}", movie.title());
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod filters;
pub mod ranking;
pub mod recommendation;
pub mod traits;

// Re-export main types
pub use config::{EngineConfig, RecommendationRequest};
pub use engine::RecommendationEngine;
pub use error::{EngineError, Result};
pub use features::GenreFeatures;
pub use recommendation::{
    FallbackReason, MatchedMovie, PopularMovie, Recommendation, RecommendationResult,
    SelectionPath,
};
pub use traits::Filter;
