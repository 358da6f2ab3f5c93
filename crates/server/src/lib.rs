//! Server crate for the music2movie recommender.
//!
//! This crate contains the async service that combines listening-history
//! aggregation with the recommendation engine.

pub mod service;

pub use service::{ListeningSource, RecommendationService, SessionRecommendation};
