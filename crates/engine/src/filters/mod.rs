//! Filter implementations used by the recommendation engine.

pub mod emotion_band;

// Re-export for convenience
pub use emotion_band::EmotionBandFilter;
