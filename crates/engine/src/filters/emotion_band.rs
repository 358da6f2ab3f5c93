//! Filter keeping movies whose emotion score is close to a target.

use crate::traits::Filter;
use data_loader::MovieRecord;

/// Keeps movies with `emotion_score` in `[target - tolerance, target + tolerance]`.
///
/// Bounds are inclusive. Movies without an emotion score are always removed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionBandFilter {
    low: f64,
    high: f64,
}

impl EmotionBandFilter {
    /// Create a new EmotionBandFilter.
    ///
    /// # Arguments
    /// * `target` - The predicted emotion score
    /// * `tolerance` - Allowed distance from `target` on either side
    pub fn new(target: f64, tolerance: f64) -> Self {
        Self {
            low: target - tolerance,
            high: target + tolerance,
        }
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.low, self.high)
    }
}

impl Filter for EmotionBandFilter {
    fn name(&self) -> &str {
        "EmotionBandFilter"
    }

    fn apply<'a>(&self, movies: Vec<&'a MovieRecord>) -> Vec<&'a MovieRecord> {
        movies
            .into_iter()
            .filter(|movie| movie.emotion_within(self.low, self.high))
            .collect()
    }
}
