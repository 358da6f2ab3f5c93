//! Recommendation result types.
//!
//! The fields a recommended movie carries depend on how it was selected:
//! a popularity pick has no emotion or final score attached because none was
//! computed for it, while an emotion-matched pick always has its emotion score.

use data_loader::MovieRecord;
use serde::Serialize;

/// Why the engine used the popularity ranking instead of an emotion band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No genre signal was available at all
    NoGenre,
    /// The genre keyword matched no model feature
    NoFeatureMatch,
    /// The model could not produce a prediction
    PredictionFailed,
    /// No catalog movie fell inside the emotion band
    EmptyEmotionBand,
}

/// Which selection strategy produced a result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum SelectionPath {
    Popularity { reason: FallbackReason },
    EmotionMatch { low: f64, high: f64 },
}

/// A movie picked by the popularity fallback
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularMovie {
    pub title: String,
    pub final_popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub genre_group: String,
}

/// A movie picked from inside the emotion band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedMovie {
    pub title: String,
    pub emotion_score: f64,
    pub vote_average: Option<f64>,
    pub final_score: Option<f64>,
    pub genre_group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Recommendation {
    Popular(PopularMovie),
    Matched(MatchedMovie),
}

impl Recommendation {
    pub(crate) fn popular(movie: &MovieRecord) -> Self {
        Recommendation::Popular(PopularMovie {
            title: movie.title.clone(),
            final_popularity: movie.final_popularity,
            vote_average: movie.vote_average,
            genre_group: movie.genre_group.clone(),
        })
    }

    /// `None` if the movie has no emotion score, which the band filter never lets through
    pub(crate) fn matched(movie: &MovieRecord) -> Option<Self> {
        Some(Recommendation::Matched(MatchedMovie {
            title: movie.title.clone(),
            emotion_score: movie.emotion_score?,
            vote_average: movie.vote_average,
            final_score: movie.final_score,
            genre_group: movie.genre_group.clone(),
        }))
    }

    pub fn title(&self) -> &str {
        match self {
            Recommendation::Popular(m) => &m.title,
            Recommendation::Matched(m) => &m.title,
        }
    }

    pub fn vote_average(&self) -> Option<f64> {
        match self {
            Recommendation::Popular(m) => m.vote_average,
            Recommendation::Matched(m) => m.vote_average,
        }
    }

    pub fn genre_group(&self) -> &str {
        match self {
            Recommendation::Popular(m) => &m.genre_group,
            Recommendation::Matched(m) => &m.genre_group,
        }
    }

    /// Only emotion-matched picks carry an emotion score
    pub fn emotion_score(&self) -> Option<f64> {
        match self {
            Recommendation::Popular(_) => None,
            Recommendation::Matched(m) => Some(m.emotion_score),
        }
    }

    /// Only emotion-matched picks carry a final score
    pub fn final_score(&self) -> Option<f64> {
        match self {
            Recommendation::Popular(_) => None,
            Recommendation::Matched(m) => m.final_score,
        }
    }
}

/// Outcome of one `recommend` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub genre_keyword: String,
    /// Model feature columns the keyword switched on
    pub matched_features: Vec<String>,
    /// The model's emotion score, when prediction succeeded
    pub predicted_score: Option<f64>,
    pub path: SelectionPath,
    /// Number of ranked candidates the movies were sampled from
    pub pool_size: usize,
    pub movies: Vec<Recommendation>,
}

impl RecommendationResult {
    pub fn is_fallback(&self) -> bool {
        matches!(self.path, SelectionPath::Popularity { .. })
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self.path {
            SelectionPath::Popularity { reason } => Some(reason),
            SelectionPath::EmotionMatch { .. } => None,
        }
    }

    pub fn titles(&self) -> Vec<&str> {
        self.movies.iter().map(Recommendation::title).collect()
    }
}
