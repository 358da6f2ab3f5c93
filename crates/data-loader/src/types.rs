//! Core domain types for the movie catalog.
//!
//! The catalog is an externally sourced table, so every numeric column is
//! modelled as `Option<f64>`: a value that failed to parse is simply absent.

use serde::{Deserialize, Serialize};

// =============================================================================
// Movie-related Types
// =============================================================================

/// One row of the movie catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    /// Display title, never empty
    pub title: String,
    /// Popularity composite used by the fallback ranking
    pub final_popularity: Option<f64>,
    /// Average audience vote, typically 0-10
    pub vote_average: Option<f64>,
    /// Coarse genre bucket the movie belongs to (e.g. "Drama")
    pub genre_group: String,
    /// Precomputed emotional tone of the movie
    ///
    /// `None` when the source value was missing or malformed. Such rows can
    /// never match an emotion band, but still take part in popularity ranking.
    pub emotion_score: Option<f64>,
    /// Quality composite used to rank movies inside an emotion band
    pub final_score: Option<f64>,
}

impl MovieRecord {
    /// Whether this movie's emotion score lies in `[low, high]` (inclusive).
    ///
    /// Always false for a movie without an emotion score.
    pub fn emotion_within(&self, low: f64, high: f64) -> bool {
        self.emotion_score
            .is_some_and(|score| score >= low && score <= high)
    }
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Summary of a loaded catalog, computed on demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub total_movies: usize,
    /// Rows whose emotion score parsed successfully
    pub scored_movies: usize,
    /// Lowest and highest emotion score present, if any row has one
    pub emotion_range: Option<(f64, f64)>,
    pub popularity_range: Option<(f64, f64)>,
}

// =============================================================================
// Catalog - The In-Memory Movie Table
// =============================================================================

/// Immutable-after-load table of movies, kept in source order.
///
/// Source order matters: rankings use a stable sort, so ties keep the order
/// the rows had in the catalog file.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) movies: Vec<MovieRecord>,
}

impl Catalog {
    /// Creates a new, empty Catalog
    pub fn new() -> Self {
        Self { movies: Vec::new() }
    }

    /// Build a catalog from rows that are already in memory
    pub fn from_records(movies: Vec<MovieRecord>) -> Self {
        Self { movies }
    }

    /// All movies in catalog order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl FromIterator<MovieRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = MovieRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}
