//! Core traits for narrowing the catalog.
//!
//! This module defines the Filter trait used to select the movies that are
//! eligible for ranking on the score-matched path.

use data_loader::MovieRecord;

/// Core trait for filtering catalog rows.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared by concurrent callers
/// - Filters take ownership of the Vec of borrowed rows and return a filtered
///   Vec, so no movie is ever cloned while filtering
/// - Filters must keep the relative order of the rows they retain
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of movies.
    fn apply<'a>(&self, movies: Vec<&'a MovieRecord>) -> Vec<&'a MovieRecord>;
}
