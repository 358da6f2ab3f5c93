//! Catalog loading, validation and summary statistics.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use tracing::info;

impl Catalog {
    /// Load and validate the catalog CSV at `path`.
    ///
    /// This is the main entry point for loading data. Malformed rows are
    /// tolerated (see [`parser`]), but a catalog that ends up with no movies
    /// at all is rejected.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        let movies = parser::parse_catalog(path)?;
        let catalog = Catalog::from_records(movies);
        catalog.validate()?;

        let summary = catalog.summary();
        info!(
            "Catalog ready: {} movies, {} with an emotion score",
            summary.total_movies, summary.scored_movies
        );
        Ok(catalog)
    }

    /// Validate catalog integrity
    ///
    /// Recommendations always fall back to the popularity ranking, which
    /// needs at least one movie. Everything else about a row is optional.
    pub fn validate(&self) -> Result<()> {
        if self.movies.is_empty() {
            return Err(DataLoadError::ValidationError(
                "catalog contains no movies".to_string(),
            ));
        }
        Ok(())
    }

    /// Compute summary statistics over the whole catalog
    pub fn summary(&self) -> CatalogSummary {
        let emotion_range = value_range(self.movies.iter().filter_map(|m| m.emotion_score));
        let popularity_range =
            value_range(self.movies.iter().filter_map(|m| m.final_popularity));

        CatalogSummary {
            total_movies: self.movies.len(),
            scored_movies: self
                .movies
                .iter()
                .filter(|m| m.emotion_score.is_some())
                .count(),
            emotion_range,
            popularity_range,
        }
    }
}

/// Helper function to find the (min, max) of a sequence of values
fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |range, v| match range {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
