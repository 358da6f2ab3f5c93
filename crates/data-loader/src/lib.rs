//! # Data Loader Crate
//!
//! This crate handles loading the movie catalog that recommendations are
//! drawn from.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, Catalog, CatalogSummary)
//! - **parser**: Parse the catalog CSV into Rust structs
//! - **index**: Load, validate and summarise a Catalog
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("data/movie_df_ml.csv"))?;
//! let summary = catalog.summary();
//!
//! println!("{} of {} movies have an emotion score", summary.scored_movies, summary.total_movies);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{Catalog, CatalogSummary, MovieRecord};
