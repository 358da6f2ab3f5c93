//! Listening history aggregation.
//!
//! This crate turns what a listener has been playing into the single genre
//! signal the recommendation engine consumes:
//! - **types**: Queue tracks, artists and playlists
//! - **aggregator**: GenreAggregator counting genre occurrences
//! - **playlists**: Picking the playlists that represent the listener best
//!
//! ## Example Usage
//! ```ignore
//! use listening::{GenreAggregator, top_playlists};
//!
//! let queue = GenreAggregator::from_tracks(&history.queue);
//! let playlists = GenreAggregator::from_playlists(&top_playlists(&history.playlists, 2));
//!
//! println!("{:?}", queue.dominant_genre());
//! ```

pub mod aggregator;
pub mod playlists;
pub mod types;

pub use aggregator::{GenreAggregator, GenreCount};
pub use playlists::{top_playlists, DEFAULT_TOP_PLAYLISTS};
pub use types::{Artist, ListeningHistory, Playlist, Track};
