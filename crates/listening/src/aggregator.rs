//! Genre counting over a listener's history.
//!
//! Every artist appearance contributes its genres once, so a genre shared by
//! both artists of a duet counts twice. Ties between equally frequent genres
//! are broken by which genre was seen first.

use crate::types::{Playlist, Track};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// How often a genre was observed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Counts genre occurrences and reports the dominant one.
#[derive(Debug, Clone, Default)]
pub struct GenreAggregator {
    /// Counts in first-seen order
    counts: Vec<GenreCount>,
    /// Genre -> position in `counts`
    positions: HashMap<String, usize>,
}

impl GenreAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every genre in `genres` once. Blank entries are ignored.
    pub fn observe<I, S>(&mut self, genres: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for genre in genres {
            self.add(genre.as_ref().trim(), 1);
        }
    }

    /// Count the genres of every artist on a track
    pub fn observe_track(&mut self, track: &Track) {
        for artist in &track.artists {
            self.observe(&artist.genres);
        }
    }

    /// Aggregate the genres of a play queue
    pub fn from_tracks(tracks: &[Track]) -> Self {
        let mut aggregator = Self::new();
        for track in tracks {
            aggregator.observe_track(track);
        }
        debug!(
            "Aggregated {} tracks into {} distinct genres",
            tracks.len(),
            aggregator.distinct()
        );
        aggregator
    }

    /// Aggregate the genres of several playlists.
    ///
    /// Playlists are counted in parallel and merged back in input order, so
    /// tie-breaking matches a sequential pass.
    pub fn from_playlists(playlists: &[&Playlist]) -> Self {
        let partials: Vec<GenreAggregator> = playlists
            .par_iter()
            .map(|playlist| Self::from_tracks(&playlist.tracks))
            .collect();

        let mut aggregator = Self::new();
        for partial in &partials {
            aggregator.merge(partial);
        }
        aggregator
    }

    /// Add all counts from `other` into this aggregator
    pub fn merge(&mut self, other: &GenreAggregator) {
        for entry in &other.counts {
            self.add(&entry.genre, entry.count);
        }
    }

    fn add(&mut self, genre: &str, count: usize) {
        if genre.is_empty() || count == 0 {
            return;
        }
        match self.positions.get(genre) {
            Some(&pos) => self.counts[pos].count += count,
            None => {
                self.positions.insert(genre.to_string(), self.counts.len());
                self.counts.push(GenreCount {
                    genre: genre.to_string(),
                    count,
                });
            }
        }
    }

    /// The `n` most frequent genres, most frequent first.
    ///
    /// Equal counts keep first-seen order.
    pub fn most_common(&self, n: usize) -> Vec<GenreCount> {
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(n);
        ranked
    }

    /// The single most frequent genre, or `None` if nothing was observed
    pub fn dominant_genre(&self) -> Option<&str> {
        // max_by_key returns the last maximum; scan in reverse so the
        // earliest-seen genre wins ties
        self.counts
            .iter()
            .rev()
            .max_by_key(|entry| entry.count)
            .map(|entry| entry.genre.as_str())
    }

    pub fn count(&self, genre: &str) -> usize {
        self.positions
            .get(genre)
            .map(|&pos| self.counts[pos].count)
            .unwrap_or(0)
    }

    /// Number of distinct genres observed
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total number of genre observations
    pub fn total(&self) -> usize {
        self.counts.iter().map(|entry| entry.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
