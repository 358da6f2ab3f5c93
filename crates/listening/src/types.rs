//! Listening history as delivered by the music-streaming client.
//!
//! These types mirror the fields of the provider's payloads that matter for
//! genre aggregation and nothing else.

use serde::{Deserialize, Serialize};

/// A performing artist and the genres the provider tags them with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// A track from the play queue or a playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

impl Track {
    /// Distinct genres across all of this track's artists, first-seen order
    pub fn genres(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for genre in self.artists.iter().flat_map(|a| &a.genres) {
            let genre = genre.trim();
            if !genre.is_empty() && !seen.contains(&genre) {
                seen.push(genre);
            }
        }
        seen
    }
}

/// A user playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// Track total reported by the provider; may exceed `tracks.len()` when
    /// only the first page of tracks was fetched
    pub track_count: usize,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Everything known about what a listener has been playing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListeningHistory {
    #[serde(default)]
    pub queue: Vec<Track>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}
