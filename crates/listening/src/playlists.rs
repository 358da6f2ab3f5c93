//! Playlist selection.

use crate::types::Playlist;

/// How many playlists feed the genre signal by default
pub const DEFAULT_TOP_PLAYLISTS: usize = 2;

/// The `n` playlists with the most tracks, largest first.
///
/// Playlists with equal track counts keep their input order.
pub fn top_playlists(playlists: &[Playlist], n: usize) -> Vec<&Playlist> {
    let mut ranked: Vec<&Playlist> = playlists.iter().collect();
    ranked.sort_by(|a, b| b.track_count.cmp(&a.track_count));
    ranked.truncate(n);
    ranked
}
