//! Ranking and sampling of candidate movies.
//!
//! Ranking is deterministic: rows are ordered by the chosen key descending,
//! rows without a key go last, and ties keep catalog order. Only the final
//! draw from the ranked pool is random.

use data_loader::MovieRecord;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::cmp::Ordering;

/// Which precomputed column a ranking sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKey {
    /// `final_popularity`, used by the popularity fallback
    Popularity,
    /// `final_score`, used inside an emotion band
    FinalScore,
}

impl RankKey {
    fn value(self, movie: &MovieRecord) -> Option<f64> {
        let value = match self {
            RankKey::Popularity => movie.final_popularity,
            RankKey::FinalScore => movie.final_score,
        };
        value.filter(|v| !v.is_nan())
    }
}

/// Descending by key, absent keys last, then ascending by catalog position.
///
/// The position tie-break makes this a total order, so selecting with it
/// gives exactly what a stable descending sort followed by truncation would.
fn compare_desc(key: RankKey, a: &(usize, &MovieRecord), b: &(usize, &MovieRecord)) -> Ordering {
    let by_key = match (key.value(a.1), key.value(b.1)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_key.then(a.0.cmp(&b.0))
}

/// Rank `movies` by `key` and keep the best `pool_size`.
///
/// `movies` must be in catalog order. Only the retained rows are fully
/// sorted; the rest are partitioned away in linear time.
pub fn top_ranked<'a>(
    movies: Vec<&'a MovieRecord>,
    key: RankKey,
    pool_size: usize,
) -> Vec<&'a MovieRecord> {
    if pool_size == 0 {
        return Vec::new();
    }

    let mut indexed: Vec<(usize, &MovieRecord)> = movies.into_iter().enumerate().collect();
    if indexed.len() > pool_size {
        indexed.select_nth_unstable_by(pool_size - 1, |a, b| compare_desc(key, a, b));
        indexed.truncate(pool_size);
    }
    indexed.sort_by(|a, b| compare_desc(key, a, b));

    indexed.into_iter().map(|(_, movie)| movie).collect()
}

/// Draw `min(count, pool.len())` distinct movies uniformly at random.
///
/// The order of the returned movies carries no meaning.
pub fn sample<'a, R: Rng + ?Sized>(
    pool: &[&'a MovieRecord],
    count: usize,
    rng: &mut R,
) -> Vec<&'a MovieRecord> {
    pool.choose_multiple(rng, count).copied().collect()
}
