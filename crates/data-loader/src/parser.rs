//! Parser for the movie catalog CSV.
//!
//! Expected header (any order, extra columns ignored):
//! `title,final_popularity,vote_average,genre_group,emotion_score,final_score`
//!
//! Row-level problems never fail the load:
//! - rows with more fields than the header are skipped
//! - rows with fewer fields get absent values for the missing columns
//! - rows with an empty title are skipped
//! - numeric fields that do not parse become `None`

use crate::error::{DataLoadError, Result};
use crate::types::MovieRecord;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Columns the catalog must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "title",
    "final_popularity",
    "vote_average",
    "genre_group",
    "emotion_score",
    "final_score",
];

/// Helper function to read a file with ISO-8859-1 encoding (Latin-1)
///
/// The catalog is exported as Latin-1. Every byte maps directly to the
/// Unicode code point of the same value, so decoding cannot fail.
fn read_latin1(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Coerce a raw CSV field into a number.
///
/// Missing, blank, unparseable and non-finite values all become `None`.
pub fn parse_numeric(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Positions of the required columns within a row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    title: usize,
    final_popularity: usize,
    vote_average: usize,
    genre_group: usize,
    emotion_score: usize,
    final_score: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord, source: &str) -> Result<Self> {
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}') == column)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    file: source.to_string(),
                    column: column.to_string(),
                })
        };

        let [title, final_popularity, vote_average, genre_group, emotion_score, final_score] =
            REQUIRED_COLUMNS;
        Ok(Self {
            title: position(title)?,
            final_popularity: position(final_popularity)?,
            vote_average: position(vote_average)?,
            genre_group: position(genre_group)?,
            emotion_score: position(emotion_score)?,
            final_score: position(final_score)?,
        })
    }

    fn to_movie(self, record: &StringRecord) -> Option<MovieRecord> {
        let title = record.get(self.title).map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return None;
        }

        Some(MovieRecord {
            title: title.to_string(),
            final_popularity: parse_numeric(record.get(self.final_popularity)),
            vote_average: parse_numeric(record.get(self.vote_average)),
            genre_group: record
                .get(self.genre_group)
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            emotion_score: parse_numeric(record.get(self.emotion_score)),
            final_score: parse_numeric(record.get(self.final_score)),
        })
    }
}

/// Parse the catalog file at `path`
pub fn parse_catalog(path: &Path) -> Result<Vec<MovieRecord>> {
    let content = read_latin1(path)?;
    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_catalog_str(&content, &source)
}

/// Parse catalog CSV that is already in memory.
///
/// `source` is only used in error messages and logs.
pub fn parse_catalog_str(content: &str, source: &str) -> Result<Vec<MovieRecord>> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DataLoadError::HeaderError {
            file: source.to_string(),
            reason: e.to_string(),
        })?
        .clone();
    let columns = ColumnMap::from_headers(&headers, source)?;

    let mut movies = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable row in {}: {}", source, e);
                skipped += 1;
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() > headers.len() {
            warn!(
                "Skipping line {} in {}: expected {} fields, found {}",
                line,
                source,
                headers.len(),
                record.len()
            );
            skipped += 1;
            continue;
        }

        match columns.to_movie(&record) {
            Some(movie) => {
                if movie.emotion_score.is_none() {
                    debug!("Line {} in {}: emotion score absent", line, source);
                }
                movies.push(movie);
            }
            None => {
                debug!("Skipping line {} in {}: empty title", line, source);
                skipped += 1;
            }
        }
    }

    info!(
        "Parsed {} movies from {} ({} rows skipped)",
        movies.len(),
        source,
        skipped
    );
    Ok(movies)
}
