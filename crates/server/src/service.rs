//! # Recommendation Service
//!
//! This module coordinates a listening session end to end:
//! 1. Pick the relevant slice of the listening history (queue or playlists)
//! 2. Aggregate its genres and find the dominant one
//! 3. Ask the engine for movies matching that genre
//! 4. Return the movies together with the genre breakdown
//!
//! The engine is synchronous and CPU-bound, so every call runs on tokio's
//! blocking pool. The engine itself is shared behind an `Arc` and needs no
//! locking.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use engine::{
    EngineConfig, EngineError, RecommendationEngine, RecommendationRequest, RecommendationResult,
};
use listening::{GenreAggregator, GenreCount, ListeningHistory, Playlist, Track, top_playlists};

/// Which part of the listening history drives the recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ListeningSource {
    /// Tracks currently in the play queue
    Queue,
    /// The `top` largest playlists
    Playlists { top: usize },
}

/// Recommendation for a whole listening session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecommendation {
    pub source: ListeningSource,
    /// Most frequent genre, `None` when the history carried no genres
    pub dominant_genre: Option<String>,
    /// Every observed genre, most frequent first
    pub genre_breakdown: Vec<GenreCount>,
    pub result: RecommendationResult,
}

/// Async front door to the recommendation engine
#[derive(Clone)]
pub struct RecommendationService {
    engine: Arc<RecommendationEngine>,
    config: EngineConfig,
}

impl RecommendationService {
    /// Wrap an already constructed engine
    ///
    /// `config` supplies the default request parameters.
    pub fn new(engine: Arc<RecommendationEngine>, config: EngineConfig) -> Self {
        Self { engine, config }
    }

    /// Load the engine resources named in `config` without blocking the runtime
    pub async fn load(config: EngineConfig) -> Result<Self> {
        let start_time = Instant::now();

        let engine = tokio::task::spawn_blocking({
            let config = config.clone();
            move || RecommendationEngine::load(&config)
        })
        .await
        .context("Engine loading task panicked")?
        .context("Failed to load recommendation engine")?;

        info!("Loaded recommendation engine in {:.2?}", start_time.elapsed());
        Ok(Self::new(Arc::new(engine), config))
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recommend for an explicit genre keyword using the configured defaults
    pub async fn recommend_for_genre(&self, genre: &str) -> Result<RecommendationResult> {
        self.recommend(self.config.request(genre)).await
    }

    /// Recommend for a fully specified request
    pub async fn recommend(&self, request: RecommendationRequest) -> Result<RecommendationResult> {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || engine.recommend(&request))
            .await
            .context("Recommendation task panicked")?
            .context("Failed to compute recommendations")
    }

    /// Recommend from the genres of the play queue
    pub async fn recommend_for_queue(&self, queue: Vec<Track>) -> Result<SessionRecommendation> {
        self.recommend_for_session(ListeningSource::Queue, move || {
            GenreAggregator::from_tracks(&queue)
        })
        .await
    }

    /// Recommend from the genres of the `top` largest playlists
    pub async fn recommend_for_playlists(
        &self,
        playlists: Vec<Playlist>,
        top: usize,
    ) -> Result<SessionRecommendation> {
        self.recommend_for_session(ListeningSource::Playlists { top }, move || {
            GenreAggregator::from_playlists(&top_playlists(&playlists, top))
        })
        .await
    }

    /// Recommend from whichever part of `history` `source` selects
    pub async fn recommend_for_history(
        &self,
        history: ListeningHistory,
        source: ListeningSource,
    ) -> Result<SessionRecommendation> {
        match source {
            ListeningSource::Queue => self.recommend_for_queue(history.queue).await,
            ListeningSource::Playlists { top } => {
                self.recommend_for_playlists(history.playlists, top).await
            }
        }
    }

    /// Aggregate genres and run the engine on the blocking pool
    async fn recommend_for_session<F>(
        &self,
        source: ListeningSource,
        aggregate: F,
    ) -> Result<SessionRecommendation>
    where
        F: FnOnce() -> GenreAggregator + Send + 'static,
    {
        let start_time = Instant::now();
        let engine = Arc::clone(&self.engine);
        let config = self.config.clone();

        let session = tokio::task::spawn_blocking(move || {
            let genres = aggregate();
            let dominant_genre = genres.dominant_genre().map(str::to_string);

            let result = match &dominant_genre {
                Some(genre) => engine.recommend(&config.request(genre.as_str())),
                None => engine.recommend_popular(&config.request("")),
            }?;

            Ok::<_, EngineError>(SessionRecommendation {
                source,
                dominant_genre,
                genre_breakdown: genres.most_common(genres.distinct()),
                result,
            })
        })
        .await
        .context("Session recommendation task panicked")?
        .context("Failed to compute session recommendations")?;

        info!(
            "Session ({:?}) dominant genre {:?}: {} movies in {:.2?}",
            session.source,
            session.dominant_genre,
            session.result.movies.len(),
            start_time.elapsed()
        );
        Ok(session)
    }
}
