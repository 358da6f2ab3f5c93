//! # Recommendation Engine
//!
//! Maps a genre keyword to a small, varied set of movies:
//! 1. Match the keyword against the model's feature columns
//! 2. Build a multi-hot feature row and predict a target emotion score
//! 3. Keep catalog movies whose emotion score is within `tolerance` of it
//! 4. Rank them by `final_score`, keep the top `candidate_pool`
//! 5. Randomly sample `top_n` of those
//!
//! Whenever steps 1-3 come up empty (no matching feature, a failed
//! prediction, an empty band) the engine ranks the whole catalog by
//! `final_popularity` instead. A non-empty catalog therefore always yields
//! at least one movie.

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, warn};

use data_loader::{Catalog, MovieRecord};
use emotion_model::{FeatureModel, LinearEmotionModel};

use crate::config::{EngineConfig, RecommendationRequest};
use crate::error::{EngineError, Result};
use crate::features::GenreFeatures;
use crate::filters::EmotionBandFilter;
use crate::ranking::{self, RankKey};
use crate::recommendation::{
    FallbackReason, Recommendation, RecommendationResult, SelectionPath,
};
use crate::traits::Filter;

/// Genre-to-movie matching engine.
///
/// The catalog and the model are immutable shared resources, so the engine
/// is cheap to clone and safe to call from many threads at once. Each call
/// draws randomness from its own generator.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    model: Arc<dyn FeatureModel>,
}

impl RecommendationEngine {
    /// Create an engine from resources that are already loaded.
    ///
    /// Fails if the catalog has no movies: the popularity fallback needs at
    /// least one to guarantee a non-empty result.
    pub fn new(catalog: Arc<Catalog>, model: Arc<dyn FeatureModel>) -> Result<Self> {
        if catalog.is_empty() {
            return Err(EngineError::EmptyCatalog);
        }
        Ok(Self { catalog, model })
    }

    /// Load the catalog and the model named in `config`.
    ///
    /// Both files are read in parallel.
    pub fn load(config: &EngineConfig) -> Result<Self> {
        Self::load_from_files(&config.catalog_path, &config.model_path)
    }

    pub fn load_from_files(catalog_path: &Path, model_path: &Path) -> Result<Self> {
        let (catalog, model) = rayon::join(
            || Catalog::load_from_file(catalog_path),
            || LinearEmotionModel::load_from_file(model_path),
        );

        let catalog = Arc::new(catalog?);
        let model: Arc<dyn FeatureModel> = Arc::new(model?);
        info!(
            "Recommendation engine ready: {} movies, {} model features",
            catalog.len(),
            model.feature_names().len()
        );

        Self::new(catalog, model)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn model(&self) -> &dyn FeatureModel {
        self.model.as_ref()
    }

    /// Model feature columns a genre keyword would switch on
    pub fn matching_features(&self, genre_keyword: &str) -> Vec<String> {
        GenreFeatures::from_keyword(genre_keyword, self.model.feature_names()).matched
    }

    /// Recommend movies for a genre keyword.
    ///
    /// Sampling uses the thread-local generator, so repeated calls with the
    /// same request return different subsets of the same ranked pool.
    ///
    /// # Returns
    /// * `Ok(result)` - At least one movie
    /// * `Err` - Only if the request violates `top_n >= 1` or `candidate_pool >= 1`
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResult> {
        self.recommend_with_rng(request, &mut rand::rng())
    }

    /// [`recommend`](Self::recommend) with a caller-supplied random source.
    pub fn recommend_with_rng<R: Rng + ?Sized>(
        &self,
        request: &RecommendationRequest,
        rng: &mut R,
    ) -> Result<RecommendationResult> {
        request.validate()?;

        let features =
            GenreFeatures::from_keyword(&request.genre_keyword, self.model.feature_names());
        if features.is_empty() {
            debug!(
                "Genre '{}' matched no model feature",
                request.genre_keyword
            );
            return Ok(self.popularity_path(
                request,
                FallbackReason::NoFeatureMatch,
                features.matched,
                None,
                rng,
            ));
        }
        debug!(
            "Genre '{}' matched {} features: {:?}",
            request.genre_keyword,
            features.matched.len(),
            features.matched
        );

        let predicted = match self.model.predict(&features.vector) {
            Ok(score) => score,
            Err(e) => {
                warn!(
                    "Emotion prediction failed for genre '{}': {}",
                    request.genre_keyword, e
                );
                return Ok(self.popularity_path(
                    request,
                    FallbackReason::PredictionFailed,
                    features.matched,
                    None,
                    rng,
                ));
            }
        };

        let band = EmotionBandFilter::new(predicted, request.tolerance);
        let in_band = band.apply(self.catalog.movies().iter().collect());
        if in_band.is_empty() {
            let (low, high) = band.bounds();
            debug!(
                "{} found no movie with emotion score in [{:.2}, {:.2}]",
                band.name(),
                low,
                high
            );
            return Ok(self.popularity_path(
                request,
                FallbackReason::EmptyEmotionBand,
                features.matched,
                Some(predicted),
                rng,
            ));
        }

        let pool = ranking::top_ranked(in_band, RankKey::FinalScore, request.candidate_pool);
        let movies: Vec<Recommendation> = ranking::sample(&pool, request.top_n, rng)
            .into_iter()
            .filter_map(Recommendation::matched)
            .collect();
        let (low, high) = band.bounds();

        info!(
            "Genre '{}' -> emotion {:.2}: picked {} of {} candidates",
            request.genre_keyword,
            predicted,
            movies.len(),
            pool.len()
        );

        Ok(RecommendationResult {
            genre_keyword: request.genre_keyword.clone(),
            matched_features: features.matched,
            predicted_score: Some(predicted),
            path: SelectionPath::EmotionMatch { low, high },
            pool_size: pool.len(),
            movies,
        })
    }

    /// Recommend from the popularity ranking alone.
    ///
    /// Used when there is no genre signal to match, e.g. an empty listening
    /// history. `request.genre_keyword` is ignored.
    pub fn recommend_popular(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationResult> {
        self.recommend_popular_with_rng(request, &mut rand::rng())
    }

    pub fn recommend_popular_with_rng<R: Rng + ?Sized>(
        &self,
        request: &RecommendationRequest,
        rng: &mut R,
    ) -> Result<RecommendationResult> {
        request.validate()?;
        Ok(self.popularity_path(request, FallbackReason::NoGenre, Vec::new(), None, rng))
    }

    /// Rank the whole catalog by popularity and sample from the top.
    fn popularity_path<R: Rng + ?Sized>(
        &self,
        request: &RecommendationRequest,
        reason: FallbackReason,
        matched_features: Vec<String>,
        predicted_score: Option<f64>,
        rng: &mut R,
    ) -> RecommendationResult {
        let all: Vec<&MovieRecord> = self.catalog.movies().iter().collect();
        let pool = ranking::top_ranked(all, RankKey::Popularity, request.candidate_pool);
        let movies: Vec<Recommendation> = ranking::sample(&pool, request.top_n, rng)
            .into_iter()
            .map(Recommendation::popular)
            .collect();

        info!(
            "Genre '{}' -> popularity fallback ({:?}): picked {} of {} candidates",
            request.genre_keyword,
            reason,
            movies.len(),
            pool.len()
        );

        RecommendationResult {
            genre_keyword: request.genre_keyword.clone(),
            matched_features,
            predicted_score,
            path: SelectionPath::Popularity { reason },
            pool_size: pool.len(),
            movies,
        }
    }
}

impl std::fmt::Debug for RecommendationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationEngine")
            .field("movies", &self.catalog.len())
            .field("features", &self.model.feature_names().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotion_model::ModelError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Model that ignores its input and returns a fixed score
    struct FixedModel {
        features: Vec<String>,
        score: f64,
    }

    impl FeatureModel for FixedModel {
        fn feature_names(&self) -> &[String] {
            &self.features
        }

        fn predict(&self, _features: &[f64]) -> std::result::Result<f64, ModelError> {
            Ok(self.score)
        }
    }

    /// Model whose every prediction fails
    struct BrokenModel {
        features: Vec<String>,
    }

    impl FeatureModel for BrokenModel {
        fn feature_names(&self) -> &[String] {
            &self.features
        }

        fn predict(&self, features: &[f64]) -> std::result::Result<f64, ModelError> {
            Err(ModelError::DimensionMismatch {
                expected: features.len() + 1,
                found: features.len(),
            })
        }
    }

    fn movie(
        title: &str,
        popularity: f64,
        emotion: Option<f64>,
        final_score: f64,
    ) -> MovieRecord {
        MovieRecord {
            title: title.to_string(),
            final_popularity: Some(popularity),
            vote_average: Some(7.0),
            genre_group: "Action".to_string(),
            emotion_score: emotion,
            final_score: Some(final_score),
        }
    }

    fn features() -> Vec<String> {
        vec!["genre_action".to_string(), "genre_drama".to_string()]
    }

    fn engine_with(movies: Vec<MovieRecord>, model: Arc<dyn FeatureModel>) -> RecommendationEngine {
        RecommendationEngine::new(Arc::new(Catalog::from_records(movies)), model)
            .expect("Failed to build engine")
    }

    fn fixed(score: f64) -> Arc<dyn FeatureModel> {
        Arc::new(FixedModel { features: features(), score })
    }

    // ============================================================================
    // Unit Tests
    // ============================================================================

    #[test]
    fn test_empty_catalog_is_rejected() {
        let result = RecommendationEngine::new(Arc::new(Catalog::new()), fixed(5.0));
        assert!(matches!(result, Err(EngineError::EmptyCatalog)));
    }

    #[test]
    fn test_invalid_request_is_rejected() {
        let engine = engine_with(vec![movie("A", 1.0, Some(5.0), 1.0)], fixed(5.0));

        let request = RecommendationRequest::new("action").with_top_n(0);
        assert!(matches!(
            engine.recommend(&request),
            Err(EngineError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_score_path_returns_matched_fields() {
        let engine = engine_with(
            vec![
                movie("D", 10.0, Some(7.0), 6.0),
                movie("E", 99.0, Some(12.0), 9.0),
            ],
            fixed(5.0),
        );
        let mut rng = StdRng::seed_from_u64(1);

        let result = engine
            .recommend_with_rng(&RecommendationRequest::new("action"), &mut rng)
            .unwrap();

        assert_eq!(result.titles(), vec!["D"]);
        assert_eq!(result.predicted_score, Some(5.0));
        assert_eq!(result.matched_features, vec!["genre_action".to_string()]);
        assert_eq!(result.path, SelectionPath::EmotionMatch { low: 2.0, high: 8.0 });
        assert_eq!(result.movies[0].emotion_score(), Some(7.0));
        assert_eq!(result.movies[0].final_score(), Some(6.0));
    }

    #[test]
    fn test_prediction_failure_falls_back() {
        let model: Arc<dyn FeatureModel> = Arc::new(BrokenModel { features: features() });
        let engine = engine_with(vec![movie("A", 1.0, Some(5.0), 1.0)], model);

        let result = engine.recommend(&RecommendationRequest::new("drama")).unwrap();

        assert_eq!(result.fallback_reason(), Some(FallbackReason::PredictionFailed));
        assert_eq!(result.predicted_score, None);
        assert_eq!(result.titles(), vec!["A"]);
        assert_eq!(result.movies[0].emotion_score(), None);
    }

    #[test]
    fn test_recommend_popular_ignores_keyword() {
        let engine = engine_with(
            vec![movie("A", 90.0, Some(5.0), 1.0), movie("B", 80.0, Some(5.0), 1.0)],
            fixed(5.0),
        );

        let request = RecommendationRequest::new("action").with_top_n(2);
        let result = engine.recommend_popular(&request).unwrap();

        assert_eq!(result.fallback_reason(), Some(FallbackReason::NoGenre));
        assert!(result.matched_features.is_empty());
        assert_eq!(result.movies.len(), 2);
    }

    #[test]
    fn test_matching_features() {
        let engine = engine_with(vec![movie("A", 1.0, None, 1.0)], fixed(0.0));

        assert_eq!(engine.matching_features("DRAM"), vec!["genre_drama".to_string()]);
        assert!(engine.matching_features("polka").is_empty());
    }
}
