//! Integration tests for the recommendation engine.
//!
//! These tests load a real catalog and model from disk and check the
//! selection guarantees end to end.

use data_loader::{Catalog, MovieRecord};
use emotion_model::{FeatureModel, LinearEmotionModel};
use engine::{
    EngineConfig, FallbackReason, Recommendation, RecommendationEngine, RecommendationRequest,
    SelectionPath,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// intercept 4.0: "drama" predicts 2.0, "action_comedy" 4.5, "action" (two columns) 5.5
fn test_model() -> Arc<dyn FeatureModel> {
    Arc::new(
        LinearEmotionModel::new(
            vec![
                "genre_action".to_string(),
                "genre_drama".to_string(),
                "genre_action_comedy".to_string(),
            ],
            vec![1.0, -2.0, 0.5],
            4.0,
        )
        .expect("valid model"),
    )
}

fn movie(title: &str, popularity: f64, emotion: Option<f64>, final_score: f64) -> MovieRecord {
    MovieRecord {
        title: title.to_string(),
        final_popularity: Some(popularity),
        vote_average: Some(6.5),
        genre_group: "Drama".to_string(),
        emotion_score: emotion,
        final_score: Some(final_score),
    }
}

fn build_engine(movies: Vec<MovieRecord>) -> RecommendationEngine {
    RecommendationEngine::new(Arc::new(Catalog::from_records(movies)), test_model())
        .expect("non-empty catalog")
}

fn titles(result: &engine::RecommendationResult) -> HashSet<String> {
    result.movies.iter().map(|m| m.title().to_string()).collect()
}

#[test]
fn test_no_feature_match_uses_popularity() {
    let engine = build_engine(vec![
        movie("A", 90.0, Some(5.0), 1.0),
        movie("B", 80.0, Some(5.0), 1.0),
        movie("C", 70.0, Some(5.0), 1.0),
    ]);

    for top_n in 1..=5 {
        let request = RecommendationRequest::new("zydeco").with_top_n(top_n);
        let result = engine.recommend(&request).unwrap();

        assert_eq!(result.fallback_reason(), Some(FallbackReason::NoFeatureMatch));
        assert_eq!(result.movies.len(), top_n.min(3));
        assert!(titles(&result).is_subset(&HashSet::from(["A", "B", "C"].map(String::from))));
        for pick in &result.movies {
            assert!(matches!(pick, Recommendation::Popular(_)));
            assert_eq!(pick.emotion_score(), None);
            assert_eq!(pick.final_score(), None);
        }
    }
}

#[test]
fn test_band_membership() {
    let engine = build_engine(vec![
        movie("D", 10.0, Some(7.0), 5.0),
        movie("E", 99.0, Some(12.0), 9.0),
    ]);

    let request = RecommendationRequest::new("action").with_top_n(5);
    // "action" also matches genre_action_comedy: 4.0 + 1.0 + 0.5
    let result = engine.recommend(&request).unwrap();

    assert_eq!(result.predicted_score, Some(5.5));
    assert_eq!(result.matched_features.len(), 2);
    assert_eq!(titles(&result), HashSet::from(["D".to_string()]));
}

#[test]
fn test_exact_match_scenario() {
    let engine = build_engine(vec![
        movie("D", 10.0, Some(7.0), 5.0),
        movie("E", 99.0, Some(12.0), 9.0),
    ]);

    // Only genre_action_comedy: 4.0 + 0.5
    let request = RecommendationRequest::new("action_comedy");
    let result = engine.recommend(&request).unwrap();

    assert_eq!(result.predicted_score, Some(4.5));
    assert!(!result.is_fallback());
    assert_eq!(result.titles(), vec!["D"]);
    assert_eq!(result.movies[0].emotion_score(), Some(7.0));
    assert_eq!(result.movies[0].final_score(), Some(5.0));
}

#[test]
fn test_empty_keyword_switches_on_every_feature() {
    let engine = build_engine(vec![
        movie("Calm", 10.0, Some(3.0), 5.0),
        movie("Loud", 99.0, Some(12.0), 9.0),
    ]);

    // All three columns: 4.0 + 1.0 - 2.0 + 0.5
    let result = engine.recommend(&RecommendationRequest::new("")).unwrap();

    assert_eq!(result.matched_features.len(), 3);
    assert_eq!(result.predicted_score, Some(3.5));
    assert!(!result.is_fallback());
    assert_eq!(result.titles(), vec!["Calm"]);
}

#[test]
fn test_padded_keyword_matches_no_feature() {
    let engine = build_engine(vec![movie("D", 10.0, Some(7.0), 5.0)]);

    let result = engine.recommend(&RecommendationRequest::new(" drama")).unwrap();

    assert!(result.matched_features.is_empty());
    assert_eq!(result.predicted_score, None);
    assert_eq!(result.fallback_reason(), Some(FallbackReason::NoFeatureMatch));
}

#[test]
fn test_empty_band_falls_back_to_popularity() {
    // "drama" -> 4.0 - 2.0 = 2.0; nothing in [1.0, 3.0]
    let engine = build_engine(vec![
        movie("Far", 50.0, Some(9.0), 9.0),
        movie("Farther", 40.0, Some(-4.0), 9.0),
    ]);

    let request = RecommendationRequest::new("drama").with_tolerance(1.0);
    let result = engine.recommend(&request).unwrap();

    assert_eq!(result.predicted_score, Some(2.0));
    assert_eq!(result.fallback_reason(), Some(FallbackReason::EmptyEmotionBand));
    assert!(!result.movies.is_empty());
}

#[test]
fn test_all_scores_absent_triggers_fallback() {
    let engine = build_engine(vec![
        movie("A", 3.0, None, 9.0),
        movie("B", 2.0, None, 9.0),
    ]);

    let request = RecommendationRequest::new("action").with_tolerance(1_000.0);
    let result = engine.recommend(&request).unwrap();

    assert_eq!(result.fallback_reason(), Some(FallbackReason::EmptyEmotionBand));
    assert_eq!(result.movies.len(), 2);
}

#[test]
fn test_matched_rows_stay_inside_band() {
    let movies: Vec<_> = (0..100)
        .map(|i| movie(&format!("M{i}"), i as f64, Some(i as f64 / 10.0), (i % 7) as f64))
        .collect();
    let engine = build_engine(movies);
    let mut rng = StdRng::seed_from_u64(42);

    let request = RecommendationRequest::new("action")
        .with_tolerance(0.75)
        .with_top_n(10)
        .with_candidate_pool(50);
    for _ in 0..20 {
        let result = engine.recommend_with_rng(&request, &mut rng).unwrap();
        let predicted = result.predicted_score.unwrap();

        assert_eq!(result.path, SelectionPath::EmotionMatch {
            low: predicted - 0.75,
            high: predicted + 0.75,
        });
        for pick in &result.movies {
            let score = pick.emotion_score().unwrap();
            assert!((score - predicted).abs() <= 0.75 + 1e-9);
        }
    }
}

#[test]
fn test_sampling_only_draws_from_ranked_pool() {
    // Popularity 0..30; the pool of 5 must be M29..M25
    let movies: Vec<_> = (0..30)
        .map(|i| movie(&format!("M{i}"), i as f64, None, 0.0))
        .collect();
    let engine = build_engine(movies);
    let pool: HashSet<String> = (25..30).map(|i| format!("M{i}")).collect();

    let request = RecommendationRequest::new("no-such-genre")
        .with_top_n(3)
        .with_candidate_pool(5);
    let mut seen = HashSet::new();
    for _ in 0..200 {
        let result = engine.recommend(&request).unwrap();
        assert_eq!(result.movies.len(), 3);
        assert_eq!(result.pool_size, 5);

        let picked = titles(&result);
        assert_eq!(picked.len(), 3, "sampling is without replacement");
        assert!(picked.is_subset(&pool));
        seen.extend(picked);
    }

    // Unseeded sampling varies across calls
    assert!(seen.len() > 3);
}

#[test]
fn test_seeded_rng_is_reproducible() {
    let movies: Vec<_> = (0..30)
        .map(|i| movie(&format!("M{i}"), i as f64, Some(5.0), i as f64))
        .collect();
    let engine = build_engine(movies);
    let request = RecommendationRequest::new("action");

    let first = engine
        .recommend_with_rng(&request, &mut StdRng::seed_from_u64(9))
        .unwrap();
    let second = engine
        .recommend_with_rng(&request, &mut StdRng::seed_from_u64(9))
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_result_size_respects_pool() {
    let movies: Vec<_> = (0..10)
        .map(|i| movie(&format!("M{i}"), i as f64, Some(5.0), i as f64))
        .collect();
    let engine = build_engine(movies);

    let request = RecommendationRequest::new("action")
        .with_top_n(8)
        .with_candidate_pool(2);
    let result = engine.recommend(&request).unwrap();

    assert_eq!(result.movies.len(), 2);
    assert_eq!(
        titles(&result),
        HashSet::from(["M9".to_string(), "M8".to_string()])
    );
}

#[test]
fn test_engine_is_shareable_across_threads() {
    let movies: Vec<_> = (0..50)
        .map(|i| movie(&format!("M{i}"), i as f64, Some((i % 10) as f64), i as f64))
        .collect();
    let engine = Arc::new(build_engine(movies));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            std::thread::spawn(move || {
                let request = RecommendationRequest::new("action");
                (0..50)
                    .map(|_| engine.recommend(&request).unwrap().movies.len())
                    .sum::<usize>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 150);
    }
}

#[test]
fn test_load_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let mut catalog = NamedTempFile::new()?;
    writeln!(
        catalog,
        "title,final_popularity,vote_average,genre_group,emotion_score,final_score"
    )?;
    writeln!(catalog, "Heat,88,8.3,Crime,5.2,7.9")?;
    writeln!(catalog, "Up,70,8.2,Animation,not-a-number,8.0")?;

    let mut model = NamedTempFile::new()?;
    write!(
        model,
        r#"{{"feature_names": ["genre_rock", "genre_hard_rock"], "coefficients": [0.5, 0.5], "intercept": 4.0}}"#
    )?;

    let config = EngineConfig {
        catalog_path: catalog.path().to_path_buf(),
        model_path: model.path().to_path_buf(),
        ..EngineConfig::default()
    };
    let engine = RecommendationEngine::load(&config)?;
    assert_eq!(engine.catalog().len(), 2);

    let result = engine.recommend(&config.request("rock"))?;
    assert_eq!(result.predicted_score, Some(5.0));
    assert_eq!(result.titles(), vec!["Heat"]);
    Ok(())
}

#[test]
fn test_load_rejects_missing_model() -> Result<(), Box<dyn std::error::Error>> {
    let mut catalog = NamedTempFile::new()?;
    writeln!(
        catalog,
        "title,final_popularity,vote_average,genre_group,emotion_score,final_score"
    )?;
    writeln!(catalog, "Heat,88,8.3,Crime,5.2,7.9")?;

    let config = EngineConfig {
        catalog_path: catalog.path().to_path_buf(),
        model_path: "missing/model.json".into(),
        ..EngineConfig::default()
    };
    assert!(matches!(
        RecommendationEngine::load(&config),
        Err(engine::EngineError::Model(_))
    ));
    Ok(())
}

#[test]
fn test_result_serializes_path_specific_fields() {
    let engine = build_engine(vec![movie("A", 1.0, Some(5.0), 2.0)]);

    let popular = engine.recommend(&RecommendationRequest::new("polka")).unwrap();
    let json = serde_json::to_value(&popular).unwrap();
    assert_eq!(json["path"]["path"], "popularity");
    assert_eq!(json["path"]["reason"], "no_feature_match");
    assert!(json["movies"][0].get("emotion_score").is_none());

    let matched = engine.recommend(&RecommendationRequest::new("action")).unwrap();
    let json = serde_json::to_value(&matched).unwrap();
    assert_eq!(json["path"]["path"], "emotion_match");
    assert_eq!(json["movies"][0]["emotion_score"], 5.0);
    assert_eq!(json["movies"][0]["final_score"], 2.0);
}
