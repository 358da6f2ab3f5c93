use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::CatalogSummary;
use engine::config::{DEFAULT_CANDIDATE_POOL, DEFAULT_TOLERANCE, DEFAULT_TOP_N};
use engine::{EngineConfig, RecommendationResult, SelectionPath};
use listening::{DEFAULT_TOP_PLAYLISTS, ListeningHistory, Track, top_playlists};
use rand::seq::IndexedRandom;
use server::{ListeningSource, RecommendationService, SessionRecommendation};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// music2movie - Movie recommendations from what you listen to
#[derive(Parser)]
#[command(name = "music2movie")]
#[command(about = "Recommend movies whose emotional tone matches a music genre", long_about = None)]
struct Cli {
    /// Path to the movie catalog CSV
    #[arg(long, env = "MUSIC2MOVIE_CATALOG", default_value = "data/movie_df_ml.csv")]
    catalog: PathBuf,

    /// Path to the emotion score model (JSON)
    #[arg(long, env = "MUSIC2MOVIE_MODEL", default_value = "data/emotion_score_model.json")]
    model: PathBuf,

    /// Half-width of the emotion band around the predicted score
    #[arg(long, global = true, default_value_t = DEFAULT_TOLERANCE, allow_negative_numbers = true)]
    tolerance: f64,

    /// Number of movies to return
    #[arg(long, global = true, default_value_t = DEFAULT_TOP_N)]
    top_n: usize,

    /// Size of the ranked pool results are sampled from
    #[arg(long, global = true, default_value_t = DEFAULT_CANDIDATE_POOL)]
    pool: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend movies for a music genre keyword
    Recommend {
        /// Genre keyword, matched case-insensitively against model features
        #[arg(long)]
        genre: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recommend movies from a listening history file
    Session {
        /// JSON file with `queue` and/or `playlists`
        #[arg(long)]
        input: PathBuf,

        /// Which part of the history drives the recommendation
        #[arg(long, value_enum, default_value = "queue")]
        source: SourceArg,

        /// How many of the largest playlists to aggregate
        #[arg(long, default_value_t = DEFAULT_TOP_PLAYLISTS)]
        playlists: usize,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the model's feature columns
    Features {
        /// Only show features this keyword matches
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show catalog statistics
    Stats,

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceArg {
    Queue,
    Playlists,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = EngineConfig {
        catalog_path: cli.catalog,
        model_path: cli.model,
        tolerance: cli.tolerance,
        top_n: cli.top_n,
        candidate_pool: cli.pool,
    };

    println!(
        "Loading catalog from {} and model from {}...",
        config.catalog_path.display(),
        config.model_path.display()
    );
    let start = Instant::now();
    let service = RecommendationService::load(config)
        .await
        .context("Failed to load recommendation engine")?;
    println!("{} Loaded engine in {:?}", "✓".green(), start.elapsed());

    match cli.command {
        Commands::Recommend { genre, json } => handle_recommend(&service, &genre, json).await?,
        Commands::Session {
            input,
            source,
            playlists,
            json,
        } => handle_session(&service, input, source, playlists, json).await?,
        Commands::Features { filter } => handle_features(&service, filter.as_deref()),
        Commands::Stats => handle_stats(&service),
        Commands::Benchmark {
            requests,
            concurrent,
        } => handle_benchmark(service, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(service: &RecommendationService, genre: &str, json: bool) -> Result<()> {
    let result = service.recommend_for_genre(genre).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

/// Handle the 'session' command
async fn handle_session(
    service: &RecommendationService,
    input: PathBuf,
    source: SourceArg,
    playlists: usize,
    json: bool,
) -> Result<()> {
    let raw = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read listening history {}", input.display()))?;
    let history: ListeningHistory = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid listening history in {}", input.display()))?;

    let source = match source {
        SourceArg::Queue => ListeningSource::Queue,
        SourceArg::Playlists => ListeningSource::Playlists { top: playlists },
    };
    if !json {
        print_listening(&history, source);
    }
    let session = service.recommend_for_history(history, source).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        print_session(&session);
    }
    Ok(())
}

/// Handle the 'features' command
fn handle_features(service: &RecommendationService, filter: Option<&str>) {
    let features = match filter {
        Some(keyword) => service.engine().matching_features(keyword),
        None => service.engine().model().feature_names().to_vec(),
    };

    match filter {
        Some(keyword) => println!(
            "{}",
            format!("Features matching '{}' ({}):", keyword, features.len()).bold().blue()
        ),
        None => println!("{}", format!("Model features ({}):", features.len()).bold().blue()),
    }
    for feature in &features {
        println!("  {} {}", "•".green(), feature);
    }
}

/// Handle the 'stats' command
fn handle_stats(service: &RecommendationService) {
    let summary = service.engine().catalog().summary();
    print_summary(&summary);
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: RecommendationService,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    // Random genre keywords drawn from the model's own features
    let keywords: Vec<String> = {
        let features = service.engine().model().feature_names();
        let mut rng = rand::rng();
        (0..requests)
            .filter_map(|_| features.choose(&mut rng).cloned())
            .collect()
    };

    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let service = service.clone();
        let semaphore = Arc::clone(&semaphore);
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let start = Instant::now();
            service.recommend_for_genre(&keyword).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings = Vec::with_capacity(handles.len());
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = wall_clock.elapsed();

    if timings.is_empty() {
        bail!("The model has no features to benchmark with");
    }

    timings.sort();
    let total_latency: Duration = timings.iter().sum();
    let avg_latency = total_latency / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() - 1) as f64 * p) as usize];
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent)", timings.len(), concurrent.max(1));
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Format and print one recommendation result
fn print_result(result: &RecommendationResult) {
    println!(
        "{}",
        format!("Movie Recommendations for '{}':", result.genre_keyword).bold().blue()
    );

    if !result.matched_features.is_empty() {
        println!("Matched features: {}", result.matched_features.join(", "));
    }
    if let Some(score) = result.predicted_score {
        println!("Predicted emotion score: {:.2}", score);
    }
    match result.path {
        SelectionPath::EmotionMatch { low, high } => println!(
            "Emotion band [{:.2}, {:.2}], sampled from top {}",
            low, high, result.pool_size
        ),
        SelectionPath::Popularity { reason } => println!(
            "{} Using popularity ranking ({:?}), sampled from top {}",
            "!".yellow(),
            reason,
            result.pool_size
        ),
    }

    for (i, movie) in result.movies.iter().enumerate() {
        let rating = movie
            .vote_average()
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "n/a".to_string());
        print!(
            "{}. {} [{}] - Rating: {}",
            (i + 1).to_string().green(),
            movie.title().bold(),
            movie.genre_group(),
            rating
        );
        if let Some(emotion) = movie.emotion_score() {
            print!(" - Emotion: {:.2}", emotion);
        }
        if let Some(final_score) = movie.final_score() {
            print!(" - Final Score: {:.2}", final_score);
        }
        println!();
    }
}

/// Print the tracks that feed the genre signal, with their genres
fn print_listening(history: &ListeningHistory, source: ListeningSource) {
    match source {
        ListeningSource::Queue => {
            println!("{}", format!("Queue ({} tracks):", history.queue.len()).bold().blue());
            print_tracks(&history.queue);
        }
        ListeningSource::Playlists { top } => {
            for playlist in top_playlists(&history.playlists, top) {
                println!(
                    "{}",
                    format!("Playlist '{}' ({} tracks):", playlist.name, playlist.track_count)
                        .bold()
                        .blue()
                );
                print_tracks(&playlist.tracks);
            }
        }
    }
    println!();
}

fn print_tracks(tracks: &[Track]) {
    for track in tracks {
        let genres = track.genres();
        let genres = if genres.is_empty() {
            "no genres".dimmed().to_string()
        } else {
            genres.join(", ")
        };
        println!("  {} {} [{}]", "•".green(), track.name, genres);
    }
}

fn print_session(session: &SessionRecommendation) {
    match &session.dominant_genre {
        Some(genre) => println!("{} {}", "Dominant genre:".bold(), genre.cyan()),
        None => println!("{}", "No genres found in listening history".yellow()),
    }
    for entry in session.genre_breakdown.iter().take(10) {
        println!("  {} {} ({})", "•".cyan(), entry.genre, entry.count);
    }
    println!();
    print_result(&session.result);
}

fn print_summary(summary: &CatalogSummary) {
    println!("{}", "Catalog statistics:".bold().blue());
    println!("{}Movies: {}", "• ".green(), summary.total_movies);
    println!("{}With emotion score: {}", "• ".green(), summary.scored_movies);
    match summary.emotion_range {
        Some((low, high)) => println!("{}Emotion range: {:.2} to {:.2}", "• ".green(), low, high),
        None => println!("{}Emotion range: n/a", "• ".green()),
    }
    if let Some((low, high)) = summary.popularity_range {
        println!("{}Popularity range: {:.2} to {:.2}", "• ".green(), low, high);
    }
}
