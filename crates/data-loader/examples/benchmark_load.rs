use data_loader::Catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/movie_df_ml.csv".to_string());

    println!("Loading movie catalog from {}...\n", path);

    let start = Instant::now();
    let catalog = Catalog::load_from_file(Path::new(&path))
        .expect("Failed to load catalog");
    let elapsed = start.elapsed();

    let summary = catalog.summary();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", summary.total_movies);
    println!("With emotion score: {}", summary.scored_movies);
    if let Some((lo, hi)) = summary.emotion_range {
        println!("Emotion range: {:.2} .. {:.2}", lo, hi);
    }
    println!("\nPerformance: {:.0} rows/second",
             summary.total_movies as f64 / elapsed.as_secs_f64());
}
