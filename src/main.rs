use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use kiosk::api::{load_category, FetchConfig, DEFAULT_API_BASE, DEFAULT_STATS_URL};
use kiosk::buckets::derive_buckets;
use kiosk::csv_ops::save_category_csv;
use kiosk::error::AppError;
use kiosk::render::render_page;

#[derive(Parser, Debug)]
#[command(name = "kiosk")]
#[command(about = "Render a marketplace category page from the apps API and the stats feed")]
struct Args {
    /// Category key to render
    category: String,

    /// Base URL of the apps-by-category API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// URL of the global stats feed
    #[arg(long, default_value = DEFAULT_STATS_URL)]
    stats_url: String,

    /// On-disk cache for the stats feed
    #[arg(long, default_value = ".kiosk-stats.json")]
    stats_cache: PathBuf,

    /// Seconds the stats cache stays fresh
    #[arg(long, default_value_t = 3600)]
    stats_ttl: u64,

    /// Request timeout in seconds
    #[arg(short = 't', long, default_value_t = 25)]
    timeout: u64,

    /// Retry attempts per request
    #[arg(long, default_value_t = 4)]
    retries: usize,

    /// Also export the joined listing to this CSV file
    #[arg(short = 'c', long)]
    csv_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = FetchConfig {
        api_base: args.api_base,
        stats_url: args.stats_url,
        stats_cache: args.stats_cache,
        stats_ttl: Duration::from_secs(args.stats_ttl),
        timeout: args.timeout,
        retries: args.retries,
    };

    let (plugins, stats) = load_category(&cfg, &args.category).await?;

    let buckets = derive_buckets(&plugins, &mut thread_rng());
    print!("{}", render_page(&args.category, &buckets, &stats));

    if let Some(csv_path) = args.csv_path {
        save_category_csv(&buckets.all_apps, &stats, &csv_path)?;
        println!("\nSaved category listing to {}", csv_path);
    }

    Ok(())
}
