use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::models::{Plugin, PluginStat};

pub const DEFAULT_API_BASE: &str = "https://api.kioskapps.dev/v1";
pub const DEFAULT_STATS_URL: &str =
    "https://raw.githubusercontent.com/kiosk-apps/registry/main/stats.json";
const USER_AGENT: &str = "kiosk/0.1 (+contact: ops@kioskapps.dev)";

/// Settings shared by both fetches.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub api_base: String,
    pub stats_url: String,
    pub stats_cache: PathBuf,
    pub stats_ttl: Duration,
    pub timeout: u64,
    pub retries: usize,
}

async fn get_text(url: &str, timeout: u64, retries: usize) -> Result<String, AppError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()?;

    let mut last_err = None;

    for attempt in 0..retries.max(1) {
        match client.get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
        {
            Ok(response) => return Ok(response.text().await?),
            Err(e) => {
                debug!(url, attempt, error = %e, "request failed, backing off");
                last_err = Some(e);
                let backoff = 1.0 * (2.0_f64).powi(attempt as i32);
                sleep(Duration::from_secs_f64(backoff)).await;
            }
        }
    }

    Err(AppError::Reqwest(last_err.unwrap()))
}

async fn get_json(url: &str, timeout: u64, retries: usize) -> Result<serde_json::Value, AppError> {
    let text = get_text(url, timeout, retries).await?;
    Ok(serde_json::from_str(&text)?)
}

fn build_category_url(api_base: &str, category: &str) -> String {
    format!("{}/apps?category={}", api_base, category)
}

fn parse_plugins(data: &serde_json::Value, category: &str) -> Vec<Plugin> {
    let items = data.get("apps").and_then(|a| a.as_array()).cloned().unwrap_or_default();

    let mut plugins: Vec<Plugin> = Vec::new();
    let mut by_slug: HashMap<String, usize> = HashMap::new();

    for item in items {
        let slug = item.get("slug").and_then(|s| s.as_str()).unwrap_or("").to_string();
        if slug.is_empty() {
            continue;
        }

        let ai = item.get("active_installs")
            .and_then(|a| a.as_i64())
            .unwrap_or(0);

        let name = item.get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("")
            .to_string();

        let summary = item.get("summary")
            .and_then(|s| s.as_str())
            .map(|s| s.to_string());

        let entry = Plugin {
            slug: slug.clone(),
            name,
            category: category.to_string(),
            summary,
            active_installs: ai,
        };

        // Keep the entry with highest active installs if duplicates appear
        // (rare but possible); the first position wins so fetch order survives.
        match by_slug.get(&slug) {
            Some(&idx) => {
                if ai > plugins[idx].active_installs {
                    plugins[idx] = entry;
                }
            }
            None => {
                by_slug.insert(slug, plugins.len());
                plugins.push(entry);
            }
        }
    }

    plugins
}

/// All plugins the API lists under `category`, in feed order. An unknown
/// category comes back as an empty list, not an error.
pub async fn fetch_category(cfg: &FetchConfig, category: &str) -> Result<Vec<Plugin>, AppError> {
    let url = build_category_url(&cfg.api_base, category);
    let data = get_json(&url, cfg.timeout, cfg.retries).await?;
    let plugins = parse_plugins(&data, category);
    debug!(category, count = plugins.len(), "fetched category listing");
    Ok(plugins)
}

fn read_cached_stats(path: &Path, ttl: Duration) -> Option<Vec<PluginStat>> {
    let age = fs::metadata(path).ok()?.modified().ok()?.elapsed().ok()?;
    if age >= ttl {
        return None;
    }
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

fn write_stats_cache(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let ext = path.extension().unwrap_or_default().to_str().unwrap_or("");
    let tmp_path = path.with_extension(format!("{}.part", ext));

    fs::write(&tmp_path, text)?;
    fs::rename(&tmp_path, path)
}

/// The global stats feed. Served from the on-disk cache while it is younger
/// than the TTL; anything else (missing, stale, unparsable) triggers a
/// refetch and a cache rewrite.
pub async fn fetch_stats(cfg: &FetchConfig) -> Result<Vec<PluginStat>, AppError> {
    if let Some(stats) = read_cached_stats(&cfg.stats_cache, cfg.stats_ttl) {
        debug!(path = %cfg.stats_cache.display(), "stats cache hit");
        return Ok(stats);
    }

    let text = get_text(&cfg.stats_url, cfg.timeout, cfg.retries).await?;
    let stats: Vec<PluginStat> = serde_json::from_str(&text)?;

    if let Err(e) = write_stats_cache(&cfg.stats_cache, &text) {
        warn!(path = %cfg.stats_cache.display(), "could not write stats cache: {}", e);
    }

    debug!(count = stats.len(), "fetched stats feed");
    Ok(stats)
}

/// Both fetches for one category page, issued together and awaited jointly.
/// The first failure wins; there is no partial result.
pub async fn load_category(
    cfg: &FetchConfig,
    category: &str,
) -> Result<(Vec<Plugin>, Vec<PluginStat>), AppError> {
    tokio::try_join!(fetch_category(cfg, category), fetch_stats(cfg))
}
