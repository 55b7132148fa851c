use csv::Writer;
use std::collections::HashMap;

use crate::error::AppError;
use crate::models::{Plugin, PluginStat};

/// Write the joined category listing (one row per plugin, in the order
/// given) to `csv_path`.
pub fn save_category_csv(
    plugins: &[Plugin],
    stats: &[PluginStat],
    csv_path: &str,
) -> Result<(), AppError> {
    let mut wtr = Writer::from_path(csv_path)?;
    wtr.write_record(["name", "slug", "installs", "rating"])?;

    let stats_map: HashMap<&str, &PluginStat> =
        stats.iter().map(|s| (s.slug.as_str(), s)).collect();

    for p in plugins {
        let installs = p.active_installs.to_string();
        let rating = stats_map
            .get(p.slug.as_str())
            .map(|s| format!("{:.1}", s.rating))
            .unwrap_or_default();

        wtr.write_record([p.name.as_str(), p.slug.as_str(), installs.as_str(), rating.as_str()])?;
    }

    wtr.flush()?;
    Ok(())
}
