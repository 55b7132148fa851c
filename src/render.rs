use std::collections::HashMap;
use std::fmt::Write;

use crate::models::{CategoryBuckets, Plugin, PluginStat};

/// The full category page as text: one section per bucket, one card line per
/// plugin. The popular section is dropped when its bucket is empty; the
/// other sections always render their headers, empty or not.
pub fn render_page(category: &str, buckets: &CategoryBuckets, stats: &[PluginStat]) -> String {
    let stats_map: HashMap<&str, &PluginStat> =
        stats.iter().map(|s| (s.slug.as_str(), s)).collect();

    let mut out = String::new();
    let _ = writeln!(out, "# {}", category);

    render_section(&mut out, "New & noteworthy", &buckets.new_or_recent, &stats_map);
    if !buckets.most_popular.is_empty() {
        render_section(&mut out, "Most popular", &buckets.most_popular, &stats_map);
    }
    render_section(&mut out, "All apps", &buckets.all_apps, &stats_map);

    out
}

fn render_section(
    out: &mut String,
    title: &str,
    plugins: &[Plugin],
    stats_map: &HashMap<&str, &PluginStat>,
) {
    let _ = writeln!(out, "\n## {}", title);
    for p in plugins {
        let _ = write!(out, "{:>9}  {}  [{}]", p.active_installs, p.name, p.slug);
        if let Some(stat) = stats_map.get(p.slug.as_str()) {
            let _ = write!(out, "  rating {:.1}", stat.rating);
        }
        if let Some(summary) = &p.summary {
            let _ = write!(out, " - {}", summary);
        }
        let _ = writeln!(out);
    }
}
