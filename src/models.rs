use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Plugin {
    pub slug: String,
    pub name: String,
    pub category: String,
    pub summary: Option<String>,
    pub active_installs: i64,
}

/// Per-plugin metrics record from the global stats feed, joined to a
/// `Plugin` by slug at render time.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginStat {
    pub slug: String,
    #[serde(default)]
    pub installs: i64,
    #[serde(default)]
    pub rating: f64,
}

/// The three display buckets derived from one fetched category list.
#[derive(Debug, Clone)]
pub struct CategoryBuckets {
    pub new_or_recent: Vec<Plugin>,
    pub most_popular: Vec<Plugin>,
    pub all_apps: Vec<Plugin>,
}
