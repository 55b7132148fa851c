use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{CategoryBuckets, Plugin};

/// Display size of the new-or-recent bucket.
pub const NEW_BUCKET_SIZE: usize = 4;
/// Display size of the most-popular bucket.
pub const POPULAR_BUCKET_SIZE: usize = 6;

/// All three display buckets for one fetched category list.
pub fn derive_buckets<R: Rng>(plugins: &[Plugin], rng: &mut R) -> CategoryBuckets {
    CategoryBuckets {
        new_or_recent: new_or_recent(plugins, rng),
        most_popular: most_popular(plugins),
        all_apps: all_apps(plugins),
    }
}

/// Plugins featured as new or recent. Prefers zero-install plugins: when at
/// least four exist, four of them are sampled uniformly; otherwise the four
/// lowest by installs stand in. Display order is randomized either way.
pub fn new_or_recent<R: Rng>(plugins: &[Plugin], rng: &mut R) -> Vec<Plugin> {
    let zero_installs: Vec<Plugin> = plugins
        .iter()
        .filter(|p| p.active_installs == 0)
        .cloned()
        .collect();

    let mut bucket = if zero_installs.len() >= NEW_BUCKET_SIZE {
        zero_installs
    } else {
        let mut lowest = plugins.to_vec();
        // stable sort, ties keep fetch order
        lowest.sort_by(|a, b| a.active_installs.cmp(&b.active_installs));
        lowest.truncate(NEW_BUCKET_SIZE);
        lowest
    };

    bucket.shuffle(rng);
    bucket.truncate(NEW_BUCKET_SIZE);
    bucket
}

/// Top six by installs, present only when the category holds more than six
/// plugins; an empty vec means the section is omitted.
pub fn most_popular(plugins: &[Plugin]) -> Vec<Plugin> {
    if plugins.len() <= POPULAR_BUCKET_SIZE {
        return Vec::new();
    }
    let mut sorted = all_apps(plugins);
    sorted.truncate(POPULAR_BUCKET_SIZE);
    sorted
}

/// The whole category, most installed first; ties keep fetch order.
pub fn all_apps(plugins: &[Plugin]) -> Vec<Plugin> {
    let mut sorted = plugins.to_vec();
    sorted.sort_by(|a, b| b.active_installs.cmp(&a.active_installs));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn plugin(slug: &str, installs: i64) -> Plugin {
        Plugin {
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            category: "seo".to_string(),
            summary: None,
            active_installs: installs,
        }
    }

    fn plugins(installs: &[i64]) -> Vec<Plugin> {
        installs
            .iter()
            .enumerate()
            .map(|(i, &n)| plugin(&format!("app-{}", i), n))
            .collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn popular_is_empty_at_six_or_fewer() {
        assert!(most_popular(&plugins(&[9, 8, 7, 6, 5, 4])).is_empty());
        assert!(most_popular(&[]).is_empty());
    }

    #[test]
    fn popular_takes_top_six_above_six() {
        let input = plugins(&[10, 70, 30, 90, 50, 20, 60, 40]);
        let popular = most_popular(&input);
        let installs: Vec<i64> = popular.iter().map(|p| p.active_installs).collect();
        assert_eq!(installs, vec![90, 70, 60, 50, 40, 30]);
    }

    #[test]
    fn all_apps_is_a_sorted_permutation() {
        let input = plugins(&[3, 14, 0, 159, 2, 6]);
        let all = all_apps(&input);
        assert_eq!(all.len(), input.len());
        assert!(all.windows(2).all(|w| w[0].active_installs >= w[1].active_installs));

        let mut got: Vec<&str> = all.iter().map(|p| p.slug.as_str()).collect();
        let mut want: Vec<&str> = input.iter().map(|p| p.slug.as_str()).collect();
        got.sort_unstable();
        want.sort_unstable();
        assert_eq!(got, want);
    }

    #[test]
    fn all_apps_keeps_fetch_order_on_ties() {
        let input = plugins(&[5, 9, 5, 5]);
        let all = all_apps(&input);
        let slugs: Vec<&str> = all.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["app-1", "app-0", "app-2", "app-3"]);
    }

    #[test]
    fn new_bucket_samples_four_zero_install_plugins() {
        let input = plugins(&[0, 0, 0, 0, 0, 5]);
        let bucket = new_or_recent(&input, &mut rng());

        assert_eq!(bucket.len(), 4);
        assert!(bucket.iter().all(|p| p.active_installs == 0));

        let mut slugs: Vec<&str> = bucket.iter().map(|p| p.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), 4);
    }

    #[test]
    fn new_bucket_falls_back_to_lowest_installs() {
        let input = plugins(&[10, 3, 3, 7]);
        let bucket = new_or_recent(&input, &mut rng());

        let mut installs: Vec<i64> = bucket.iter().map(|p| p.active_installs).collect();
        installs.sort_unstable();
        assert_eq!(installs, vec![3, 3, 7, 10]);
    }

    #[test]
    fn new_bucket_fallback_drops_the_highest() {
        // only two zero-install plugins, so the four lowest stand in
        let input = plugins(&[0, 40, 0, 8, 2, 90]);
        let bucket = new_or_recent(&input, &mut rng());

        let mut installs: Vec<i64> = bucket.iter().map(|p| p.active_installs).collect();
        installs.sort_unstable();
        assert_eq!(installs, vec![0, 0, 2, 8]);
    }

    #[test]
    fn new_bucket_returns_everything_below_four() {
        let input = plugins(&[5, 9]);
        let bucket = new_or_recent(&input, &mut rng());
        assert_eq!(bucket.len(), 2);
    }

    #[test]
    fn empty_category_derives_empty_buckets() {
        let buckets = derive_buckets(&[], &mut rng());
        assert!(buckets.new_or_recent.is_empty());
        assert!(buckets.most_popular.is_empty());
        assert!(buckets.all_apps.is_empty());
    }
}
