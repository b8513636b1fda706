//! Rank-weighted origin shares for a single chart week.
//!
//! Each qualifying entry weighs `(N + 1) - rank`, split evenly across its
//! credited origins. Entries without a known origin add nothing to the share
//! map but still count toward the collaboration-rate denominator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ChartEntry, ShareDistribution, WeeklyMetrics};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregationConfig {
    /// Chart depth that receives weight; rank `top_n` weighs 1.
    pub top_n: u32,
    /// Upper-cased code treated as domestic for `non_domestic_share`.
    pub home_country: String,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            top_n: 100,
            home_country: "US".into(),
        }
    }
}

/// Share map plus per-week scalars. `cumulative_origins_so_far` is filled by
/// [`super::MetricsSeries`], never here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekAggregate {
    pub shares: ShareDistribution,
    pub metrics: WeeklyMetrics,
}

/// Linear decay: rank 1 weighs `n`, rank `n` weighs 1, deeper ranks weigh 0.
pub fn rank_weight(rank: u32, n: u32) -> f64 {
    f64::from(n.saturating_add(1).saturating_sub(rank))
}

pub fn aggregate_week(rows: &[ChartEntry], config: &AggregationConfig) -> WeekAggregate {
    let mut weights: BTreeMap<String, f64> = BTreeMap::new();
    let mut total = 0.0;
    let mut qualifying = 0usize;
    let mut collaborations = 0usize;

    for entry in rows.iter().filter(|entry| entry.rank <= config.top_n) {
        qualifying += 1;
        if entry.is_collaboration() {
            collaborations += 1;
        }
        if entry.origins.is_empty() {
            continue;
        }

        let weight = rank_weight(entry.rank, config.top_n);
        let split = weight / entry.origins.len() as f64;
        for origin in &entry.origins {
            *weights.entry(origin.clone()).or_insert(0.0) += split;
        }
        total += weight;
    }

    let collaboration_rate_pct = if qualifying == 0 {
        0.0
    } else {
        collaborations as f64 / qualifying as f64 * 100.0
    };

    if total <= 0.0 {
        return WeekAggregate {
            shares: ShareDistribution::default(),
            metrics: WeeklyMetrics {
                collaboration_rate_pct,
                ..WeeklyMetrics::default()
            },
        };
    }

    let shares = ShareDistribution(
        weights
            .into_iter()
            .map(|(code, weight)| (code, weight / total))
            .collect(),
    );

    let metrics = WeeklyMetrics {
        non_domestic_share: (1.0 - shares.get(&config.home_country)).max(0.0),
        unique_origin_count: shares.len(),
        entropy: shares.entropy(),
        collaboration_rate_pct,
        cumulative_origins_so_far: 0,
    };

    WeekAggregate { shares, metrics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(rank: u32, origins: &[&str]) -> ChartEntry {
        ChartEntry {
            date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            week_index: Some(0),
            rank,
            track_id: format!("t{rank}"),
            name: String::new(),
            artists: Vec::new(),
            genre: "Unknown".into(),
            origins: origins.iter().map(|o| o.to_string()).collect(),
        }
    }

    fn config(top_n: u32) -> AggregationConfig {
        AggregationConfig {
            top_n,
            home_country: "US".into(),
        }
    }

    #[test]
    fn rank_weight_decays_linearly() {
        assert_eq!(rank_weight(1, 100), 100.0);
        assert_eq!(rank_weight(100, 100), 1.0);
        assert_eq!(rank_weight(101, 100), 0.0);
        assert_eq!(rank_weight(150, 100), 0.0);
        assert_eq!(rank_weight(1, u32::MAX), f64::from(u32::MAX));
    }

    #[test]
    fn two_track_week_matches_worked_example() {
        let rows = vec![entry(1, &["US"]), entry(2, &["GB", "US"])];
        let agg = aggregate_week(&rows, &config(2));

        assert!((agg.shares.get("US") - 2.5 / 3.0).abs() < 1e-12);
        assert!((agg.shares.get("GB") - 0.5 / 3.0).abs() < 1e-12);
        assert!((agg.metrics.non_domestic_share - 0.5 / 3.0).abs() < 1e-12);
        assert!((agg.metrics.entropy - 0.4506).abs() < 1e-4);
        assert_eq!(agg.metrics.unique_origin_count, 2);
        assert_eq!(agg.metrics.collaboration_rate_pct, 50.0);
    }

    #[test]
    fn collaboration_split_preserves_track_weight() {
        let solo = aggregate_week(&[entry(1, &["US"]), entry(2, &["SE"])], &config(2));
        let duo = aggregate_week(&[entry(1, &["US"]), entry(2, &["SE", "NO"])], &config(2));

        let duo_nordic = duo.shares.get("SE") + duo.shares.get("NO");
        assert!((solo.shares.get("SE") - duo_nordic).abs() < 1e-12);
        assert!((solo.shares.get("US") - duo.shares.get("US")).abs() < 1e-12);
    }

    #[test]
    fn originless_entries_only_affect_collaboration_denominator() {
        let rows = vec![entry(1, &[]), entry(2, &["GB", "IE"]), entry(3, &["US"])];
        let agg = aggregate_week(&rows, &config(3));

        // weights: GB/IE 2 split evenly, US 1; originless rank 1 contributes nothing
        assert!((agg.shares.get("US") - 1.0 / 3.0).abs() < 1e-12);
        assert!((agg.shares.total() - 1.0).abs() < 1e-12);
        assert!((agg.metrics.collaboration_rate_pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn weeks_without_weight_produce_zero_defaults() {
        let agg = aggregate_week(&[entry(1, &[]), entry(2, &[])], &config(2));
        assert!(agg.shares.is_empty());
        assert_eq!(agg.metrics.non_domestic_share, 0.0);
        assert_eq!(agg.metrics.entropy, 0.0);
        assert_eq!(agg.metrics.unique_origin_count, 0);

        assert_eq!(aggregate_week(&[], &config(100)), WeekAggregate::default());
    }

    #[test]
    fn entries_beyond_top_n_are_ignored() {
        let agg = aggregate_week(&[entry(1, &["US"]), entry(3, &["GB"])], &config(2));
        assert_eq!(agg.shares.get("US"), 1.0);
        assert_eq!(agg.metrics.entropy, 0.0);
        assert_eq!(agg.metrics.non_domestic_share, 0.0);
        assert_eq!(agg.metrics.collaboration_rate_pct, 0.0);
    }
}
