use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entry::{ChartEntry, CountryCode};

/// Normalized share per country of origin for one chart week.
/// Empty when no qualifying entry carried a known origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ShareDistribution(pub BTreeMap<CountryCode, f64>);

impl ShareDistribution {
    pub fn get(&self, code: &str) -> f64 {
        self.0.get(code).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn countries(&self) -> impl Iterator<Item = &CountryCode> {
        self.0.keys()
    }

    /// Shannon entropy in nats.
    pub fn entropy(&self) -> f64 {
        let h: f64 = self
            .0
            .values()
            .filter(|p| **p > 0.0)
            .map(|p| -p * p.ln())
            .sum();
        // -p·ln(p) for p == 1.0 is -0.0
        h.max(0.0)
    }

    /// The `k` largest shares, descending, ties broken by country code.
    pub fn top(&self, k: usize) -> Vec<(CountryCode, f64)> {
        let mut shares: Vec<(CountryCode, f64)> =
            self.0.iter().map(|(code, p)| (code.clone(), *p)).collect();
        shares.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        shares.truncate(k);
        shares
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMetrics {
    pub non_domestic_share: f64,
    pub unique_origin_count: usize,
    pub entropy: f64,
    pub collaboration_rate_pct: f64,
    pub cumulative_origins_so_far: usize,
}

/// Everything a renderer needs for one timeline position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSnapshot {
    pub week_index: usize,
    pub date: String,
    pub rows: Vec<ChartEntry>,
    pub shares: ShareDistribution,
    pub metrics: WeeklyMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist(pairs: &[(&str, f64)]) -> ShareDistribution {
        ShareDistribution(
            pairs
                .iter()
                .map(|(code, p)| (code.to_string(), *p))
                .collect(),
        )
    }

    #[test]
    fn entropy_is_zero_for_a_single_country() {
        assert_eq!(dist(&[("US", 1.0)]).entropy(), 0.0);
        assert_eq!(ShareDistribution::default().entropy(), 0.0);
    }

    #[test]
    fn entropy_of_uniform_pair_is_ln_two() {
        let h = dist(&[("US", 0.5), ("GB", 0.5)]).entropy();
        assert!((h - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn top_orders_by_share_then_code() {
        let d = dist(&[("SE", 0.25), ("GB", 0.25), ("US", 0.5)]);
        let top = d.top(2);
        assert_eq!(top[0].0, "US");
        assert_eq!(top[1].0, "GB");
        assert_eq!(d.get("FR"), 0.0);
    }
}
