use std::collections::{BTreeMap, HashSet};

use crate::index::WeekBucketStore;
use crate::models::{ShareDistribution, WeeklyMetrics};

use super::origin_share::{aggregate_week, AggregationConfig, WeekAggregate};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = false;

use crate::log_info;

static EMPTY_SHARES: ShareDistribution = ShareDistribution(BTreeMap::new());

/// Per-week aggregates for the whole dataset, built in one ascending pass so the
/// running origin union is updated once per week.
#[derive(Debug, Clone, Default)]
pub struct MetricsSeries {
    weeks: Vec<WeekAggregate>,
}

impl MetricsSeries {
    pub fn compute(store: &WeekBucketStore, config: &AggregationConfig) -> Self {
        let mut seen: HashSet<String> = HashSet::new();
        let mut weeks = Vec::with_capacity(store.week_count());

        for rows in store.iter() {
            let mut aggregate = aggregate_week(rows, config);
            seen.extend(aggregate.shares.countries().cloned());
            aggregate.metrics.cumulative_origins_so_far = seen.len();
            weeks.push(aggregate);
        }

        log_info!(
            "computed origin metrics for {} weeks ({} origins overall)",
            weeks.len(),
            seen.len()
        );
        Self { weeks }
    }

    /// Metrics for one week; zero defaults when the index is out of range.
    pub fn metrics_at(&self, week: usize) -> WeeklyMetrics {
        self.weeks
            .get(week)
            .map(|aggregate| aggregate.metrics.clone())
            .unwrap_or_default()
    }

    pub fn shares_at(&self, week: usize) -> &ShareDistribution {
        self.weeks
            .get(week)
            .map(|aggregate| &aggregate.shares)
            .unwrap_or(&EMPTY_SHARES)
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeekAggregate> + '_ {
        self.weeks.iter()
    }

    /// One scalar per week, e.g. `series.line(|m| m.entropy)` for a sparkline.
    pub fn line<F>(&self, pick: F) -> Vec<f64>
    where
        F: Fn(&WeeklyMetrics) -> f64,
    {
        self.weeks.iter().map(|aggregate| pick(&aggregate.metrics)).collect()
    }
}
