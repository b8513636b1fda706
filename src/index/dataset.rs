use std::collections::HashMap;

use serde_json::Value;

use crate::aggregation::{
    country_genre_summary, genre_popularity, AggregationConfig, CountryGenreSummary, MetricsSeries,
};
use crate::models::{ChartEntry, CountryCode, ShareDistribution, WeekSnapshot, WeeklyMetrics};
use crate::normalize::{normalize_records, SkipStats};
use crate::rolling::{RollingWindowQuery, YearTrack};
use crate::settings::ViewSettings;

use super::bucket_store::WeekBucketStore;
use super::week_index::WeekIndex;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Everything derived from one dataset snapshot. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ChartDataset {
    settings: ViewSettings,
    aggregation: AggregationConfig,
    index: WeekIndex,
    store: WeekBucketStore,
    metrics: MetricsSeries,
    stats: SkipStats,
}

impl ChartDataset {
    /// Normalizes raw rows, indexes weeks, buckets rows and runs the metrics pass.
    pub fn build(values: &[Value], settings: &ViewSettings) -> Self {
        let normalized = normalize_records(values, &settings.normalizer_config());
        let mut dataset = Self::from_entries(normalized.entries, settings);
        dataset.stats = normalized.stats;
        dataset
    }

    pub fn from_entries(entries: Vec<ChartEntry>, settings: &ViewSettings) -> Self {
        let aggregation = settings.aggregation_config();
        let index = WeekIndex::build(&entries);
        let store = WeekBucketStore::build(entries, &index);
        let metrics = MetricsSeries::compute(&store, &aggregation);
        let stats = SkipStats {
            read: store.entries().len(),
            kept: store.entries().len(),
            ..SkipStats::default()
        };

        log_info!(
            "indexed {} chart rows into {} weeks ({} .. {})",
            store.entries().len(),
            index.len(),
            index.index_to_date(0).unwrap_or("-"),
            index.latest().and_then(|w| index.index_to_date(w)).unwrap_or("-"),
        );

        Self {
            settings: settings.clone(),
            aggregation,
            index,
            store,
            metrics,
            stats,
        }
    }

    /// The "no data" state left behind by a failed load.
    pub fn empty(settings: &ViewSettings) -> Self {
        Self::from_entries(Vec::new(), settings)
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn week_index(&self) -> &WeekIndex {
        &self.index
    }

    pub fn buckets(&self) -> &WeekBucketStore {
        &self.store
    }

    pub fn metrics(&self) -> &MetricsSeries {
        &self.metrics
    }

    pub fn skip_stats(&self) -> &SkipStats {
        &self.stats
    }

    /// All rows, ascending by date.
    pub fn entries(&self) -> &[ChartEntry] {
        self.store.entries()
    }

    pub fn week_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn rolling(&self) -> RollingWindowQuery<'_> {
        RollingWindowQuery::new(self.store.entries())
    }

    pub fn week_rows(&self, week: usize) -> &[ChartEntry] {
        self.store.week_rows(week)
    }

    pub fn metrics_at(&self, week: usize) -> WeeklyMetrics {
        self.metrics.metrics_at(week)
    }

    pub fn shares_at(&self, week: usize) -> &ShareDistribution {
        self.metrics.shares_at(week)
    }

    pub fn top_origins(&self, week: usize, k: usize) -> Vec<(CountryCode, f64)> {
        self.shares_at(week).top(k)
    }

    /// Renderer payload for one timeline position. Out-of-range weeks get an
    /// empty snapshot with a blank date.
    pub fn snapshot(&self, week: usize) -> WeekSnapshot {
        WeekSnapshot {
            week_index: week,
            date: self
                .index
                .index_to_date(week)
                .map(str::to_string)
                .unwrap_or_default(),
            rows: self.store.top_rows(week, self.aggregation.top_n).to_vec(),
            shares: self.shares_at(week).clone(),
            metrics: self.metrics_at(week),
        }
    }

    /// Best rank per track in the year that opens at `week`'s chart date.
    pub fn peaks_from_week(&self, week: usize) -> HashMap<String, u32> {
        match self.index.date_at(week) {
            Some(start) => self.rolling().peak_in_rolling_window(start),
            None => HashMap::new(),
        }
    }

    pub fn top_tracks_in_year(&self, year: i32) -> Vec<YearTrack> {
        self.rolling()
            .top_tracks_in_year(year, self.settings.year_top_n)
    }

    pub fn country_genre_summary(&self, year: i32) -> Vec<CountryGenreSummary> {
        country_genre_summary(self.rolling().year_entries(year))
    }

    pub fn genre_popularity(&self, year: i32) -> Vec<(String, usize)> {
        genre_popularity(self.rolling().year_entries(year))
    }
}
