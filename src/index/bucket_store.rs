use std::ops::Range;

use crate::models::ChartEntry;

use super::week_index::WeekIndex;

/// Chart rows grouped by week, each bucket ascending by rank.
///
/// Rows live in one vector ordered by `(week_index, rank)`, so the flattened
/// view is also the date-sorted stream the rolling-window queries scan.
#[derive(Debug, Clone, Default)]
pub struct WeekBucketStore {
    entries: Vec<ChartEntry>,
    buckets: Vec<Range<usize>>,
}

impl WeekBucketStore {
    /// Resolves week indices and buckets the rows. Ties in rank keep input order.
    pub fn build(mut entries: Vec<ChartEntry>, index: &WeekIndex) -> Self {
        index.assign(&mut entries);
        entries.retain(|entry| entry.week_index.is_some());
        entries.sort_by_key(|entry| (entry.week_index, entry.rank));

        let mut buckets = vec![0..0; index.len()];
        let mut start = 0;
        while start < entries.len() {
            let week = entries[start].week_index;
            let end = start
                + entries[start..]
                    .iter()
                    .take_while(|entry| entry.week_index == week)
                    .count();
            if let Some(bucket) = week.and_then(|w| buckets.get_mut(w)) {
                *bucket = start..end;
            }
            start = end;
        }

        debug_assert!(
            entries.windows(2).all(|pair| pair[0].date <= pair[1].date),
            "week order must follow date order"
        );
        Self { entries, buckets }
    }

    /// Rows for one week; empty for an unknown index.
    pub fn week_rows(&self, week: usize) -> &[ChartEntry] {
        self.buckets
            .get(week)
            .and_then(|range| self.entries.get(range.clone()))
            .unwrap_or(&[])
    }

    /// Leading rows of a week whose rank is within `1..=n`.
    pub fn top_rows(&self, week: usize, n: u32) -> &[ChartEntry] {
        let rows = self.week_rows(week);
        let cut = rows.partition_point(|entry| entry.rank <= n);
        &rows[..cut]
    }

    pub fn week_count(&self) -> usize {
        self.buckets.len()
    }

    /// Every row, ascending by date then rank.
    pub fn entries(&self) -> &[ChartEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &[ChartEntry]> + '_ {
        (0..self.week_count()).map(move |week| self.week_rows(week))
    }
}
