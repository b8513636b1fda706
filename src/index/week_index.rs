use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;

use crate::models::{format_date, CalendarWeek, ChartEntry};

/// Dense, chronological numbering of the distinct chart dates present in the data.
#[derive(Debug, Clone, Default)]
pub struct WeekIndex {
    dates: Vec<NaiveDate>,
    labels: Vec<String>,
    by_label: HashMap<String, usize>,
}

impl WeekIndex {
    /// Collects the distinct dates and numbers them `0..N-1` in ascending order.
    pub fn build(entries: &[ChartEntry]) -> Self {
        let dates: Vec<NaiveDate> = entries
            .iter()
            .map(|entry| entry.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let labels: Vec<String> = dates.iter().copied().map(format_date).collect();
        let by_label = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index))
            .collect();

        Self {
            dates,
            labels,
            by_label,
        }
    }

    /// Second phase: stamps every entry with its week index.
    pub fn assign(&self, entries: &mut [ChartEntry]) {
        for entry in entries {
            entry.week_index = self.index_of(entry.date);
        }
    }

    /// Exact lookup of a `YYYY-MM-DD` label; no nearest-week fallback.
    pub fn date_to_index(&self, date: &str) -> Option<usize> {
        self.by_label.get(date).copied()
    }

    pub fn index_to_date(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn latest(&self) -> Option<usize> {
        self.len().checked_sub(1)
    }

    pub fn weeks(&self) -> impl Iterator<Item = CalendarWeek> + '_ {
        self.labels
            .iter()
            .enumerate()
            .map(|(index, date)| CalendarWeek {
                index,
                date: date.clone(),
            })
    }
}
