//! Peak-rank lookups over the date-sorted entry stream.
//!
//! The stream handed to [`RollingWindowQuery`] must be ascending by date; the
//! bucket store guarantees this. Window starts are found by binary search and
//! the scan stops at the first entry past the window end.

use std::collections::HashMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{ChartEntry, CountryCode};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearTrack {
    pub track_id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub genre: String,
    pub origins: Vec<CountryCode>,
    pub peak_rank: u32,
    pub weeks_on_chart: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct RollingWindowQuery<'a> {
    entries: &'a [ChartEntry],
}

impl<'a> RollingWindowQuery<'a> {
    pub fn new(entries: &'a [ChartEntry]) -> Self {
        Self { entries }
    }

    /// First position whose date is `>= date`.
    pub fn lower_bound(&self, date: NaiveDate) -> usize {
        self.entries.partition_point(|entry| entry.date < date)
    }

    /// Entries dated within `[start, end)`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> &'a [ChartEntry] {
        let entries = self.entries;
        let from = self.lower_bound(start);
        let to = from + entries[from..].partition_point(|entry| entry.date < end);
        &entries[from..to]
    }

    pub fn year_entries(&self, year: i32) -> &'a [ChartEntry] {
        match (
            NaiveDate::from_ymd_opt(year, 1, 1),
            year.checked_add(1).and_then(|next| NaiveDate::from_ymd_opt(next, 1, 1)),
        ) {
            (Some(start), Some(end)) => self.between(start, end),
            _ => &[],
        }
    }

    /// Best rank per track among entries dated in `year`.
    pub fn peak_in_year(&self, year: i32) -> HashMap<String, u32> {
        best_ranks(self.year_entries(year))
    }

    /// Best rank per track within `[start, start + 1 year)`. Empty when `start`
    /// is past the last chart date.
    pub fn peak_in_rolling_window(&self, start: NaiveDate) -> HashMap<String, u32> {
        let end = window_end(start);
        let mut peaks: HashMap<String, u32> = HashMap::new();

        for entry in &self.entries[self.lower_bound(start)..] {
            if entry.date >= end {
                break;
            }
            keep_best(&mut peaks, entry);
        }
        peaks
    }

    /// Tracks charting in `year`, best peak first, then longest run, then id.
    pub fn top_tracks_in_year(&self, year: i32, n: usize) -> Vec<YearTrack> {
        let mut tracks: HashMap<&str, YearTrack> = HashMap::new();

        for entry in self.year_entries(year) {
            let track = tracks
                .entry(entry.track_id.as_str())
                .or_insert_with(|| YearTrack {
                    track_id: entry.track_id.clone(),
                    name: entry.name.clone(),
                    artists: entry.artists.clone(),
                    genre: entry.genre.clone(),
                    origins: entry.origins.iter().cloned().collect(),
                    peak_rank: entry.rank,
                    weeks_on_chart: 0,
                });
            track.peak_rank = track.peak_rank.min(entry.rank);
            track.weeks_on_chart += 1;
        }

        let mut ranked: Vec<YearTrack> = tracks.into_values().collect();
        ranked.sort_by(|a, b| {
            a.peak_rank
                .cmp(&b.peak_rank)
                .then_with(|| b.weeks_on_chart.cmp(&a.weeks_on_chart))
                .then_with(|| a.track_id.cmp(&b.track_id))
        });
        ranked.truncate(n);
        ranked
    }

    /// Calendar years present in the stream, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = Vec::new();
        for entry in self.entries {
            if years.last() != Some(&entry.date.year()) {
                years.push(entry.date.year());
            }
        }
        years
    }
}

/// Exclusive end of the one-year window opened at `start`. Feb 29 rolls to Feb 28.
pub fn window_end(start: NaiveDate) -> NaiveDate {
    start
        .checked_add_months(Months::new(12))
        .unwrap_or(NaiveDate::MAX)
}

fn best_ranks(entries: &[ChartEntry]) -> HashMap<String, u32> {
    let mut peaks = HashMap::new();
    for entry in entries {
        keep_best(&mut peaks, entry);
    }
    peaks
}

fn keep_best(peaks: &mut HashMap<String, u32>, entry: &ChartEntry) {
    peaks
        .entry(entry.track_id.clone())
        .and_modify(|best| *best = (*best).min(entry.rank))
        .or_insert(entry.rank);
}
