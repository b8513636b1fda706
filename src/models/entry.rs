//! Chart entry data models.
//!
//! - `ChartEntry`: one normalized chart appearance
//! - `CalendarWeek`: a chart-publication date paired with its dense week index

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Upper-cased ISO country code, e.g. `"US"`.
pub type CountryCode = String;

pub const UNKNOWN_GENRE: &str = "Unknown";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    pub date: NaiveDate,
    /// Resolved once the full date set is known; `None` straight out of the normalizer.
    pub week_index: Option<usize>,
    pub rank: u32,
    pub track_id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub genre: String,
    pub origins: BTreeSet<CountryCode>,
}

impl ChartEntry {
    pub fn date_key(&self) -> String {
        format_date(self.date)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn is_collaboration(&self) -> bool {
        self.origins.len() >= 2
    }

    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarWeek {
    pub index: usize,
    pub date: String,
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
