//! Country and genre roll-ups for the geographic view.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{ChartEntry, CountryCode};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryGenreSummary {
    pub country: CountryCode,
    pub track_count: usize,
    /// Genre histogram, most frequent first, ties by name.
    pub genres: Vec<(String, usize)>,
}

impl CountryGenreSummary {
    pub fn dominant_genre(&self) -> Option<&str> {
        self.genres.first().map(|(genre, _)| genre.as_str())
    }
}

/// Distinct tracks per origin country with their genre mix. A track counts once
/// per credited country no matter how many weeks it charted.
pub fn country_genre_summary(entries: &[ChartEntry]) -> Vec<CountryGenreSummary> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut by_country: BTreeMap<&str, BTreeMap<&str, usize>> = BTreeMap::new();

    for entry in entries {
        for origin in &entry.origins {
            if !seen.insert((origin.as_str(), entry.track_id.as_str())) {
                continue;
            }
            *by_country
                .entry(origin.as_str())
                .or_default()
                .entry(entry.genre.as_str())
                .or_insert(0) += 1;
        }
    }

    let mut summaries: Vec<CountryGenreSummary> = by_country
        .into_iter()
        .map(|(country, genres)| {
            let track_count = genres.values().sum();
            CountryGenreSummary {
                country: country.to_string(),
                track_count,
                genres: sorted_counts(genres),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.track_count
            .cmp(&a.track_count)
            .then_with(|| a.country.cmp(&b.country))
    });
    summaries
}

/// Distinct-track count per genre, most popular first.
pub fn genre_popularity(entries: &[ChartEntry]) -> Vec<(String, usize)> {
    let mut tracks: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for entry in entries {
        tracks
            .entry(entry.genre.as_str())
            .or_default()
            .insert(entry.track_id.as_str());
    }
    sorted_counts(
        tracks
            .into_iter()
            .map(|(genre, ids)| (genre, ids.len()))
            .collect(),
    )
}

fn sorted_counts(counts: BTreeMap<&str, usize>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}
