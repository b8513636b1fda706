use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{format_date, ChartEntry, RawRecord, UNKNOWN_GENRE};

use super::config::NormalizerConfig;
use super::origins::{normalize_origins, ORIGIN_FIELDS, ORIGIN_SEPARATORS};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_info;

const DATE_FIELDS: &[&str] = &["date", "chart_date", "week"];
const RANK_FIELDS: &[&str] = &["rank", "peak-rank", "peak_rank", "position"];
const TRACK_ID_FIELDS: &[&str] = &["track_id", "trackId", "id", "song_id"];
const NAME_FIELDS: &[&str] = &["name", "song", "title"];
const ARTIST_FIELDS: &[&str] = &["artists", "artist"];
const ARTIST_SEPARATORS: &[&str] = &[",", ";", " feat. ", " featuring ", " ft. "];
const GENRE_FIELDS: &[&str] = &["genre", "genres"];
const GENRE_SEPARATORS: &[&str] = &[",", ";", "|"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Why a raw row was dropped. Rows are skipped silently; the reason only feeds [`SkipStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Error, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("date is missing")]
    MissingDate,
    #[error("date could not be parsed")]
    UnparseableDate,
    #[error("date is before the configured start boundary")]
    BeforeStart,
    #[error("rank is missing or not an integer")]
    InvalidRank,
    #[error("rank is outside the accepted range")]
    RankOutOfRange,
    #[error("artist/track identity cannot be formed")]
    MissingIdentity,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SkipStats {
    pub read: usize,
    pub kept: usize,
    pub skipped: BTreeMap<SkipReason, usize>,
}

impl SkipStats {
    pub fn record(&mut self, reason: SkipReason) {
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn count(&self, reason: SkipReason) -> usize {
        self.skipped.get(&reason).copied().unwrap_or(0)
    }
}

/// Output of a normalization pass: canonical entries in input order plus skip tallies.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub entries: Vec<ChartEntry>,
    pub stats: SkipStats,
}

/// Validates and coerces one raw row. `week_index` is left unresolved.
pub fn normalize_record(
    raw: &RawRecord,
    config: &NormalizerConfig,
) -> Result<ChartEntry, SkipReason> {
    let date_text = raw.text(DATE_FIELDS).ok_or(SkipReason::MissingDate)?;
    let date = parse_date(&date_text).ok_or(SkipReason::UnparseableDate)?;
    if date < config.start_date {
        return Err(SkipReason::BeforeStart);
    }

    let rank = parse_rank(raw.field(RANK_FIELDS), config.max_rank)?;

    let name = raw.text(NAME_FIELDS).unwrap_or_default();
    let artists: Vec<String> = raw
        .list(ARTIST_FIELDS, ARTIST_SEPARATORS)
        .iter()
        .map(|a| clean_token(a))
        .filter(|a| !a.is_empty())
        .collect();

    let genre = raw
        .list(GENRE_FIELDS, GENRE_SEPARATORS)
        .into_iter()
        .map(|g| clean_token(&g))
        .find(|g| !g.is_empty())
        .unwrap_or_else(|| UNKNOWN_GENRE.to_string());

    let origins = normalize_origins(raw.list(ORIGIN_FIELDS, ORIGIN_SEPARATORS));

    let mut entry = ChartEntry {
        date,
        week_index: None,
        rank,
        track_id: String::new(),
        name,
        artists,
        genre,
        origins,
    };

    entry.track_id = match raw.text(TRACK_ID_FIELDS) {
        Some(id) => id,
        None => match (entry.primary_artist(), entry.name.is_empty()) {
            (Some(artist), false) => {
                format!("{}::{}", artist.to_lowercase(), entry.name.to_lowercase())
            }
            _ if config.require_identity => return Err(SkipReason::MissingIdentity),
            _ => format!("{}#{}", format_date(date), rank),
        },
    };

    Ok(entry)
}

/// Normalizes every value, keeping only the rows that pass validation.
pub fn normalize_records<'a, I>(values: I, config: &NormalizerConfig) -> Normalized
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut out = Normalized::default();

    for value in values {
        out.stats.read += 1;
        let result = match value {
            Value::Object(map) => normalize_record(&RawRecord(map.clone()), config),
            _ => Err(SkipReason::NotAnObject),
        };
        match result {
            Ok(entry) => out.entries.push(entry),
            Err(reason) => out.stats.record(reason),
        }
    }

    out.stats.kept = out.entries.len();
    log_info!(
        "normalized {} of {} chart rows ({} skipped)",
        out.stats.kept,
        out.stats.read,
        out.stats.skipped_total()
    );
    out
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    [Some(text), text.get(..10)]
        .into_iter()
        .flatten()
        .find_map(|candidate| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
        })
}

fn parse_rank(value: Option<&Value>, max_rank: u32) -> Result<u32, SkipReason> {
    let rank = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(SkipReason::InvalidRank)?;

    if !rank.is_finite() || rank.fract() != 0.0 {
        return Err(SkipReason::InvalidRank);
    }
    if rank < 1.0 || rank > f64::from(max_rank) {
        return Err(SkipReason::RankOutOfRange);
    }
    Ok(rank as u32)
}

fn clean_token(token: &str) -> String {
    token
        .trim()
        .trim_matches(|c: char| c == '\'' || c == '"' || c == '[' || c == ']')
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        RawRecord::from_value(value).unwrap()
    }

    fn config() -> NormalizerConfig {
        NormalizerConfig::default()
    }

    #[test]
    fn well_formed_row_is_canonicalized() {
        let entry = normalize_record(
            &raw(json!({
                "date": "1999-06-12",
                "rank": 3,
                "track_id": "t1",
                "name": "Song",
                "artists": "A, B feat. C",
                "genres": "['dance pop', 'pop']",
                "country": "us; gb"
            })),
            &config(),
        )
        .unwrap();

        assert_eq!(entry.date_key(), "1999-06-12");
        assert_eq!(entry.week_index, None);
        assert_eq!(entry.rank, 3);
        assert_eq!(entry.artists, vec!["A", "B", "C"]);
        assert_eq!(entry.genre, "dance pop");
        assert!(entry.is_collaboration());
        assert!(entry.origins.contains("US") && entry.origins.contains("GB"));
    }

    #[test]
    fn date_variants_are_accepted() {
        assert!(parse_date("2001/02/03").is_some());
        assert_eq!(
            parse_date("2001-02-03T00:00:00Z"),
            NaiveDate::from_ymd_opt(2001, 2, 3)
        );
        assert!(parse_date("last tuesday").is_none());
    }

    #[test]
    fn rejects_bad_dates_and_ranks() {
        let cfg = config();
        let cases = [
            (json!({ "rank": 1 }), SkipReason::MissingDate),
            (json!({ "date": "soon", "rank": 1 }), SkipReason::UnparseableDate),
            (json!({ "date": "1979-12-29", "rank": 1 }), SkipReason::BeforeStart),
            (json!({ "date": "1990-01-06", "rank": 1.5 }), SkipReason::InvalidRank),
            (json!({ "date": "1990-01-06", "rank": "x" }), SkipReason::InvalidRank),
            (json!({ "date": "1990-01-06" }), SkipReason::InvalidRank),
            (json!({ "date": "1990-01-06", "rank": 0 }), SkipReason::RankOutOfRange),
            (json!({ "date": "1990-01-06", "rank": 101 }), SkipReason::RankOutOfRange),
        ];
        for (value, expected) in cases {
            assert_eq!(normalize_record(&raw(value), &cfg), Err(expected));
        }
    }

    #[test]
    fn extended_charts_accept_higher_ranks() {
        let cfg = NormalizerConfig {
            max_rank: 200,
            ..config()
        };
        let entry = normalize_record(&raw(json!({ "date": "1990-01-06", "peak-rank": "150" })), &cfg);
        assert_eq!(entry.map(|e| e.rank), Ok(150));
    }

    #[test]
    fn identity_falls_back_to_artist_and_title() {
        let entry = normalize_record(
            &raw(json!({ "date": "1990-01-06", "rank": 4, "artist": "ABBA", "song": "Waterloo" })),
            &config(),
        )
        .unwrap();
        assert_eq!(entry.track_id, "abba::waterloo");
    }

    #[test]
    fn identity_uses_cleaned_primary_artist() {
        let quoted = normalize_record(
            &raw(json!({ "date": "2016-05-07", "rank": 9, "artists": "['Drake', 'Future']", "name": "Jumpman" })),
            &config(),
        )
        .unwrap();
        let listed = normalize_record(
            &raw(json!({ "date": "2016-05-07", "rank": 9, "artists": ["Drake", "Future"], "name": "Jumpman" })),
            &config(),
        )
        .unwrap();

        assert_eq!(quoted.artists, vec!["Drake", "Future"]);
        assert_eq!(quoted.track_id, "drake::jumpman");
        assert_eq!(quoted.track_id, listed.track_id);
    }

    #[test]
    fn listed_artist_names_keep_their_commas() {
        let entry = normalize_record(
            &raw(json!({ "date": "1981-01-03", "rank": 8, "artists": ["Earth, Wind & Fire"], "name": "September" })),
            &config(),
        )
        .unwrap();

        assert_eq!(entry.artists, vec!["Earth, Wind & Fire"]);
        assert_eq!(entry.track_id, "earth, wind & fire::september");
    }

    #[test]
    fn identity_required_only_for_geographic_rows() {
        let anonymous = raw(json!({ "date": "1990-01-06", "rank": 4 }));
        let lenient = normalize_record(&anonymous, &config()).unwrap();
        assert_eq!(lenient.track_id, "1990-01-06#4");

        let strict = NormalizerConfig {
            require_identity: true,
            ..config()
        };
        assert_eq!(
            normalize_record(&anonymous, &strict),
            Err(SkipReason::MissingIdentity)
        );
    }

    #[test]
    fn blank_genre_defaults_to_unknown_and_origins_may_be_empty() {
        let entry = normalize_record(
            &raw(json!({ "date": "1990-01-06", "rank": 4, "genre": " ", "origin": ["unknown"] })),
            &config(),
        )
        .unwrap();
        assert_eq!(entry.genre, UNKNOWN_GENRE);
        assert!(entry.origins.is_empty());
    }

    #[test]
    fn batch_keeps_successes_and_tallies_skips() {
        let values = vec![
            json!({ "date": "1990-01-06", "rank": 1 }),
            json!("not a row"),
            json!({ "date": "1990-01-06", "rank": 500 }),
            json!({ "date": "1990-01-13", "rank": 2 }),
        ];
        let out = normalize_records(&values, &config());

        assert_eq!(out.entries.len(), 2);
        assert_eq!(out.stats.read, 4);
        assert_eq!(out.stats.kept, 2);
        assert_eq!(out.stats.count(SkipReason::NotAnObject), 1);
        assert_eq!(out.stats.count(SkipReason::RankOutOfRange), 1);
        assert_eq!(out.entries[1].rank, 2);
    }
}
