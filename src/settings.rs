use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::aggregation::AggregationConfig;
use crate::normalize::NormalizerConfig;
use crate::timeline::InitialPosition;

/// Per-view tuning for how the dataset is filtered, weighted and animated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSettings {
    /// Rows dated before this are dropped.
    pub start_date: NaiveDate,
    /// Highest rank accepted by the normalizer (100 for the Hot 100, 200 for extended charts).
    pub max_rank: u32,
    /// Entries ranked beyond this carry no share weight.
    pub top_n: u32,
    pub home_country: String,
    /// Drop rows whose artist/track identity cannot be formed.
    pub require_identity: bool,
    pub tick_interval_ms: u64,
    pub initial_position: InitialPosition,
    /// Tracks listed per year in the geographic view.
    pub year_top_n: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::globalization()
    }
}

impl ViewSettings {
    pub fn globalization() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap_or(NaiveDate::MIN),
            max_rank: 100,
            top_n: 100,
            home_country: "US".into(),
            require_identity: false,
            tick_interval_ms: 120,
            initial_position: InitialPosition::Latest,
            year_top_n: 50,
        }
    }

    pub fn geographic() -> Self {
        Self {
            max_rank: 200,
            require_identity: true,
            initial_position: InitialPosition::Start,
            ..Self::globalization()
        }
    }

    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig {
            start_date: self.start_date,
            max_rank: self.max_rank,
            require_identity: self.require_identity,
        }
    }

    pub fn aggregation_config(&self) -> AggregationConfig {
        AggregationConfig {
            top_n: self.top_n,
            home_country: self.home_country.trim().to_ascii_uppercase(),
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<ViewSettings>,
}

impl SettingsStore {
    /// Loads settings from `path`, falling back to defaults when the file is absent.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            ViewSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn view(&self) -> ViewSettings {
        self.read().clone()
    }

    pub fn update_view(&self, settings: ViewSettings) -> Result<()> {
        let mut guard = self.write();
        *guard = settings;
        self.persist(&guard)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: ViewSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid settings in {}", self.path.display()))?;
        *self.write() = data;
        Ok(())
    }

    fn persist(&self, data: &ViewSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, ViewSettings> {
        self.data.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewSettings> {
        self.data.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        assert_eq!(store.view(), ViewSettings::globalization());
    }

    #[test]
    fn partial_json_fills_remaining_fields_from_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "maxRank": 200, "homeCountry": "gb" }"#).unwrap();

        let view = SettingsStore::new(path).unwrap().view();
        assert_eq!(view.max_rank, 200);
        assert_eq!(view.top_n, 100);
        assert_eq!(view.aggregation_config().home_country, "GB");
    }

    #[test]
    fn update_persists_and_reload_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let store = SettingsStore::new(path.clone()).unwrap();

        store.update_view(ViewSettings::geographic()).unwrap();
        let reopened = SettingsStore::new(path).unwrap();
        reopened.reload().unwrap();
        assert_eq!(reopened.view(), ViewSettings::geographic());
        assert_eq!(reopened.view().initial_position, InitialPosition::Start);
    }
}
