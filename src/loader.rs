//! Reads the static dataset snapshot. A failed load is terminal for the session:
//! callers fall back to an empty dataset and disabled playback.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

use crate::index::ChartDataset;
use crate::settings::ViewSettings;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

pub fn load_ndjson(path: &Path) -> Result<Vec<Value>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read chart rows from {}", path.display()))?;
    let values = parse_ndjson(&contents)
        .with_context(|| format!("no usable chart rows in {}", path.display()))?;
    log_info!("read {} chart rows from {}", values.len(), path.display());
    Ok(values)
}

/// One JSON object per line. Blank lines are ignored; lines that are not JSON
/// objects are skipped. A non-empty input where nothing usable is found is an error.
pub fn parse_ndjson(contents: &str) -> Result<Vec<Value>> {
    let mut values = Vec::new();
    let mut bad_lines = 0usize;

    for line in contents.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match serde_json::from_str::<Value>(line) {
            Ok(value @ Value::Object(_)) => values.push(value),
            Ok(_) | Err(_) => bad_lines += 1,
        }
    }

    if values.is_empty() && bad_lines > 0 {
        bail!("none of {bad_lines} lines parsed as a JSON object");
    }
    if bad_lines > 0 {
        log_warn!("skipped {} malformed dataset lines", bad_lines);
    }
    Ok(values)
}

/// Loads and indexes the dataset, or yields the empty "no data" dataset on failure.
pub fn load_dataset(path: &Path, settings: &ViewSettings) -> ChartDataset {
    match load_ndjson(path) {
        Ok(values) => ChartDataset::build(&values, settings),
        Err(err) => {
            log_error!("dataset load failed: {err:#}");
            ChartDataset::empty(settings)
        }
    }
}
