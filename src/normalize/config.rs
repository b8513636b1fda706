use chrono::NaiveDate;

/// Validation thresholds applied to every raw chart row.
#[derive(Debug, Clone)]
pub struct NormalizerConfig {
    /// Rows dated before this boundary are dropped.
    pub start_date: NaiveDate,

    /// Accepted ranks are `1..=max_rank`.
    pub max_rank: u32,

    /// Geographic view: skip rows without a track id or an artist + title pair.
    pub require_identity: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap_or(NaiveDate::MIN),
            max_rank: 100,
            require_identity: false,
        }
    }
}
