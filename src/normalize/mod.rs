pub mod config;
pub mod origins;
pub mod record;

pub use config::NormalizerConfig;
pub use record::{normalize_record, normalize_records, parse_date, Normalized, SkipReason, SkipStats};
