pub mod entry;
pub mod metrics;
pub mod raw;

pub use entry::{format_date, CalendarWeek, ChartEntry, CountryCode, UNKNOWN_GENRE};
pub use metrics::{ShareDistribution, WeekSnapshot, WeeklyMetrics};
pub use raw::RawRecord;
