pub mod bucket_store;
pub mod dataset;
pub mod week_index;

pub use bucket_store::WeekBucketStore;
pub use dataset::ChartDataset;
pub use week_index::WeekIndex;
