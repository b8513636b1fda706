pub mod geo;
pub mod origin_share;
pub mod series;

pub use geo::{country_genre_summary, genre_popularity, CountryGenreSummary};
pub use origin_share::{aggregate_week, rank_weight, AggregationConfig, WeekAggregate};
pub use series::MetricsSeries;
