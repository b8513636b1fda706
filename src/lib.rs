pub mod aggregation;
pub mod index;
pub mod loader;
pub mod models;
pub mod normalize;
pub mod rolling;
pub mod settings;
pub mod timeline;
mod utils;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{info, warn};

pub use index::{ChartDataset, WeekBucketStore, WeekIndex};
pub use settings::{SettingsStore, ViewSettings};
pub use timeline::{InitialPosition, TimelineController, TokioScheduler};

/// Entry point: `hitmap <dataset.ndjson> [settings.json]`.
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("hitmap starting up...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(err) = run_with_args(&args) {
        log::error!("hitmap stopped: {err:#}");
    }
}

fn run_with_args(args: &[String]) -> Result<()> {
    let Some(dataset_path) = args.first() else {
        warn!("usage: hitmap <dataset.ndjson> [settings.json]");
        return Ok(());
    };

    let settings = match args.get(1) {
        Some(path) => SettingsStore::new(PathBuf::from(path))?.view(),
        None => ViewSettings::default(),
    };

    let dataset = loader::load_dataset(Path::new(dataset_path), &settings);
    log_latest_week(&dataset);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(play_through(&dataset))
}

fn log_latest_week(dataset: &ChartDataset) {
    let Some(latest) = dataset.week_index().latest() else {
        warn!("no chart data loaded; timeline controls disabled");
        return;
    };

    let snapshot = dataset.snapshot(latest);
    let metrics = &snapshot.metrics;
    info!(
        "latest week {}: non-domestic {:.1}%, {} origins, entropy {:.3}, collaborations {:.1}%, {} origins seen overall",
        snapshot.date,
        metrics.non_domestic_share * 100.0,
        metrics.unique_origin_count,
        metrics.entropy,
        metrics.collaboration_rate_pct,
        metrics.cumulative_origins_so_far,
    );
    for (country, share) in snapshot.shares.top(5) {
        info!("  {country}: {:.1}%", share * 100.0);
    }

    log_overview(dataset);
}

fn log_overview(dataset: &ChartDataset) {
    let first = dataset.week_index().weeks().next();
    let years = dataset.rolling().years();
    if let (Some(first), Some(&last_year)) = (first, years.last()) {
        info!(
            "{} weeks from {} across {} chart years",
            dataset.week_count(),
            first.date,
            years.len()
        );
        if let Some(top) = dataset.top_tracks_in_year(last_year).first() {
            info!("top track of {last_year}: {} (peak #{})", top.name, top.peak_rank);
        }
    }

    let entropy = dataset.metrics().line(|m| m.entropy);
    if let Some((week, peak)) = entropy
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
    {
        info!(
            "most diverse week {} with entropy {:.3}",
            dataset.week_index().index_to_date(week).unwrap_or("-"),
            peak
        );
    }
}

/// Plays the timeline once from the configured start, logging every position
/// until playback pauses on the last week.
pub async fn play_through(dataset: &ChartDataset) -> Result<()> {
    if dataset.is_empty() {
        return Ok(());
    }

    let settings = dataset.settings();
    let timeline = TimelineController::new(
        dataset.week_count(),
        settings.initial_position,
        Arc::new(TokioScheduler::current()?),
        Duration::from_millis(settings.tick_interval_ms),
    );

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    timeline.on_position(move |position| {
        let _ = tx.send(position);
    });
    timeline.play();

    let last = dataset.week_count() - 1;
    while let Some(position) = rx.recv().await {
        let metrics = dataset.metrics_at(position);
        info!(
            "week {} ({}): non-domestic {:.1}%, entropy {:.3}",
            position,
            dataset.week_index().index_to_date(position).unwrap_or("-"),
            metrics.non_domestic_share * 100.0,
            metrics.entropy,
        );
        if position == last && !timeline.is_playing() {
            break;
        }
    }

    timeline.pause();
    Ok(())
}
