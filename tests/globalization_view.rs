use std::sync::{Arc, Mutex};
use std::time::Duration;

use hitmap_lib::timeline::ManualScheduler;
use hitmap_lib::{ChartDataset, InitialPosition, TimelineController, TokioScheduler, ViewSettings};
use serde_json::json;

fn three_week_dataset() -> ChartDataset {
    let rows = vec![
        json!({ "date": "2010-01-02", "rank": 1, "track_id": "A", "country": "US" }),
        json!({ "date": "2010-01-02", "rank": 2, "track_id": "B", "country": ["GB", "US"] }),
        json!({ "date": "2010-01-09", "rank": 1, "track_id": "B", "country": ["GB", "US"] }),
        json!({ "date": "2010-01-16", "rank": 1, "track_id": "C", "origin": "ca" }),
        json!({ "date": "2010-01-16", "rank": 2, "track_id": "D" }),
    ];
    let settings = ViewSettings {
        top_n: 2,
        ..ViewSettings::globalization()
    };
    ChartDataset::build(&rows, &settings)
}

#[test]
fn worked_example_week_zero() {
    let dataset = three_week_dataset();
    assert_eq!(dataset.week_count(), 3);

    let shares = dataset.shares_at(0);
    assert!((shares.get("US") - 0.8333).abs() < 1e-4);
    assert!((shares.get("GB") - 0.1667).abs() < 1e-4);

    let metrics = dataset.metrics_at(0);
    assert!((metrics.non_domestic_share - 0.1667).abs() < 1e-4);
    assert!((metrics.entropy - 0.4506).abs() < 1e-4);
    assert_eq!(metrics.collaboration_rate_pct, 50.0);
}

#[test]
fn later_weeks_follow_the_same_rules() {
    let dataset = three_week_dataset();

    let week1 = dataset.metrics_at(1);
    assert!((week1.non_domestic_share - 0.5).abs() < 1e-12);
    assert!((week1.entropy - 2f64.ln()).abs() < 1e-12);
    assert_eq!(week1.collaboration_rate_pct, 100.0);

    // D has no origin: counted for collaborations, absent from shares
    let week2 = dataset.metrics_at(2);
    assert_eq!(dataset.shares_at(2).get("CA"), 1.0);
    assert_eq!(week2.non_domestic_share, 1.0);
    assert_eq!(week2.entropy, 0.0);
    assert_eq!(week2.collaboration_rate_pct, 0.0);
    assert_eq!(week2.cumulative_origins_so_far, 3);
}

#[test]
fn timeline_drives_snapshots_for_the_renderer() {
    let dataset = Arc::new(three_week_dataset());
    let scheduler = Arc::new(ManualScheduler::new());
    let timeline = TimelineController::new(
        dataset.week_count(),
        InitialPosition::Latest,
        scheduler.clone(),
        Duration::from_millis(100),
    );

    let dates = Arc::new(Mutex::new(Vec::new()));
    let sink = dates.clone();
    let source = dataset.clone();
    timeline.on_position(move |week| sink.lock().unwrap().push(source.snapshot(week).date));

    timeline.play();
    scheduler.fire_times(5);

    assert_eq!(
        *dates.lock().unwrap(),
        vec!["2010-01-02", "2010-01-09", "2010-01-16"]
    );
    assert!(!timeline.is_playing());
}

#[tokio::test(start_paused = true)]
async fn tokio_driven_playback_auto_pauses_on_the_last_week() {
    let timeline = TimelineController::new(
        4,
        InitialPosition::Start,
        Arc::new(TokioScheduler::current().unwrap()),
        Duration::from_millis(50),
    );

    timeline.play();
    tokio::time::sleep(Duration::from_millis(125)).await;
    assert_eq!(timeline.position(), 2);
    assert!(timeline.is_playing());

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(timeline.position(), 3);
    assert!(!timeline.is_playing());
}

#[tokio::test(start_paused = true)]
async fn play_through_finishes_on_a_loaded_dataset() {
    let dataset = three_week_dataset();
    hitmap_lib::play_through(&dataset).await.unwrap();
    hitmap_lib::play_through(&ChartDataset::empty(&ViewSettings::default()))
        .await
        .unwrap();
}
