use pacetrack_rs::error::TrackingError;
use pacetrack_rs::pipeline::distance::haversine_distance;
use pacetrack_rs::pipeline::record::TrackRecorder;
use pacetrack_rs::pipeline::summarize::summarize_payload;
use pacetrack_rs::types::position::PositionSample;

const START_MS: i64 = 1_700_000_000_000;

fn started() -> TrackRecorder {
    let mut recorder = TrackRecorder::new();
    recorder.start(START_MS).expect("start");
    recorder
}

#[test]
fn single_point_adds_no_distance() {
    let mut recorder = started();
    recorder.on_position_update(PositionSample::new(52.52, 13.405));

    assert_eq!(recorder.session().distance_km, 0.0);
    assert_eq!(recorder.session().route.len(), 1);
}

#[test]
fn distance_accumulates_consecutive_segments() {
    let points = [
        PositionSample::new(52.5200, 13.4050),
        PositionSample::new(52.5205, 13.4060),
        PositionSample::new(52.5210, 13.4055),
        PositionSample::new(52.5220, 13.4070),
    ];
    let mut recorder = started();
    for point in points {
        recorder.on_position_update(point);
    }

    let expected: f64 = points
        .windows(2)
        .map(|w| haversine_distance(w[0].latitude, w[0].longitude, w[1].latitude, w[1].longitude))
        .sum();
    assert!((recorder.session().distance_km - expected).abs() < 1e-12);
    assert_eq!(recorder.session().route.points(), &points);
}

#[test]
fn duplicate_points_are_kept_with_zero_distance() {
    let mut recorder = started();
    let point = PositionSample::new(1.0, 1.0);
    recorder.on_position_update(point);
    recorder.on_position_update(point);

    assert_eq!(recorder.session().route.len(), 2);
    assert_eq!(recorder.session().distance_km, 0.0);
}

#[test]
fn elapsed_is_derived_from_start() {
    let mut recorder = started();
    recorder.tick(START_MS + 999);
    assert_eq!(recorder.session().elapsed_seconds, 0);

    recorder.tick(START_MS + 20_500);
    assert_eq!(recorder.session().elapsed_seconds, 20);

    // Late ticks catch up instead of counting ticks.
    recorder.tick(START_MS + 65_000);
    assert_eq!(recorder.session().elapsed_seconds, 65);
}

#[test]
fn start_twice_is_rejected_and_keeps_session() {
    let mut recorder = started();
    recorder.on_position_update(PositionSample::new(0.0, 0.0));

    assert_eq!(recorder.start(START_MS + 5_000), Err(TrackingError::AlreadyActive));
    assert_eq!(recorder.session().route.len(), 1);
    assert_eq!(recorder.session().started_at_ms, Some(START_MS));
}

#[test]
fn stop_freezes_values_and_second_stop_is_noop() {
    let mut recorder = started();
    recorder.on_position_update(PositionSample::new(0.0, 0.0));
    recorder.on_position_update(PositionSample::new(0.0, 0.01));
    recorder.tick(START_MS + 30_000);

    let payload = recorder.stop().expect("payload");
    assert_eq!(payload.duration, 30);
    assert_eq!(payload.distance, "1.11");
    assert_eq!(payload.route_coordinates.len(), 2);

    recorder.on_position_update(PositionSample::new(0.0, 0.02));
    recorder.tick(START_MS + 60_000);
    assert_eq!(recorder.session().route.len(), 2);
    assert_eq!(recorder.session().elapsed_seconds, 30);

    assert!(recorder.stop().is_none());
}

#[test]
fn restart_discards_previous_session() {
    let mut recorder = started();
    recorder.on_position_update(PositionSample::new(0.0, 0.0));
    recorder.on_position_update(PositionSample::new(0.0, 0.01));
    recorder.tick(START_MS + 10_000);
    recorder.stop();

    recorder.start(START_MS + 100_000).expect("restart");
    let session = recorder.session();
    assert!(session.active);
    assert!(session.route.is_empty());
    assert_eq!(session.distance_km, 0.0);
    assert_eq!(session.elapsed_seconds, 0);
}

#[test]
fn three_samples_ten_seconds_apart() {
    let mut recorder = started();
    let samples = [
        PositionSample::at(0.0, 0.0, START_MS),
        PositionSample::at(0.0, 0.001, START_MS + 10_000),
        PositionSample::at(0.0, 0.002, START_MS + 20_000),
    ];
    for sample in samples {
        recorder.tick(sample.timestamp.expect("timestamp"));
        recorder.on_position_update(sample);
    }

    let segment = haversine_distance(0.0, 0.0, 0.0, 0.001);
    assert!((recorder.session().distance_km - 2.0 * segment).abs() < 1e-12);
    assert_eq!(recorder.session().elapsed_seconds, 20);

    let payload = recorder.stop().expect("payload");
    // 0.2224 km rounds to 0.22; 20 s / 0.22 km = 90.9 s
    assert_eq!(payload.distance, "0.22");
    let summary = summarize_payload(&payload).expect("summary");
    assert_eq!(summary.pace, "01:30");
    assert_eq!(summary.duration, "00:20");
}

#[test]
fn live_stats_follow_the_last_fix() {
    let mut recorder = started();
    assert!(recorder.live_stats().current_location.is_none());

    recorder.on_position_update(PositionSample::new(52.52, 13.405));
    recorder.tick(START_MS + 61_000);
    let stats = recorder.live_stats();

    assert!(stats.tracking);
    assert_eq!(stats.elapsed, "01:01");
    assert_eq!(stats.waypoints, 1);
    let region = stats.follow_region.expect("region");
    assert_eq!(region.latitude, 52.52);
    assert_eq!(region.latitude_delta, 0.005);
}
