use crate::error::SummaryError;
use crate::pipeline::distance::route_distance;
use crate::types::position::PositionSample;
use crate::types::workout::{MapRegion, WorkoutPayload, WorkoutSummary};

/// Smallest span, in degrees, a summary region may have.
pub const MIN_SPAN_DEG: f64 = 0.01;
const REGION_PADDING: f64 = 1.2;

pub fn summarize(
    distance_km: f64,
    duration_seconds: u64,
    route: &[PositionSample],
) -> WorkoutSummary {
    WorkoutSummary {
        distance_km,
        distance: format_distance(distance_km),
        duration_seconds,
        duration: format_duration(duration_seconds),
        pace: format_pace(distance_km, duration_seconds),
        waypoints: route.len(),
        region: bounding_region(route),
        route: route.to_vec(),
    }
}

/// Builds the summary from a handoff payload. Pace is derived from the
/// two-decimal distance carried in the payload.
pub fn summarize_payload(payload: &WorkoutPayload) -> Result<WorkoutSummary, SummaryError> {
    let distance_km: f64 = payload
        .distance
        .trim()
        .parse()
        .map_err(|_| SummaryError::InvalidDistance(payload.distance.clone()))?;

    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(SummaryError::InvalidDistance(payload.distance.clone()));
    }

    let route_km = route_distance(&payload.route_coordinates);
    if format_distance(route_km) != format_distance(distance_km) {
        tracing::warn!(
            "Handed-off distance {} km does not match route length {:.2} km",
            payload.distance,
            route_km
        );
    }

    let mut summary = summarize(distance_km, payload.duration, &payload.route_coordinates);
    summary.distance = payload.distance.clone();
    Ok(summary)
}

/// Average pace as `MM:SS` per kilometer; `"00:00"` for a zero distance.
pub fn format_pace(distance_km: f64, duration_seconds: u64) -> String {
    if distance_km == 0.0 {
        return "00:00".to_string();
    }

    let pace_seconds = duration_seconds as f64 / distance_km;
    let minutes = (pace_seconds / 60.0).floor() as u64;
    let seconds = (pace_seconds % 60.0).floor() as u64;

    format!("{:02}:{:02}", minutes, seconds)
}

/// `MM:SS` with unbounded minutes, so an hour renders as `60:00`.
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn format_distance(distance_km: f64) -> String {
    format!("{:.2}", distance_km)
}

pub fn bounding_region(route: &[PositionSample]) -> MapRegion {
    let Some(first) = route.first() else {
        return MapRegion {
            latitude: 0.0,
            longitude: 0.0,
            latitude_delta: MIN_SPAN_DEG,
            longitude_delta: MIN_SPAN_DEG,
        };
    };

    let mut min_lat = first.latitude;
    let mut max_lat = first.latitude;
    let mut min_lng = first.longitude;
    let mut max_lng = first.longitude;

    for point in route {
        min_lat = min_lat.min(point.latitude);
        max_lat = max_lat.max(point.latitude);
        min_lng = min_lng.min(point.longitude);
        max_lng = max_lng.max(point.longitude);
    }

    MapRegion {
        latitude: (min_lat + max_lat) / 2.0,
        longitude: (min_lng + max_lng) / 2.0,
        latitude_delta: ((max_lat - min_lat) * REGION_PADDING).max(MIN_SPAN_DEG),
        longitude_delta: ((max_lng - min_lng) * REGION_PADDING).max(MIN_SPAN_DEG),
    }
}
