use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::position::{PositionSample, Route};

/// Aggregates for the workout currently owned by a `TrackRecorder`.
#[derive(Debug, Clone, Default)]
pub struct WorkoutSession {
    pub route: Route,
    pub distance_km: f64,
    /// Wall-clock start in milliseconds since the Unix epoch.
    pub started_at_ms: Option<i64>,
    pub elapsed_seconds: u64,
    pub active: bool,
}

/// The finished workout as handed from the recording side to the summary side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// Kilometers, fixed to two decimal places.
    pub distance: String,
    /// Whole seconds.
    pub duration: u64,
    pub route_coordinates: Vec<PositionSample>,
}

/// Center and span (in degrees) used to frame a map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub distance_km: f64,
    pub distance: String,
    pub duration_seconds: u64,
    pub duration: String,
    /// Minutes and seconds per kilometer.
    pub pace: String,
    pub waypoints: usize,
    pub region: MapRegion,
    pub route: Vec<PositionSample>,
}

/// Readout shown while a workout is being recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStats {
    pub session_id: Option<Uuid>,
    pub tracking: bool,
    pub distance: String,
    pub elapsed_seconds: u64,
    pub elapsed: String,
    pub waypoints: usize,
    pub current_location: Option<PositionSample>,
    pub follow_region: Option<MapRegion>,
}

impl LiveStats {
    pub fn idle() -> Self {
        Self {
            session_id: None,
            tracking: false,
            distance: "0.00".to_string(),
            elapsed_seconds: 0,
            elapsed: "00:00".to_string(),
            waypoints: 0,
            current_location: None,
            follow_region: None,
        }
    }
}
