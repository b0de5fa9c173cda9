use crate::error::TrackingError;
use crate::pipeline::distance::distance_between;
use crate::pipeline::summarize::{format_distance, format_duration};
use crate::types::position::PositionSample;
use crate::types::workout::{LiveStats, MapRegion, WorkoutPayload, WorkoutSession};

/// Span used to keep the map centered on the runner while recording.
pub const FOLLOW_SPAN_DEG: f64 = 0.005;

/// Single writer of a `WorkoutSession`.
///
/// Every mutation happens synchronously inside one of these methods; the
/// caller decides when samples and clock ticks arrive.
#[derive(Debug, Default)]
pub struct TrackRecorder {
    session: WorkoutSession,
}

impl TrackRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &WorkoutSession {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    /// Begins a fresh session. Starting twice without a stop is a caller
    /// error and leaves the running session untouched.
    pub fn start(&mut self, now_ms: i64) -> Result<(), TrackingError> {
        if self.session.active {
            return Err(TrackingError::AlreadyActive);
        }

        self.session = WorkoutSession {
            started_at_ms: Some(now_ms),
            active: true,
            ..WorkoutSession::default()
        };
        Ok(())
    }

    pub fn on_position_update(&mut self, sample: PositionSample) {
        if !self.session.active {
            tracing::debug!("Ignoring position update outside of an active session");
            return;
        }
        if let Some(prev) = self.session.route.last() {
            self.session.distance_km += distance_between(prev, &sample);
        }
        self.session.route.push(sample);
    }

    /// Recomputes elapsed whole seconds from the start timestamp.
    pub fn tick(&mut self, now_ms: i64) {
        if !self.session.active {
            return;
        }
        let Some(start) = self.session.started_at_ms else {
            return;
        };

        let elapsed = (now_ms - start).max(0) / 1000;
        self.session.elapsed_seconds = self.session.elapsed_seconds.max(elapsed as u64);
    }

    /// Freezes the session and returns its handoff payload. `None` when
    /// nothing was being recorded.
    pub fn stop(&mut self) -> Option<WorkoutPayload> {
        if !self.session.active {
            return None;
        }
        self.session.active = false;

        Some(WorkoutPayload {
            session_id: None,
            distance: format_distance(self.session.distance_km),
            duration: self.session.elapsed_seconds,
            route_coordinates: self.session.route.points().to_vec(),
        })
    }

    pub fn live_stats(&self) -> LiveStats {
        let current_location = self.session.route.last().copied();
        LiveStats {
            session_id: None,
            tracking: self.session.active,
            distance: format_distance(self.session.distance_km),
            elapsed_seconds: self.session.elapsed_seconds,
            elapsed: format_duration(self.session.elapsed_seconds),
            waypoints: self.session.route.len(),
            current_location,
            follow_region: current_location.as_ref().map(follow_region),
        }
    }
}

pub fn follow_region(sample: &PositionSample) -> MapRegion {
    MapRegion {
        latitude: sample.latitude,
        longitude: sample.longitude,
        latitude_delta: FOLLOW_SPAN_DEG,
        longitude_delta: FOLLOW_SPAN_DEG,
    }
}
