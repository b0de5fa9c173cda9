use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::config::Config;
use crate::error::TrackingError;
use crate::location::RelayProvider;
use crate::recording::Recording;
use crate::types::workout::{LiveStats, WorkoutPayload};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub provider: RelayProvider,
    recording: Arc<Mutex<Option<Recording>>>,
    handoff: Arc<RwLock<Option<WorkoutPayload>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            provider: RelayProvider::new(),
            recording: Arc::new(Mutex::new(None)),
            handoff: Arc::new(RwLock::new(None)),
        }
    }

    /// Starts recording. The previous workout's handoff is discarded once the
    /// new session is running.
    pub async fn start_workout(&self) -> Result<uuid::Uuid, TrackingError> {
        let mut slot = self.recording.lock().await;
        if slot.is_some() {
            return Err(TrackingError::AlreadyActive);
        }

        let recording = Recording::start(
            &self.provider,
            self.config.watch,
            self.config.tick_interval,
        )?;
        let id = recording.id();
        *slot = Some(recording);
        *self.handoff.write().await = None;

        Ok(id)
    }

    pub async fn live_stats(&self) -> Result<LiveStats, TrackingError> {
        match self.recording.lock().await.as_ref() {
            Some(recording) => recording.snapshot().await,
            None => Ok(LiveStats::idle()),
        }
    }

    /// Stops the active workout and keeps its payload for the summary.
    /// Returns `Ok(None)` when nothing was recording.
    pub async fn stop_workout(&self) -> Result<Option<WorkoutPayload>, TrackingError> {
        // Held until the handoff is written so a concurrent start waits for it.
        let mut slot = self.recording.lock().await;
        let Some(recording) = slot.take() else {
            tracing::debug!("Stop requested with no active workout");
            return Ok(None);
        };

        let payload = recording.stop().await?;
        *self.handoff.write().await = Some(payload.clone());
        drop(slot);
        Ok(Some(payload))
    }

    pub async fn is_recording(&self) -> bool {
        self.recording.lock().await.is_some()
    }

    pub async fn handoff(&self) -> Option<WorkoutPayload> {
        self.handoff.read().await.clone()
    }

    /// Stops whatever is still recording before the process exits.
    pub async fn shutdown(&self) {
        match self.stop_workout().await {
            Ok(Some(payload)) => tracing::info!(
                "Stopped workout {:?} during shutdown",
                payload.session_id
            ),
            Ok(None) => {}
            Err(err) => tracing::warn!("Workout ended with error during shutdown: {}", err),
        }
    }
}
