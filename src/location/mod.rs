mod relay;

pub use relay::RelayProvider;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::error::ProviderError;
use crate::types::position::PositionSample;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// How often a subscription wants to hear about movement. A fix is delivered
/// once either threshold is reached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub distance_interval_m: f64,
    pub time_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            distance_interval_m: 5.0,
            time_interval: Duration::from_millis(1000),
        }
    }
}

pub trait LocationProvider: Send + Sync {
    fn request_permission(&self) -> PermissionStatus;

    fn current_position(&self) -> Result<PositionSample, ProviderError>;

    fn watch(&self, options: WatchOptions) -> Result<LocationSubscription, ProviderError>;
}

type Release = Box<dyn FnOnce() + Send>;

/// Stream of fixes from a provider. The provider is told to stop sending as
/// soon as this value is dropped.
pub struct LocationSubscription {
    receiver: mpsc::UnboundedReceiver<Result<PositionSample, ProviderError>>,
    release: Option<Release>,
}

impl LocationSubscription {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<Result<PositionSample, ProviderError>>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Next fix, or `ProviderError::Closed` once the provider hung up.
    pub async fn next(&mut self) -> Result<PositionSample, ProviderError> {
        self.receiver.recv().await.unwrap_or(Err(ProviderError::Closed))
    }

    /// A fix that has already been delivered, without waiting.
    pub fn try_next(&mut self) -> Option<Result<PositionSample, ProviderError>> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for LocationSubscription {
    fn drop(&mut self) {
        self.receiver.close();
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for LocationSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationSubscription")
            .field("released", &self.release.is_none())
            .finish()
    }
}
