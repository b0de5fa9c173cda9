use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

use super::{LocationProvider, LocationSubscription, PermissionStatus, WatchOptions};
use crate::error::ProviderError;
use crate::pipeline::distance::distance_between;
use crate::types::position::PositionSample;

/// Provider fed from outside: the device posts its permission state and fixes,
/// and this fans them out to whoever is watching.
#[derive(Clone, Default)]
pub struct RelayProvider {
    inner: Arc<Mutex<RelayInner>>,
}

#[derive(Default)]
struct RelayInner {
    permission: Option<PermissionStatus>,
    last_fix: Option<PositionSample>,
    next_id: u64,
    watchers: HashMap<u64, Watcher>,
}

struct Watcher {
    options: WatchOptions,
    last_sent: Option<PositionSample>,
    sender: mpsc::UnboundedSender<Result<PositionSample, ProviderError>>,
}

impl Watcher {
    fn wants(&self, sample: &PositionSample) -> bool {
        let Some(last) = self.last_sent.as_ref() else {
            return true;
        };

        let moved_m = distance_between(last, sample) * 1000.0;
        if moved_m >= self.options.distance_interval_m {
            return true;
        }

        match (last.timestamp, sample.timestamp) {
            (Some(prev), Some(curr)) => {
                let waited_ms = curr.saturating_sub(prev);
                waited_ms >= self.options.time_interval.as_millis() as i64
            }
            _ => true,
        }
    }
}

impl RelayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RelayInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_permission(&self, status: PermissionStatus) {
        tracing::info!("Location permission reported as {:?}", status);
        self.lock().permission = Some(status);
    }

    /// Records a fix from the device and forwards it to interested watchers.
    pub fn push(&self, sample: PositionSample) {
        let mut inner = self.lock();
        inner.last_fix = Some(sample);

        inner.watchers.retain(|id, watcher| {
            if !watcher.wants(&sample) {
                return true;
            }
            watcher.last_sent = Some(sample);
            let delivered = watcher.sender.send(Ok(sample)).is_ok();
            if !delivered {
                tracing::debug!("Dropping watcher {} with closed receiver", id);
            }
            delivered
        });
    }

    /// Reports a device failure to every watcher and ends their streams.
    pub fn fail(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("Location provider failure: {}", message);

        let mut inner = self.lock();
        for (_, watcher) in inner.watchers.drain() {
            let _ = watcher
                .sender
                .send(Err(ProviderError::Device(message.clone())));
        }
    }

    pub fn active_subscriptions(&self) -> usize {
        self.lock().watchers.len()
    }
}

impl LocationProvider for RelayProvider {
    fn request_permission(&self) -> PermissionStatus {
        self.lock()
            .permission
            .unwrap_or(PermissionStatus::Undetermined)
    }

    fn current_position(&self) -> Result<PositionSample, ProviderError> {
        self.lock().last_fix.ok_or(ProviderError::Unavailable)
    }

    fn watch(&self, options: WatchOptions) -> Result<LocationSubscription, ProviderError> {
        let (sender, receiver) = mpsc::unbounded_channel();

        let id = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.watchers.insert(
                id,
                Watcher {
                    options,
                    last_sent: None,
                    sender,
                },
            );
            id
        };
        tracing::debug!("Location watcher {} registered", id);

        let inner = Arc::downgrade(&self.inner);
        Ok(LocationSubscription::new(receiver, move || {
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                if inner.watchers.remove(&id).is_some() {
                    tracing::debug!("Location watcher {} released", id);
                }
            }
        }))
    }
}
