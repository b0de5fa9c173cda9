//! Drives a `TrackRecorder` from a live location subscription and a 1-second
//! clock tick.
//!
//! The recorder lives inside one spawned task, which is the only code that
//! ever mutates the session. The subscription and the ticker are owned by that
//! task as well, so both are released whenever the task ends: on `stop`, on a
//! provider failure, or when the `Recording` handle is dropped.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use uuid::Uuid;

use crate::error::{ProviderError, TrackingError};
use crate::location::{LocationProvider, LocationSubscription, WatchOptions};
use crate::pipeline::record::TrackRecorder;
use crate::types::position::PositionSample;
use crate::types::workout::{LiveStats, WorkoutPayload};

enum Command {
    Snapshot(oneshot::Sender<Result<LiveStats, TrackingError>>),
    Stop(oneshot::Sender<Result<WorkoutPayload, TrackingError>>),
}

enum Event {
    Sample(Result<PositionSample, ProviderError>),
    Tick,
    Command(Option<Command>),
}

pub struct Recording {
    id: Uuid,
    commands: mpsc::Sender<Command>,
    task: Option<JoinHandle<()>>,
}

impl Recording {
    /// Checks permission, subscribes to the provider and starts the driver.
    /// Nothing is left running when this returns an error.
    pub fn start<P>(
        provider: &P,
        options: WatchOptions,
        tick_interval: Duration,
    ) -> Result<Self, TrackingError>
    where
        P: LocationProvider + ?Sized,
    {
        if !provider.request_permission().is_granted() {
            tracing::warn!("Refusing to start workout without location permission");
            return Err(TrackingError::PermissionDenied);
        }

        let subscription = provider.watch(options)?;

        let mut recorder = TrackRecorder::new();
        let started_at_ms = Utc::now().timestamp_millis();
        recorder.start(started_at_ms)?;

        let id = Uuid::new_v4();
        let (commands, inbox) = mpsc::channel(8);
        let driver = Driver {
            id,
            recorder,
            started_at_ms,
            clock_origin: Instant::now(),
            failure: None,
        };
        let task = tokio::spawn(driver.run(subscription, inbox, tick_interval));

        tracing::info!("Workout {} started", id);

        Ok(Self {
            id,
            commands,
            task: Some(task),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn snapshot(&self) -> Result<LiveStats, TrackingError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Snapshot(reply)).await?;
        response.await.map_err(|_| TrackingError::RecorderGone)?
    }

    /// Ends the workout and hands back its final values.
    pub async fn stop(mut self) -> Result<WorkoutPayload, TrackingError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::Stop(reply)).await?;
        let payload = response.await.map_err(|_| TrackingError::RecorderGone)?;

        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        payload
    }

    async fn send(&self, command: Command) -> Result<(), TrackingError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| TrackingError::RecorderGone)
    }
}

impl Drop for Recording {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::info!("Workout {} torn down without stop", self.id);
            task.abort();
        }
    }
}

struct Driver {
    id: Uuid,
    recorder: TrackRecorder,
    started_at_ms: i64,
    clock_origin: Instant,
    failure: Option<ProviderError>,
}

impl Driver {
    fn now_ms(&self) -> i64 {
        self.started_at_ms + self.clock_origin.elapsed().as_millis() as i64
    }

    async fn run(
        mut self,
        subscription: LocationSubscription,
        mut inbox: mpsc::Receiver<Command>,
        tick_interval: Duration,
    ) {
        let mut resources = Some(Resources::new(subscription, tick_interval));

        loop {
            let event = match resources.as_mut() {
                Some(live) => tokio::select! {
                    biased;
                    sample = live.subscription.next() => Event::Sample(sample),
                    _ = live.ticker.tick() => Event::Tick,
                    command = inbox.recv() => Event::Command(command),
                },
                None => Event::Command(inbox.recv().await),
            };

            match event {
                Event::Sample(Ok(sample)) => self.recorder.on_position_update(sample),
                Event::Sample(Err(err)) => {
                    self.fail(err);
                    resources = None;
                }
                Event::Tick => {
                    let now = self.now_ms();
                    self.recorder.tick(now);
                }
                Event::Command(Some(Command::Snapshot(reply))) => {
                    let _ = reply.send(self.snapshot());
                }
                Event::Command(Some(Command::Stop(reply))) => {
                    if let Some(mut live) = resources.take() {
                        self.drain(&mut live.subscription);
                    }
                    let _ = reply.send(self.finish());
                    break;
                }
                Event::Command(None) => break,
            }
        }

        tracing::debug!("Workout {} driver exited", self.id);
    }

    fn drain(&mut self, subscription: &mut LocationSubscription) {
        while let Some(sample) = subscription.try_next() {
            match sample {
                Ok(sample) => self.recorder.on_position_update(sample),
                Err(err) => {
                    self.fail(err);
                    break;
                }
            }
        }
    }

    fn fail(&mut self, err: ProviderError) {
        tracing::error!("Workout {} lost its location feed: {}", self.id, err);
        self.recorder.stop();
        self.failure = Some(err);
    }

    fn snapshot(&self) -> Result<LiveStats, TrackingError> {
        if let Some(err) = &self.failure {
            return Err(err.clone().into());
        }
        let mut stats = self.recorder.live_stats();
        stats.session_id = Some(self.id);
        Ok(stats)
    }

    fn finish(&mut self) -> Result<WorkoutPayload, TrackingError> {
        if let Some(err) = self.failure.take() {
            return Err(err.into());
        }

        let mut payload = self
            .recorder
            .stop()
            .ok_or(TrackingError::RecorderGone)?;
        payload.session_id = Some(self.id);

        tracing::info!(
            "Workout {} stopped ({} points, {} km, {} s)",
            self.id,
            payload.route_coordinates.len(),
            payload.distance,
            payload.duration
        );
        Ok(payload)
    }
}

/// Everything that keeps the device busy while a workout is live.
struct Resources {
    subscription: LocationSubscription,
    ticker: time::Interval,
}

impl Resources {
    fn new(subscription: LocationSubscription, tick_interval: Duration) -> Self {
        let mut ticker = time::interval(tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            subscription,
            ticker,
        }
    }
}
