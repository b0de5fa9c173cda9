use std::time::Duration;

use pacetrack_rs::error::ProviderError;
use pacetrack_rs::location::{LocationProvider, PermissionStatus, RelayProvider, WatchOptions};
use pacetrack_rs::types::position::PositionSample;

const T0: i64 = 1_700_000_000_000;

#[test]
fn permission_starts_undetermined() {
    let provider = RelayProvider::new();
    assert_eq!(provider.request_permission(), PermissionStatus::Undetermined);

    provider.set_permission(PermissionStatus::Denied);
    assert!(!provider.request_permission().is_granted());

    provider.set_permission(PermissionStatus::Granted);
    assert!(provider.request_permission().is_granted());
}

#[test]
fn current_position_needs_a_fix() {
    let provider = RelayProvider::new();
    assert_eq!(provider.current_position(), Err(ProviderError::Unavailable));

    let fix = PositionSample::at(52.52, 13.405, T0);
    provider.push(fix);
    assert_eq!(provider.current_position(), Ok(fix));
}

#[tokio::test]
async fn subscription_is_released_on_drop() {
    let provider = RelayProvider::new();
    let subscription = provider.watch(WatchOptions::default()).expect("watch");
    assert_eq!(provider.active_subscriptions(), 1);

    drop(subscription);
    assert_eq!(provider.active_subscriptions(), 0);

    // Pushing with nobody watching is fine.
    provider.push(PositionSample::new(1.0, 1.0));
}

#[tokio::test]
async fn fixes_are_throttled_by_time_or_distance() {
    let provider = RelayProvider::new();
    let mut subscription = provider
        .watch(WatchOptions {
            distance_interval_m: 5.0,
            time_interval: Duration::from_millis(1000),
        })
        .expect("watch");

    let first = PositionSample::at(0.0, 0.0, T0);
    // ~1 m away, 200 ms later: dropped
    let jitter = PositionSample::at(0.0, 0.00001, T0 + 200);
    // ~1 m away, a second after the first: sent
    let later = PositionSample::at(0.0, 0.00001, T0 + 1_000);
    // ~11 m away, 100 ms later: sent
    let moved = PositionSample::at(0.0, 0.00011, T0 + 1_100);

    for sample in [first, jitter, later, moved] {
        provider.push(sample);
    }

    assert_eq!(subscription.next().await, Ok(first));
    assert_eq!(subscription.next().await, Ok(later));
    assert_eq!(subscription.next().await, Ok(moved));
    assert!(subscription.try_next().is_none());

    // The one-shot query still sees every fix.
    assert_eq!(provider.current_position(), Ok(moved));
}

#[tokio::test]
async fn failure_reaches_watchers_and_ends_stream() {
    let provider = RelayProvider::new();
    let mut subscription = provider.watch(WatchOptions::default()).expect("watch");

    provider.fail("gps chip offline");

    assert_eq!(
        subscription.next().await,
        Err(ProviderError::Device("gps chip offline".to_string()))
    );
    assert_eq!(subscription.next().await, Err(ProviderError::Closed));
    assert_eq!(provider.active_subscriptions(), 0);
}
