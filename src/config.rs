use std::time::Duration;

use crate::location::WatchOptions;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub watch: WatchOptions,
    pub tick_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let distance_interval_m = std::env::var("LOCATION_DISTANCE_INTERVAL_M")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5.0);

        let time_interval_ms = std::env::var("LOCATION_TIME_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1000);

        let tick_ms = std::env::var("TIMER_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|ms: &u64| *ms > 0)
            .unwrap_or(1000);

        Self {
            port,
            watch: WatchOptions {
                distance_interval_m,
                time_interval: Duration::from_millis(time_interval_ms),
            },
            tick_interval: Duration::from_millis(tick_ms),
        }
    }
}
