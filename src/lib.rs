pub mod config;
pub mod error;
pub mod location;
pub mod pipeline;
pub mod recording;
pub mod routes;
pub mod state;
pub mod types;

use axum::Router;

use crate::state::AppState;

/// All API routes, without transport layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::location::router())
        .merge(routes::workout::router())
        .merge(routes::summary::router())
        .with_state(state)
}
