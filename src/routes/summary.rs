use axum::{routing::post, Json, Router};

use crate::error::AppError;
use crate::pipeline::summarize::summarize_payload;
use crate::state::AppState;
use crate::types::workout::{WorkoutPayload, WorkoutSummary};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/summary", post(summarize))
}

async fn summarize(Json(payload): Json<WorkoutPayload>) -> Result<Json<WorkoutSummary>, AppError> {
    let summary = summarize_payload(&payload)?;

    tracing::info!(
        "Summarized workout: {} km in {} ({} min/km, {} waypoints)",
        summary.distance,
        summary.duration,
        summary.pace,
        summary.waypoints
    );

    Ok(Json(summary))
}
