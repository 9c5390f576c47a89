//! Pipeline entry point (POST /process-recording).

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::time::Instant;
use tracing::error;

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::pipeline::{PipelineError, ProcessRequest};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/process-recording", post(process_recording))
        .with_state(state)
}

async fn process_recording(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Response {
    let started = Instant::now();

    match state.pipeline.process(request).await {
        Ok(report) => Json(json!({
            "success": true,
            "meetingId": report.meeting_id,
            "processingTime": report.processing_time_ms,
            "summary": report.summary,
            "transcript": report.transcript,
            "participants": report.participants,
            "urls": report.urls,
        }))
        .into_response(),

        Err(PipelineError::InvalidRequest(message)) => {
            ApiError::bad_request(message).into_response()
        }

        Err(e @ PipelineError::Stage { .. }) => {
            error!("Meeting processing failed: {}", e);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to process meeting recording",
                    "details": e.to_string(),
                    "processingTime": started.elapsed().as_millis() as u64,
                })),
            )
                .into_response()
        }
    }
}
