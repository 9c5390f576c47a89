//! Direct transcription endpoint (POST /transcribe).
//!
//! Thin wrapper over the transcription adapter. Always answers 200 once
//! the payload validates — provider failures surface as a fallback
//! transcript, never as an HTTP error.

use axum::{extract::State, response::Json, routing::post, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::transcription::Language;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranscribeRequest {
    #[serde(default)]
    audio_data: String,
    language: Option<String>,
}

async fn transcribe(
    State(state): State<AppState>,
    Json(req): Json<TranscribeRequest>,
) -> ApiResult<Json<Value>> {
    if req.audio_data.trim().is_empty() {
        return Err(ApiError::missing_field("audioData"));
    }

    let audio = BASE64
        .decode(req.audio_data.trim())
        .map_err(|_| ApiError::bad_request("audioData is not valid base64"))?;
    if audio.is_empty() {
        return Err(ApiError::bad_request(
            "audioData decoded to an empty payload",
        ));
    }

    let language = req
        .language
        .as_deref()
        .map(Language::parse_lossy)
        .unwrap_or(state.default_language);

    let outcome = state.transcriber.transcribe(&audio, language).await;

    let message = if outcome.is_fallback() {
        "Transcription provider unavailable, using fallback transcript"
    } else {
        "Transcription completed successfully"
    };

    Ok(Json(json!({
        "text": outcome.text,
        "confidence": outcome.confidence,
        "processing_time": outcome.processing_time_ms,
        "source": outcome.provider,
        "language": language.as_str(),
        "message": message,
    })))
}
