//! Meeting processing pipeline.
//!
//! One linear run per request:
//! receive audio → create meeting → add participants → log recording →
//! transcribe → save transcript → summarize → save summary → notify →
//! complete.
//!
//! Failure policy: the two provider adapters cannot fail (they fall back
//! internally), so only persistence errors abort a run. Notification is
//! the designed exception — its failures are logged and the run still
//! completes. Aborted runs do not roll back rows already written; an
//! orphaned meeting without a summary is possible and accepted.

use anyhow::Error;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error as ThisError;
use tracing::{info, warn};

use crate::db::{
    Database, NewMeeting, NewParticipant, NewRecording, NewSummary, NewTranscript, Participant,
};
use crate::notify::Dispatcher;
use crate::summarizer::Summarizer;
use crate::transcription::{Language, Transcriber};

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    MeetingCreated,
    ParticipantsAdded,
    RecordingLogged,
    Transcribed,
    TranscriptSaved,
    Summarized,
    SummarySaved,
    Notified,
    Complete,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::MeetingCreated => "meeting_created",
            Self::ParticipantsAdded => "participants_added",
            Self::RecordingLogged => "recording_logged",
            Self::Transcribed => "transcribed",
            Self::TranscriptSaved => "transcript_saved",
            Self::Summarized => "summarized",
            Self::SummarySaved => "summary_saved",
            Self::Notified => "notified",
            Self::Complete => "complete",
        }
    }
}

#[derive(Debug, ThisError)]
pub enum PipelineError {
    /// Rejected before the first write. No side effects.
    #[error("{0}")]
    InvalidRequest(String),

    /// A persistence write failed mid-run. Rows written by earlier stages
    /// remain.
    #[error("pipeline aborted at {stage}: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Error,
    },
}

fn at(stage: Stage) -> impl FnOnce(Error) -> PipelineError {
    move |source| PipelineError::Stage {
        stage: stage.as_str(),
        source,
    }
}

/// Participant as submitted by the capture client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInput {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Meeting metadata scraped by the capture client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub participants: Vec<ParticipantInput>,
    #[serde(default)]
    pub meeting_url: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

/// Full pipeline request: meeting metadata plus the captured audio.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    #[serde(default)]
    pub meeting_data: MeetingInput,
    #[serde(default)]
    pub audio_data: String,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
    pub decisions: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptPayload {
    pub content: String,
    pub confidence: Option<f64>,
    pub language: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationUrls {
    pub dashboard: String,
    pub transcript: String,
}

/// Terminal success payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub meeting_id: String,
    pub processing_time_ms: u64,
    pub summary: SummaryPayload,
    pub transcript: TranscriptPayload,
    pub participants: Vec<Participant>,
    pub urls: NavigationUrls,
}

pub struct Pipeline {
    db: Database,
    transcriber: Arc<Transcriber>,
    summarizer: Arc<Summarizer>,
    dispatcher: Option<Arc<Dispatcher>>,
    language: Language,
    dashboard_base_url: String,
}

impl Pipeline {
    pub fn new(
        db: Database,
        transcriber: Arc<Transcriber>,
        summarizer: Arc<Summarizer>,
        dispatcher: Option<Arc<Dispatcher>>,
        language: Language,
        dashboard_base_url: String,
    ) -> Self {
        Self {
            db,
            transcriber,
            summarizer,
            dispatcher,
            language,
            dashboard_base_url: dashboard_base_url
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Run the full pipeline for one recording.
    ///
    /// Identical requests are NOT deduplicated: a caller retry creates a
    /// second meeting row. There is no idempotency key on inbound
    /// requests.
    pub async fn process(&self, request: ProcessRequest) -> Result<PipelineReport, PipelineError> {
        let started = Instant::now();

        // Stage: Received — reject bad requests before any write.
        let title = request.meeting_data.title.trim().to_string();
        if title.is_empty() {
            return Err(PipelineError::InvalidRequest(
                "Missing required data: meetingData.title".to_string(),
            ));
        }
        if request.audio_data.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "Missing required data: audioData".to_string(),
            ));
        }
        let audio = BASE64
            .decode(request.audio_data.trim())
            .map_err(|_| PipelineError::InvalidRequest("audioData is not valid base64".to_string()))?;
        if audio.is_empty() {
            return Err(PipelineError::InvalidRequest(
                "audioData decoded to an empty payload".to_string(),
            ));
        }

        info!("Starting meeting processing pipeline for \"{}\"", title);

        let start_time = request
            .start_time
            .clone()
            .or_else(|| request.meeting_data.start_time.clone())
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

        // Stage: MeetingCreated
        let meeting = self
            .db
            .create_meeting(NewMeeting {
                user_id: None,
                title,
                description: Some("Meeting processed from browser extension".to_string()),
                start_time: start_time.clone(),
                end_time: request.end_time.clone(),
                duration_seconds: request.duration,
                meeting_url: request.meeting_data.meeting_url.clone(),
                platform: request
                    .meeting_data
                    .platform
                    .clone()
                    .unwrap_or_else(|| "google_meet".to_string()),
            })
            .await
            .map_err(at(Stage::MeetingCreated))?;

        // Stage: ParticipantsAdded
        let new_participants: Vec<NewParticipant> = request
            .meeting_data
            .participants
            .iter()
            .map(|p| NewParticipant {
                name: p.name.clone(),
                email: p.email.clone(),
                role: p.role.clone(),
                join_time: Some(start_time.clone()),
                leave_time: request.end_time.clone(),
                duration_seconds: request.duration,
            })
            .collect();

        let participants = self
            .db
            .add_participants(&meeting.id, new_participants)
            .await
            .map_err(at(Stage::ParticipantsAdded))?;

        // Stage: RecordingLogged. The decoded byte count is the size
        // estimate; nothing is written to disk here.
        let recording = self
            .db
            .create_recording(
                &meeting.id,
                NewRecording {
                    file_path: format!("recordings/{}.webm", meeting.id),
                    size_bytes: Some(audio.len() as i64),
                    duration_seconds: request.duration,
                    format: "webm".to_string(),
                    quality_score: Some(0.8),
                },
            )
            .await
            .map_err(at(Stage::RecordingLogged))?;

        // Stage: Transcribed — the adapter cannot fail.
        let outcome = self.transcriber.transcribe(&audio, self.language).await;

        // Stage: TranscriptSaved
        let transcript = self
            .db
            .create_transcript(
                &meeting.id,
                NewTranscript {
                    recording_id: Some(recording.id.clone()),
                    content: outcome.text.clone(),
                    language: self.language.as_str().to_string(),
                    confidence_score: Some(outcome.confidence),
                    processing_time_ms: Some(outcome.processing_time_ms as i64),
                    provider: outcome.provider.clone(),
                },
            )
            .await
            .map_err(at(Stage::TranscriptSaved))?;

        // Stage: Summarized — the adapter cannot fail.
        let names: Vec<String> = participants.iter().map(|p| p.name.clone()).collect();
        let summarized = self
            .summarizer
            .summarize(&transcript.content, &meeting.title, &names)
            .await;

        // Stage: SummarySaved
        let summary = self
            .db
            .create_summary(
                &meeting.id,
                NewSummary {
                    transcript_id: Some(transcript.id.clone()),
                    summary_text: summarized.summary.summary.clone(),
                    key_points: summarized.summary.key_points.clone(),
                    action_items: summarized.summary.action_items.clone(),
                    decisions: summarized.summary.decisions.clone(),
                    next_steps: summarized.summary.next_steps.clone(),
                    provider: summarized.provider.clone(),
                    processing_time_ms: Some(started.elapsed().as_millis() as i64),
                },
            )
            .await
            .map_err(at(Stage::SummarySaved))?;

        // Stage: Notified — best effort, never fatal.
        if let Some(dispatcher) = &self.dispatcher {
            let report = dispatcher.notify(&meeting, &summary, &participants).await;
            if report.failed > 0 {
                warn!(
                    "Meeting {}: {} notification(s) failed, continuing",
                    meeting.id, report.failed
                );
            }
        }

        let processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            "Meeting processing completed: id={} participants={} transcript_chars={} elapsed={}ms",
            meeting.id,
            participants.len(),
            transcript.content.len(),
            processing_time_ms
        );

        Ok(PipelineReport {
            meeting_id: meeting.id.clone(),
            processing_time_ms,
            summary: SummaryPayload {
                title: meeting.title.clone(),
                summary: summary.summary_text.clone(),
                key_points: summary.key_points.clone(),
                action_items: summary.action_items.clone(),
                decisions: summary.decisions.clone(),
                next_steps: summary.next_steps.clone(),
            },
            transcript: TranscriptPayload {
                content: transcript.content,
                confidence: transcript.confidence_score,
                language: transcript.language,
            },
            participants,
            urls: NavigationUrls {
                dashboard: format!("{}/meeting/{}", self.dashboard_base_url, meeting.id),
                transcript: format!("{}/transcript/{}", self.dashboard_base_url, meeting.id),
            },
        })
    }
}
