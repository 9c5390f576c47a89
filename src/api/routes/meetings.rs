//! Meeting CRUD endpoints.
//!
//! Provides HTTP endpoints for:
//! - Creating a meeting (POST /meetings)
//! - Listing meetings (GET /meetings?userId=&limit=)
//! - Partially updating a meeting (PUT /meetings?id=)
//! - Archiving or deleting meetings (DELETE /meetings?id=&action=)
//! - Fetching the full aggregate (GET /meeting/:id)

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::db::{MeetingPatch, MeetingStatus, NewMeeting, NewParticipant};
use crate::pipeline::ParticipantInput;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/meetings",
            get(list_meetings)
                .post(create_meeting)
                .put(update_meeting)
                .delete(delete_meetings),
        )
        .route("/meeting/:id", get(get_meeting))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMeetingRequest {
    #[serde(default)]
    title: String,
    description: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    duration: Option<i64>,
    meeting_url: Option<String>,
    platform: Option<String>,
    user_id: Option<String>,
    #[serde(default)]
    participants: Vec<ParticipantInput>,
}

async fn create_meeting(
    State(state): State<AppState>,
    Json(req): Json<CreateMeetingRequest>,
) -> ApiResult<Json<Value>> {
    if req.title.trim().is_empty() {
        return Err(ApiError::missing_field("title"));
    }

    let start_time = req
        .start_time
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());

    let meeting = state
        .db
        .create_meeting(NewMeeting {
            user_id: req.user_id,
            title: req.title.trim().to_string(),
            description: req.description,
            start_time: start_time.clone(),
            end_time: req.end_time.clone(),
            duration_seconds: req.duration,
            meeting_url: req.meeting_url,
            platform: req.platform.unwrap_or_else(|| "web".to_string()),
        })
        .await?;

    let participants = if req.participants.is_empty() {
        Vec::new()
    } else {
        state
            .db
            .add_participants(
                &meeting.id,
                req.participants
                    .into_iter()
                    .map(|p| NewParticipant {
                        name: p.name,
                        email: p.email,
                        role: p.role,
                        join_time: Some(start_time.clone()),
                        leave_time: req.end_time.clone(),
                        duration_seconds: req.duration,
                    })
                    .collect(),
            )
            .await?
    };

    info!(
        "Meeting created: id={} title=\"{}\" participants={}",
        meeting.id,
        meeting.title,
        participants.len()
    );

    Ok(Json(json!({
        "meeting": meeting,
        "participants": participants,
        "message": "Meeting created successfully",
    })))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    limit: Option<usize>,
}

async fn list_meetings(
    Query(query): Query<ListQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(50);
    let meetings = state
        .db
        .list_meetings(query.user_id.as_deref(), limit)
        .await?;

    Ok(Json(json!({
        "meetings": meetings,
        "count": meetings.len(),
        "message": "Meetings retrieved successfully",
    })))
}

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<String>,
    action: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMeetingRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    duration: Option<i64>,
    meeting_url: Option<String>,
    platform: Option<String>,
}

async fn update_meeting(
    Query(query): Query<IdQuery>,
    State(state): State<AppState>,
    Json(req): Json<UpdateMeetingRequest>,
) -> ApiResult<Json<Value>> {
    let id = query.id.ok_or_else(|| ApiError::missing_field("id"))?;

    let current = state
        .db
        .meeting(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    let status = match &req.status {
        Some(raw) => {
            let new_status = MeetingStatus::parse(raw)
                .map_err(|_| ApiError::invalid_status(format!("Unknown status: {raw}")))?;
            let current_status = MeetingStatus::parse(&current.status)?;
            if !current_status.transition_allowed(new_status) {
                return Err(ApiError::invalid_status(format!(
                    "Cannot transition meeting from {} to {}",
                    current.status, raw
                )));
            }
            Some(new_status)
        }
        None => None,
    };

    let patch = MeetingPatch {
        title: req.title,
        description: req.description,
        status,
        start_time: req.start_time,
        end_time: req.end_time,
        duration_seconds: req.duration,
        meeting_url: req.meeting_url,
        platform: req.platform,
    };

    let meeting = state
        .db
        .update_meeting(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    Ok(Json(json!({
        "meeting": meeting,
        "message": "Meeting updated successfully",
    })))
}

async fn delete_meetings(
    Query(query): Query<IdQuery>,
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    let action = query.action.as_deref().unwrap_or("archive");

    match query.id {
        Some(id) => {
            if action == "delete" {
                if !state.db.delete_meeting(&id).await? {
                    return Err(ApiError::not_found("Meeting not found"));
                }
                info!("Meeting hard-deleted: id={}", id);
            } else {
                let patch = MeetingPatch {
                    status: Some(MeetingStatus::Archived),
                    ..Default::default()
                };
                state
                    .db
                    .update_meeting(&id, patch)
                    .await?
                    .ok_or_else(|| ApiError::not_found("Meeting not found"))?;
                info!("Meeting archived: id={}", id);
            }

            Ok(Json(json!({
                "message": format!("Meeting {action}d successfully"),
            })))
        }
        None => {
            // Bulk archive is a development convenience only.
            if state.deployment.is_production() {
                return Err(ApiError::forbidden("Bulk delete not allowed in production"));
            }

            let archived = state.db.archive_all_meetings().await?;
            info!("Archived all meetings ({})", archived);

            Ok(Json(json!({
                "archived": archived,
                "message": "All meetings archived (development mode)",
            })))
        }
    }
}

async fn get_meeting(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Json<Value>> {
    let data = state
        .db
        .complete_meeting_data(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    let meeting = &data.meeting;
    let participant_names: Vec<&str> = data.participants.iter().map(|p| p.name.as_str()).collect();

    Ok(Json(json!({
        "meeting": {
            "id": meeting.id,
            "title": meeting.title,
            "date": meeting.start_time,
            "duration": meeting.duration_seconds.unwrap_or(0),
            "transcript": data.transcript.as_ref().map(|t| t.content.as_str()).unwrap_or(""),
            "summary": data.summary.as_ref().map(|s| s.summary_text.as_str()).unwrap_or("No summary available"),
            "keyPoints": data.summary.as_ref().map(|s| s.key_points.clone()).unwrap_or_default(),
            "actionItems": data.summary.as_ref().map(|s| s.action_items.clone()).unwrap_or_default(),
            "decisions": data.summary.as_ref().map(|s| s.decisions.clone()).unwrap_or_default(),
            "nextSteps": data.summary.as_ref().map(|s| s.next_steps.clone()).unwrap_or_default(),
            "participants": participant_names,
            "meetingUrl": meeting.meeting_url,
            "platform": meeting.platform,
            "status": meeting.status,
            "transcriptionMetadata": data.transcript.as_ref().map(|t| json!({
                "source": t.provider,
                "confidence": t.confidence_score.unwrap_or(0.0),
                "processingTime": t.processing_time_ms.unwrap_or(0),
                "language": t.language,
            })),
            "summaryMetadata": data.summary.as_ref().map(|s| json!({
                "provider": s.provider,
                "processingTime": s.processing_time_ms.unwrap_or(0),
            })),
            "participantDetails": data.participants,
        },
        "message": "Meeting data retrieved successfully",
    })))
}
