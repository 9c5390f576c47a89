//! Persistence gateway.
//!
//! One sub-module per entity, each with raw parameterized SQL and its own
//! tests. The [`Database`] handle wraps a single SQLite connection behind
//! an async mutex; it is opened once at startup and injected into the
//! pipeline and API state rather than re-opened per call.

pub mod init;
pub mod meetings;
pub mod notifications;
pub mod participants;
pub mod recordings;
pub mod summaries;
pub mod transcripts;

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub use init::migrate;
pub use meetings::{Meeting, MeetingOverview, MeetingPatch, MeetingStatus, NewMeeting};
pub use notifications::{NewNotification, Notification, NotificationStatus};
pub use participants::{NewParticipant, Participant, ParticipantRole};
pub use recordings::{NewRecording, Recording};
pub use summaries::{NewSummary, Summary};
pub use transcripts::{NewTranscript, Transcript};

/// Aggregate view of one meeting with all derived entities.
#[derive(Debug, Clone, Serialize)]
pub struct CompleteMeetingData {
    pub meeting: Meeting,
    pub participants: Vec<Participant>,
    pub transcript: Option<Transcript>,
    pub summary: Option<Summary>,
}

/// Shared handle to the SQLite store. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (creating if necessary) the database file and run migrations.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }

        let conn = Connection::open(path).context("Failed to open database connection")?;
        init::migrate(&conn)?;

        info!("Database ready at {:?}", path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database, used by tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        init::migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn run<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.conn.lock().await;
        f(&conn)
    }

    // --- meetings ---

    pub async fn create_meeting(&self, new: NewMeeting) -> Result<Meeting> {
        self.run(|conn| meetings::insert(conn, &new)).await
    }

    pub async fn meeting(&self, id: &str) -> Result<Option<Meeting>> {
        self.run(|conn| meetings::get(conn, id)).await
    }

    pub async fn list_meetings(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<MeetingOverview>> {
        self.run(|conn| meetings::list(conn, user_id, limit)).await
    }

    pub async fn update_meeting(&self, id: &str, patch: MeetingPatch) -> Result<Option<Meeting>> {
        self.run(|conn| meetings::update(conn, id, &patch)).await
    }

    pub async fn delete_meeting(&self, id: &str) -> Result<bool> {
        self.run(|conn| meetings::delete(conn, id)).await
    }

    pub async fn archive_all_meetings(&self) -> Result<usize> {
        self.run(meetings::archive_all).await
    }

    // --- participants ---

    pub async fn add_participants(
        &self,
        meeting_id: &str,
        new: Vec<NewParticipant>,
    ) -> Result<Vec<Participant>> {
        self.run(|conn| participants::insert_batch(conn, meeting_id, &new))
            .await
    }

    pub async fn participants_for(&self, meeting_id: &str) -> Result<Vec<Participant>> {
        self.run(|conn| participants::for_meeting(conn, meeting_id))
            .await
    }

    // --- recordings ---

    pub async fn create_recording(&self, meeting_id: &str, new: NewRecording) -> Result<Recording> {
        self.run(|conn| recordings::insert(conn, meeting_id, &new))
            .await
    }

    // --- transcripts ---

    pub async fn create_transcript(
        &self,
        meeting_id: &str,
        new: NewTranscript,
    ) -> Result<Transcript> {
        self.run(|conn| transcripts::insert(conn, meeting_id, &new))
            .await
    }

    pub async fn transcript_for(&self, meeting_id: &str) -> Result<Option<Transcript>> {
        self.run(|conn| transcripts::for_meeting(conn, meeting_id))
            .await
    }

    // --- summaries ---

    pub async fn create_summary(&self, meeting_id: &str, new: NewSummary) -> Result<Summary> {
        self.run(|conn| summaries::insert(conn, meeting_id, &new))
            .await
    }

    pub async fn summary_for(&self, meeting_id: &str) -> Result<Option<Summary>> {
        self.run(|conn| summaries::for_meeting(conn, meeting_id))
            .await
    }

    // --- notifications ---

    pub async fn append_notification(
        &self,
        meeting_id: &str,
        new: NewNotification,
    ) -> Result<Notification> {
        self.run(|conn| notifications::append(conn, meeting_id, &new))
            .await
    }

    pub async fn notifications_for(&self, meeting_id: &str) -> Result<Vec<Notification>> {
        self.run(|conn| notifications::for_meeting(conn, meeting_id))
            .await
    }

    // --- aggregates ---

    /// Meeting plus participants, transcript and summary in one call.
    /// `None` when the meeting id is unknown.
    pub async fn complete_meeting_data(&self, id: &str) -> Result<Option<CompleteMeetingData>> {
        let Some(meeting) = self.meeting(id).await? else {
            return Ok(None);
        };

        let (participants, transcript, summary) = tokio::join!(
            self.participants_for(id),
            self.transcript_for(id),
            self.summary_for(id),
        );

        Ok(Some(CompleteMeetingData {
            meeting,
            participants: participants?,
            transcript: transcript?,
            summary: summary?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meeting() -> NewMeeting {
        NewMeeting {
            title: "Sprint Planning".to_string(),
            start_time: "2025-06-01T10:00:00Z".to_string(),
            platform: "google_meet".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_complete_meeting_data_aggregates() {
        let db = Database::open_in_memory().unwrap();
        let meeting = db.create_meeting(sample_meeting()).await.unwrap();

        db.add_participants(
            &meeting.id,
            vec![NewParticipant {
                name: "Sam".to_string(),
                email: Some("sam@x.com".to_string()),
                ..Default::default()
            }],
        )
        .await
        .unwrap();

        db.create_transcript(
            &meeting.id,
            NewTranscript {
                content: "hello".to_string(),
                language: "english".to_string(),
                provider: "scribe".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let data = db
            .complete_meeting_data(&meeting.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(data.meeting.id, meeting.id);
        assert_eq!(data.participants.len(), 1);
        assert!(data.transcript.is_some());
        assert!(data.summary.is_none());
    }

    #[tokio::test]
    async fn test_complete_meeting_data_unknown_id() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.complete_meeting_data("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.db");
        let db = Database::open(&path).unwrap();

        db.create_meeting(sample_meeting()).await.unwrap();
        assert!(path.exists());
    }
}
