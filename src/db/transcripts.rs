//! Transcript persistence.
//!
//! Content may be non-empty even when the provider reported failure — the
//! transcription adapter substitutes fallback text rather than erroring.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub id: String,
    pub meeting_id: String,
    pub recording_id: Option<String>,
    pub content: String,
    pub language: String,
    pub confidence_score: Option<f64>,
    pub processing_time_ms: Option<i64>,
    pub provider: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewTranscript {
    pub recording_id: Option<String>,
    pub content: String,
    pub language: String,
    pub confidence_score: Option<f64>,
    pub processing_time_ms: Option<i64>,
    pub provider: String,
}

fn from_row(row: &Row) -> rusqlite::Result<Transcript> {
    Ok(Transcript {
        id: row.get(0)?,
        meeting_id: row.get(1)?,
        recording_id: row.get(2)?,
        content: row.get(3)?,
        language: row.get(4)?,
        confidence_score: row.get(5)?,
        processing_time_ms: row.get(6)?,
        provider: row.get(7)?,
        created_at: row.get(8)?,
    })
}

pub fn insert(conn: &Connection, meeting_id: &str, new: &NewTranscript) -> Result<Transcript> {
    let id = Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO transcripts (id, meeting_id, recording_id, content, language, \
         confidence_score, processing_time_ms, provider) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            meeting_id,
            new.recording_id,
            new.content,
            new.language,
            new.confidence_score,
            new.processing_time_ms,
            new.provider,
        ],
    )
    .context("Failed to insert transcript")?;

    let mut stmt = conn
        .prepare(
            "SELECT id, meeting_id, recording_id, content, language, confidence_score, \
             processing_time_ms, provider, created_at FROM transcripts WHERE id = ?1",
        )
        .context("Failed to prepare transcript query")?;

    stmt.query_row(params![id], from_row)
        .context("Inserted transcript row not found")
}

/// Latest transcript for a meeting, if any.
pub fn for_meeting(conn: &Connection, meeting_id: &str) -> Result<Option<Transcript>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, meeting_id, recording_id, content, language, confidence_score, \
             processing_time_ms, provider, created_at FROM transcripts \
             WHERE meeting_id = ?1 ORDER BY created_at DESC, rowid DESC LIMIT 1",
        )
        .context("Failed to prepare transcript query")?;

    let mut rows = stmt
        .query_map(params![meeting_id], from_row)
        .context("Failed to query transcript")?;

    match rows.next() {
        Some(Ok(transcript)) => Ok(Some(transcript)),
        Some(Err(e)) => Err(e.into()),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::migrate;
    use crate::db::meetings::{self, NewMeeting};

    fn setup_db() -> (Connection, String) {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let meeting = meetings::insert(
            &conn,
            &NewMeeting {
                title: "Test".to_string(),
                start_time: "2025-06-01T10:00:00Z".to_string(),
                platform: "web".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        (conn, meeting.id)
    }

    #[test]
    fn test_insert_and_fetch_latest() {
        let (conn, meeting_id) = setup_db();

        insert(
            &conn,
            &meeting_id,
            &NewTranscript {
                content: "first".to_string(),
                language: "english".to_string(),
                provider: "scribe".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        insert(
            &conn,
            &meeting_id,
            &NewTranscript {
                content: "second".to_string(),
                language: "english".to_string(),
                confidence_score: Some(0.92),
                provider: "scribe".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let latest = for_meeting(&conn, &meeting_id).unwrap().unwrap();
        assert_eq!(latest.content, "second");
        assert_eq!(latest.confidence_score, Some(0.92));
    }

    #[test]
    fn test_for_meeting_empty() {
        let (conn, meeting_id) = setup_db();
        assert!(for_meeting(&conn, &meeting_id).unwrap().is_none());
    }
}
