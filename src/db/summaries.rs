//! Summary persistence.
//!
//! The four list-valued fields are stored as JSON text and parsed back on
//! read; a write-then-read round-trip reproduces the original ordering
//! exactly.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub id: String,
    pub meeting_id: String,
    pub transcript_id: Option<String>,
    pub summary_text: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
    pub decisions: Vec<String>,
    pub next_steps: Vec<String>,
    pub provider: String,
    pub processing_time_ms: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewSummary {
    pub transcript_id: Option<String>,
    pub summary_text: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
    pub decisions: Vec<String>,
    pub next_steps: Vec<String>,
    pub provider: String,
    pub processing_time_ms: Option<i64>,
}

fn from_row(row: &Row) -> rusqlite::Result<Summary> {
    let parse = |raw: String| -> rusqlite::Result<Vec<String>> {
        serde_json::from_str(&raw).map_err(|_| rusqlite::Error::InvalidQuery)
    };

    Ok(Summary {
        id: row.get(0)?,
        meeting_id: row.get(1)?,
        transcript_id: row.get(2)?,
        summary_text: row.get(3)?,
        key_points: parse(row.get(4)?)?,
        action_items: parse(row.get(5)?)?,
        decisions: parse(row.get(6)?)?,
        next_steps: parse(row.get(7)?)?,
        provider: row.get(8)?,
        processing_time_ms: row.get(9)?,
        created_at: row.get(10)?,
    })
}

pub fn insert(conn: &Connection, meeting_id: &str, new: &NewSummary) -> Result<Summary> {
    let id = Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO summaries (id, meeting_id, transcript_id, summary_text, key_points, \
         action_items, decisions, next_steps, provider, processing_time_ms) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            id,
            meeting_id,
            new.transcript_id,
            new.summary_text,
            serde_json::to_string(&new.key_points)?,
            serde_json::to_string(&new.action_items)?,
            serde_json::to_string(&new.decisions)?,
            serde_json::to_string(&new.next_steps)?,
            new.provider,
            new.processing_time_ms,
        ],
    )
    .context("Failed to insert summary")?;

    let mut stmt = conn
        .prepare(
            "SELECT id, meeting_id, transcript_id, summary_text, key_points, action_items, \
             decisions, next_steps, provider, processing_time_ms, created_at \
             FROM summaries WHERE id = ?1",
        )
        .context("Failed to prepare summary query")?;

    stmt.query_row(params![id], from_row)
        .context("Inserted summary row not found")
}

/// Latest summary for a meeting, if any.
pub fn for_meeting(conn: &Connection, meeting_id: &str) -> Result<Option<Summary>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, meeting_id, transcript_id, summary_text, key_points, action_items, \
             decisions, next_steps, provider, processing_time_ms, created_at \
             FROM summaries WHERE meeting_id = ?1 ORDER BY created_at DESC, rowid DESC LIMIT 1",
        )
        .context("Failed to prepare summary query")?;

    let mut rows = stmt
        .query_map(params![meeting_id], from_row)
        .context("Failed to query summary")?;

    match rows.next() {
        Some(Ok(summary)) => Ok(Some(summary)),
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
    fn test_list_fields_round_trip_ordered() {
        let (conn, meeting_id) = setup_db();

        insert(
            &conn,
            &meeting_id,
            &NewSummary {
                summary_text: "We planned the sprint.".to_string(),
                key_points: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                action_items: vec!["ship it".to_string()],
                decisions: vec![],
                next_steps: vec!["retro Friday".to_string()],
                provider: "deepseek".to_string(),
                processing_time_ms: Some(1200),
                ..Default::default()
            },
        )
        .unwrap();

        let summary = for_meeting(&conn, &meeting_id).unwrap().unwrap();
        assert_eq!(summary.key_points, vec!["a", "b", "c"]);
        assert_eq!(summary.action_items, vec!["ship it"]);
        assert!(summary.decisions.is_empty());
        assert_eq!(summary.next_steps, vec!["retro Friday"]);
    }

    #[test]
    fn test_round_trip_preserves_special_characters() {
        let (conn, meeting_id) = setup_db();

        let spiky = vec![
            "quotes \"inside\"".to_string(),
            "commas, and, more".to_string(),
            "unicode: हाँ".to_string(),
        ];
        insert(
            &conn,
            &meeting_id,
            &NewSummary {
                summary_text: "x".to_string(),
                key_points: spiky.clone(),
                provider: "deepseek".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let summary = for_meeting(&conn, &meeting_id).unwrap().unwrap();
        assert_eq!(summary.key_points, spiky);
    }

    #[test]
    fn test_for_meeting_empty() {
        let (conn, meeting_id) = setup_db();
        assert!(for_meeting(&conn, &meeting_id).unwrap().is_none());
    }
}
