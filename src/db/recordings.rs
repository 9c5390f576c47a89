//! Recording metadata persistence.
//!
//! Size and duration are best-effort estimates supplied by the caller,
//! not authoritative measurements.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Recording {
    pub id: String,
    pub meeting_id: String,
    pub file_path: String,
    pub size_bytes: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub format: String,
    pub quality_score: Option<f64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewRecording {
    pub file_path: String,
    pub size_bytes: Option<i64>,
    pub duration_seconds: Option<i64>,
    pub format: String,
    pub quality_score: Option<f64>,
}

fn from_row(row: &Row) -> rusqlite::Result<Recording> {
    Ok(Recording {
        id: row.get(0)?,
        meeting_id: row.get(1)?,
        file_path: row.get(2)?,
        size_bytes: row.get(3)?,
        duration_seconds: row.get(4)?,
        format: row.get(5)?,
        quality_score: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn insert(conn: &Connection, meeting_id: &str, new: &NewRecording) -> Result<Recording> {
    let id = Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO recordings (id, meeting_id, file_path, size_bytes, duration_seconds, \
         format, quality_score) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            meeting_id,
            new.file_path,
            new.size_bytes,
            new.duration_seconds,
            new.format,
            new.quality_score,
        ],
    )
    .context("Failed to insert recording")?;

    get(conn, &id)?.context("Inserted recording row not found")
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Recording>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, meeting_id, file_path, size_bytes, duration_seconds, format, \
             quality_score, created_at FROM recordings WHERE id = ?1",
        )
        .context("Failed to prepare recording query")?;

    let mut rows = stmt
        .query_map(params![id], from_row)
        .context("Failed to query recording")?;

    match rows.next() {
        Some(Ok(recording)) => Ok(Some(recording)),
        Some(Err(e)) => Err(e.into()),
        None => Ok(None),
    }
}
