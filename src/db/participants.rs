//! Participant persistence.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use uuid::Uuid;

/// Participant role. Unknown inputs degrade to `Attendee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    Organizer,
    Presenter,
    Attendee,
}

impl ParticipantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organizer => "organizer",
            Self::Presenter => "presenter",
            Self::Attendee => "attendee",
        }
    }

    pub fn parse_lossy(s: &str) -> Self {
        match s {
            "organizer" => Self::Organizer,
            "presenter" => Self::Presenter,
            _ => Self::Attendee,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Participant {
    pub id: String,
    pub meeting_id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub join_time: Option<String>,
    pub leave_time: Option<String>,
    pub duration_seconds: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewParticipant {
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub join_time: Option<String>,
    pub leave_time: Option<String>,
    pub duration_seconds: Option<i64>,
}

fn from_row(row: &Row) -> rusqlite::Result<Participant> {
    Ok(Participant {
        id: row.get(0)?,
        meeting_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        role: row.get(4)?,
        join_time: row.get(5)?,
        leave_time: row.get(6)?,
        duration_seconds: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Batch insert for a meeting. Duplicate names within the batch are
/// suppressed (the extension's roster scraper can report the same person
/// more than once); the first occurrence wins. Nameless entries are
/// skipped. Returns the full participant list for the meeting.
pub fn insert_batch(
    conn: &Connection,
    meeting_id: &str,
    participants: &[NewParticipant],
) -> Result<Vec<Participant>> {
    let mut seen: Vec<&str> = Vec::new();

    for participant in participants {
        let name = participant.name.trim();
        if name.is_empty() || seen.contains(&name) {
            continue;
        }
        seen.push(name);

        let role = ParticipantRole::parse_lossy(participant.role.as_deref().unwrap_or("attendee"));

        conn.execute(
            "INSERT INTO participants (id, meeting_id, name, email, role, join_time, \
             leave_time, duration_seconds) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                Uuid::new_v4().to_string(),
                meeting_id,
                name,
                participant.email,
                role.as_str(),
                participant.join_time,
                participant.leave_time,
                participant.duration_seconds,
            ],
        )
        .context("Failed to insert participant")?;
    }

    for_meeting(conn, meeting_id)
}

pub fn for_meeting(conn: &Connection, meeting_id: &str) -> Result<Vec<Participant>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, meeting_id, name, email, role, join_time, leave_time, \
             duration_seconds, created_at FROM participants \
             WHERE meeting_id = ?1 ORDER BY rowid",
        )
        .context("Failed to prepare participants query")?;

    let rows = stmt
        .query_map(params![meeting_id], from_row)
        .context("Failed to query participants")?;

    let mut participants = Vec::new();
    for row in rows {
        participants.push(row?);
    }

    Ok(participants)
}
