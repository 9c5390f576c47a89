use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables and indexes. Idempotent.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS meetings (
            id TEXT PRIMARY KEY,
            user_id TEXT,
            title TEXT NOT NULL,
            description TEXT,
            start_time TEXT NOT NULL,
            end_time TEXT,
            duration_seconds INTEGER,
            meeting_url TEXT,
            platform TEXT NOT NULL DEFAULT 'web',
            status TEXT NOT NULL DEFAULT 'active',
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create meetings table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_start_time ON meetings(start_time DESC)",
        [],
    )
    .context("Failed to create meetings start_time index")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_status ON meetings(status)",
        [],
    )
    .context("Failed to create meetings status index")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS participants (
            id TEXT PRIMARY KEY,
            meeting_id TEXT NOT NULL REFERENCES meetings(id),
            name TEXT NOT NULL,
            email TEXT,
            role TEXT NOT NULL DEFAULT 'attendee',
            join_time TEXT,
            leave_time TEXT,
            duration_seconds INTEGER,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create participants table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_participants_meeting ON participants(meeting_id)",
        [],
    )
    .context("Failed to create participants meeting index")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS recordings (
            id TEXT PRIMARY KEY,
            meeting_id TEXT NOT NULL REFERENCES meetings(id),
            file_path TEXT NOT NULL,
            size_bytes INTEGER,
            duration_seconds INTEGER,
            format TEXT NOT NULL DEFAULT 'webm',
            quality_score REAL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create recordings table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS transcripts (
            id TEXT PRIMARY KEY,
            meeting_id TEXT NOT NULL REFERENCES meetings(id),
            recording_id TEXT,
            content TEXT NOT NULL,
            language TEXT NOT NULL,
            confidence_score REAL,
            processing_time_ms INTEGER,
            provider TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create transcripts table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_transcripts_meeting ON transcripts(meeting_id)",
        [],
    )
    .context("Failed to create transcripts meeting index")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS summaries (
            id TEXT PRIMARY KEY,
            meeting_id TEXT NOT NULL REFERENCES meetings(id),
            transcript_id TEXT,
            summary_text TEXT NOT NULL,
            key_points TEXT NOT NULL,
            action_items TEXT NOT NULL,
            decisions TEXT NOT NULL,
            next_steps TEXT NOT NULL,
            provider TEXT NOT NULL,
            processing_time_ms INTEGER,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create summaries table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_summaries_meeting ON summaries(meeting_id)",
        [],
    )
    .context("Failed to create summaries meeting index")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS notifications (
            id TEXT PRIMARY KEY,
            meeting_id TEXT NOT NULL REFERENCES meetings(id),
            recipient_email TEXT NOT NULL,
            subject TEXT NOT NULL,
            content TEXT NOT NULL,
            status TEXT NOT NULL,
            error_message TEXT,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("Failed to create notifications table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_notifications_meeting ON notifications(meeting_id)",
        [],
    )
    .context("Failed to create notifications meeting index")?;

    Ok(())
}
