//! Notification log persistence.
//!
//! Append-only: rows are never mutated after creation.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: String,
    pub meeting_id: String,
    pub recipient_email: String,
    pub subject: String,
    pub content: String,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_email: String,
    pub subject: String,
    pub content: String,
    pub status: NotificationStatus,
    pub error_message: Option<String>,
}

fn from_row(row: &Row) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: row.get(0)?,
        meeting_id: row.get(1)?,
        recipient_email: row.get(2)?,
        subject: row.get(3)?,
        content: row.get(4)?,
        status: row.get(5)?,
        error_message: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn append(conn: &Connection, meeting_id: &str, new: &NewNotification) -> Result<Notification> {
    let id = Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO notifications (id, meeting_id, recipient_email, subject, content, \
         status, error_message) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id,
            meeting_id,
            new.recipient_email,
            new.subject,
            new.content,
            new.status.as_str(),
            new.error_message,
        ],
    )
    .context("Failed to append notification")?;

    let mut stmt = conn
        .prepare(
            "SELECT id, meeting_id, recipient_email, subject, content, status, \
             error_message, created_at FROM notifications WHERE id = ?1",
        )
        .context("Failed to prepare notification query")?;

    stmt.query_row(params![id], from_row)
        .context("Appended notification row not found")
}

pub fn for_meeting(conn: &Connection, meeting_id: &str) -> Result<Vec<Notification>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, meeting_id, recipient_email, subject, content, status, \
             error_message, created_at FROM notifications \
             WHERE meeting_id = ?1 ORDER BY rowid",
        )
        .context("Failed to prepare notifications query")?;

    let rows = stmt
        .query_map(params![meeting_id], from_row)
        .context("Failed to query notifications")?;

    let mut notifications = Vec::new();
    for row in rows {
        notifications.push(row?);
    }

    Ok(notifications)
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
    fn test_append_sent_and_failed() {
        let (conn, meeting_id) = setup_db();

        append(
            &conn,
            &meeting_id,
            &NewNotification {
                recipient_email: "sam@x.com".to_string(),
                subject: "Meeting Summary: Test".to_string(),
                content: "body".to_string(),
                status: NotificationStatus::Sent,
                error_message: None,
            },
        )
        .unwrap();
        append(
            &conn,
            &meeting_id,
            &NewNotification {
                recipient_email: "lee@x.com".to_string(),
                subject: "Meeting Summary: Test".to_string(),
                content: "body".to_string(),
                status: NotificationStatus::Failed,
                error_message: Some("connection refused".to_string()),
            },
        )
        .unwrap();

        let logged = for_meeting(&conn, &meeting_id).unwrap();
        assert_eq!(logged.len(), 2);
        assert_eq!(logged[0].status, "sent");
        assert!(logged[0].error_message.is_none());
        assert_eq!(logged[1].status, "failed");
        assert_eq!(
            logged[1].error_message.as_deref(),
            Some("connection refused")
        );
    }
}
