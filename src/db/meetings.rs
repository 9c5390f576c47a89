//! Meeting record persistence.
//!
//! Raw SQL with rusqlite, no ORM. Lookups return `Ok(None)` for unknown
//! ids; writes return the stored row.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};
use serde::Serialize;
use uuid::Uuid;

/// Meeting lifecycle status. Transitions are one-directional: an archived
/// meeting can be deleted, but neither can become active again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Active,
    Archived,
    Deleted,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            "deleted" => Ok(Self::Deleted),
            _ => anyhow::bail!("Invalid meeting status: {}", s),
        }
    }

    /// Whether a transition from `self` to `to` is permitted.
    pub fn transition_allowed(&self, to: MeetingStatus) -> bool {
        match (self, to) {
            _ if *self == to => true,
            (Self::Active, _) => true,
            (Self::Archived, Self::Deleted) => true,
            _ => false,
        }
    }
}

/// A meeting row.
#[derive(Debug, Clone, Serialize)]
pub struct Meeting {
    pub id: String,
    pub user_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration_seconds: Option<i64>,
    pub meeting_url: Option<String>,
    pub platform: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for creating a meeting. The id, status and timestamps are
/// assigned by the gateway.
#[derive(Debug, Clone, Default)]
pub struct NewMeeting {
    pub user_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: Option<String>,
    pub duration_seconds: Option<i64>,
    pub meeting_url: Option<String>,
    pub platform: String,
}

/// Partial update. Only fields that are `Some` are written.
#[derive(Debug, Clone, Default)]
pub struct MeetingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<MeetingStatus>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub duration_seconds: Option<i64>,
    pub meeting_url: Option<String>,
    pub platform: Option<String>,
}

/// Listing entry: a meeting plus aggregate columns used by the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingOverview {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub participant_count: i64,
    pub summary_text: Option<String>,
}

const COLUMNS: &str = "id, user_id, title, description, start_time, end_time, \
     duration_seconds, meeting_url, platform, status, created_at, updated_at";

fn from_row(row: &Row) -> rusqlite::Result<Meeting> {
    Ok(Meeting {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        duration_seconds: row.get(6)?,
        meeting_url: row.get(7)?,
        platform: row.get(8)?,
        status: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

pub fn insert(conn: &Connection, new: &NewMeeting) -> Result<Meeting> {
    let id = Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO meetings (id, user_id, title, description, start_time, end_time, \
         duration_seconds, meeting_url, platform, status) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            id,
            new.user_id,
            new.title,
            new.description,
            new.start_time,
            new.end_time,
            new.duration_seconds,
            new.meeting_url,
            new.platform,
            MeetingStatus::Active.as_str(),
        ],
    )
    .context("Failed to insert meeting")?;

    get(conn, &id)?.context("Inserted meeting row not found")
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Meeting>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {COLUMNS} FROM meetings WHERE id = ?1"))
        .context("Failed to prepare meeting query")?;

    let mut rows = stmt
        .query_map(params![id], from_row)
        .context("Failed to query meeting")?;

    match rows.next() {
        Some(Ok(meeting)) => Ok(Some(meeting)),
        Some(Err(e)) => Err(e.into()),
        None => Ok(None),
    }
}

/// List active meetings, newest first, with participant counts and the
/// latest summary text joined in.
pub fn list(conn: &Connection, user_id: Option<&str>, limit: usize) -> Result<Vec<MeetingOverview>> {
    let mut sql = format!(
        "SELECT {}, COUNT(DISTINCT p.id) AS participant_count, MAX(s.summary_text) AS summary_text \
         FROM meetings m \
         LEFT JOIN participants p ON p.meeting_id = m.id \
         LEFT JOIN summaries s ON s.meeting_id = m.id \
         WHERE m.status = 'active'",
        COLUMNS
            .split(", ")
            .map(|c| format!("m.{c}"))
            .collect::<Vec<_>>()
            .join(", "),
    );
    let mut sql_params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(user) = user_id {
        sql.push_str(" AND m.user_id = ?");
        sql_params.push(Box::new(user.to_string()));
    }

    sql.push_str(" GROUP BY m.id ORDER BY m.start_time DESC, m.created_at DESC LIMIT ?");
    sql_params.push(Box::new(limit as i64));

    let mut stmt = conn
        .prepare(&sql)
        .context("Failed to prepare meetings list query")?;

    let param_refs: Vec<&dyn rusqlite::ToSql> = sql_params.iter().map(|p| p.as_ref()).collect();

    let rows = stmt
        .query_map(param_refs.as_slice(), |row| {
            Ok(MeetingOverview {
                meeting: from_row(row)?,
                participant_count: row.get(12)?,
                summary_text: row.get(13)?,
            })
        })
        .context("Failed to list meetings")?;

    let mut meetings = Vec::new();
    for row in rows {
        meetings.push(row?);
    }

    Ok(meetings)
}

/// Apply a partial patch, updating only the provided fields. Returns the
/// updated row, or `None` when no meeting with that id exists.
pub fn update(conn: &Connection, id: &str, patch: &MeetingPatch) -> Result<Option<Meeting>> {
    if get(conn, id)?.is_none() {
        return Ok(None);
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut sql_params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(title) = &patch.title {
        sets.push("title = ?");
        sql_params.push(Box::new(title.clone()));
    }
    if let Some(description) = &patch.description {
        sets.push("description = ?");
        sql_params.push(Box::new(description.clone()));
    }
    if let Some(status) = &patch.status {
        sets.push("status = ?");
        sql_params.push(Box::new(status.as_str().to_string()));
    }
    if let Some(start_time) = &patch.start_time {
        sets.push("start_time = ?");
        sql_params.push(Box::new(start_time.clone()));
    }
    if let Some(end_time) = &patch.end_time {
        sets.push("end_time = ?");
        sql_params.push(Box::new(end_time.clone()));
    }
    if let Some(duration) = patch.duration_seconds {
        sets.push("duration_seconds = ?");
        sql_params.push(Box::new(duration));
    }
    if let Some(url) = &patch.meeting_url {
        sets.push("meeting_url = ?");
        sql_params.push(Box::new(url.clone()));
    }
    if let Some(platform) = &patch.platform {
        sets.push("platform = ?");
        sql_params.push(Box::new(platform.clone()));
    }

    let sql = format!(
        "UPDATE meetings SET {}updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        sets.iter()
            .map(|s| format!("{s}, "))
            .collect::<String>()
    );
    sql_params.push(Box::new(id.to_string()));

    let param_refs: Vec<&dyn rusqlite::ToSql> = sql_params.iter().map(|p| p.as_ref()).collect();

    conn.execute(&sql, param_refs.as_slice())
        .context("Failed to update meeting")?;

    get(conn, id)
}

/// Hard delete. Returns true when a row was removed.
pub fn delete(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM meetings WHERE id = ?1", params![id])
        .context("Failed to delete meeting")?;
    Ok(deleted > 0)
}

/// Archive every active meeting. Development-mode bulk operation.
pub fn archive_all(conn: &Connection) -> Result<usize> {
    conn.execute(
        "UPDATE meetings SET status = 'archived', updated_at = CURRENT_TIMESTAMP \
         WHERE status = 'active'",
        [],
    )
    .context("Failed to archive meetings")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init::migrate;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn
    }

    fn new_meeting(title: &str) -> NewMeeting {
        NewMeeting {
            title: title.to_string(),
            start_time: "2025-06-01T10:00:00Z".to_string(),
            platform: "google_meet".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_insert_returns_row() {
        let conn = setup_db();
        let meeting = insert(&conn, &new_meeting("Standup")).unwrap();

        assert!(!meeting.id.is_empty());
        assert_eq!(meeting.title, "Standup");
        assert_eq!(meeting.status, "active");
        assert!(!meeting.created_at.is_empty());
    }

    #[test]
    fn test_get_nonexistent() {
        let conn = setup_db();
        assert!(get(&conn, "no-such-id").unwrap().is_none());
    }

    #[test]
    fn test_update_partial_patch() {
        let conn = setup_db();
        let meeting = insert(&conn, &new_meeting("Before")).unwrap();

        let patch = MeetingPatch {
            title: Some("After".to_string()),
            ..Default::default()
        };
        let updated = update(&conn, &meeting.id, &patch).unwrap().unwrap();

        assert_eq!(updated.title, "After");
        // Untouched fields survive
        assert_eq!(updated.start_time, meeting.start_time);
        assert_eq!(updated.platform, "google_meet");
    }

    #[test]
    fn test_update_unknown_id_returns_none() {
        let conn = setup_db();
        let patch = MeetingPatch {
            title: Some("X".to_string()),
            ..Default::default()
        };
        assert!(update(&conn, "missing", &patch).unwrap().is_none());
    }

    #[test]
    fn test_archive_leaves_row() {
        let conn = setup_db();
        let meeting = insert(&conn, &new_meeting("Archive me")).unwrap();

        let patch = MeetingPatch {
            status: Some(MeetingStatus::Archived),
            ..Default::default()
        };
        update(&conn, &meeting.id, &patch).unwrap();

        let row = get(&conn, &meeting.id).unwrap().unwrap();
        assert_eq!(row.status, "archived");
    }

    #[test]
    fn test_delete_removes_row() {
        let conn = setup_db();
        let meeting = insert(&conn, &new_meeting("Delete me")).unwrap();

        assert!(delete(&conn, &meeting.id).unwrap());
        assert!(get(&conn, &meeting.id).unwrap().is_none());
        assert!(!delete(&conn, &meeting.id).unwrap());
    }

    #[test]
    fn test_list_newest_first_excludes_archived() {
        let conn = setup_db();

        let mut first = new_meeting("First");
        first.start_time = "2025-06-01T09:00:00Z".to_string();
        insert(&conn, &first).unwrap();

        let mut second = new_meeting("Second");
        second.start_time = "2025-06-01T11:00:00Z".to_string();
        insert(&conn, &second).unwrap();

        let archived = insert(&conn, &new_meeting("Archived")).unwrap();
        let patch = MeetingPatch {
            status: Some(MeetingStatus::Archived),
            ..Default::default()
        };
        update(&conn, &archived.id, &patch).unwrap();

        let listed = list(&conn, None, 10).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].meeting.title, "Second");
        assert_eq!(listed[1].meeting.title, "First");
    }

    #[test]
    fn test_list_filters_by_user() {
        let conn = setup_db();

        let mut mine = new_meeting("Mine");
        mine.user_id = Some("u1".to_string());
        insert(&conn, &mine).unwrap();
        insert(&conn, &new_meeting("Unowned")).unwrap();

        let listed = list(&conn, Some("u1"), 10).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].meeting.title, "Mine");
    }

    #[test]
    fn test_archive_all() {
        let conn = setup_db();
        insert(&conn, &new_meeting("A")).unwrap();
        insert(&conn, &new_meeting("B")).unwrap();

        assert_eq!(archive_all(&conn).unwrap(), 2);
        assert!(list(&conn, None, 10).unwrap().is_empty());
    }

    #[test]
    fn test_status_transitions_one_directional() {
        assert!(MeetingStatus::Active.transition_allowed(MeetingStatus::Archived));
        assert!(MeetingStatus::Active.transition_allowed(MeetingStatus::Deleted));
        assert!(MeetingStatus::Archived.transition_allowed(MeetingStatus::Deleted));
        assert!(!MeetingStatus::Archived.transition_allowed(MeetingStatus::Active));
        assert!(!MeetingStatus::Deleted.transition_allowed(MeetingStatus::Active));
        assert!(!MeetingStatus::Deleted.transition_allowed(MeetingStatus::Archived));
    }
}
