use crate::db::queries::{conversion_err, date_col, fmt_date, fmt_time, now_stamp, time_col};
use crate::errors::{AppError, AppResult};
use crate::models::meeting::{ManualAttendee, Meeting, MeetingAttendance, MeetingStatus};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_meeting(row: &Row) -> rusqlite::Result<Meeting> {
    let status: String = row.get("status")?;
    let status = MeetingStatus::from_db_str(&status)
        .ok_or_else(|| conversion_err(AppError::Other(format!("Invalid meeting status: {}", status))))?;

    Ok(Meeting {
        id: row.get("id")?,
        title: row.get("title")?,
        date: date_col(row, "date")?,
        start_time: time_col(row, "start_time")?,
        end_time: time_col(row, "end_time")?,
        venue: row.get("venue")?,
        organizer: row.get("organizer")?,
        description: row.get("description")?,
        status,
        qr_token: row.get("qr_token")?,
        created_at: row.get("created_at")?,
    })
}

fn map_attendance(row: &Row) -> rusqlite::Result<MeetingAttendance> {
    Ok(MeetingAttendance {
        id: row.get("id")?,
        meeting_id: row.get("meeting_id")?,
        nik: row.get("nik")?,
        name: row.get("display_name")?,
        position: row.get("display_position")?,
        department: row.get("display_department")?,
        kind: row.get("kind")?,
        scanned_at: row.get("scanned_at")?,
    })
}

pub fn insert_meeting(conn: &Connection, m: &Meeting) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO meetings (title, date, start_time, end_time, venue, organizer, description,
                               status, qr_token, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            m.title,
            fmt_date(m.date),
            fmt_time(m.start_time),
            fmt_time(m.end_time),
            m.venue,
            m.organizer,
            m.description,
            m.status.to_db_str(),
            m.qr_token,
            now_stamp(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_meeting(conn: &Connection, id: i64) -> AppResult<Meeting> {
    let mut stmt = conn.prepare_cached("SELECT * FROM meetings WHERE id = ?1")?;
    stmt.query_row([id], map_meeting)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("Meeting #{}", id)))
}

pub fn find_by_token(conn: &Connection, token: &str) -> AppResult<Option<Meeting>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM meetings WHERE qr_token = ?1")?;
    Ok(stmt.query_row([token], map_meeting).optional()?)
}

pub fn token_exists(conn: &Connection, token: &str) -> AppResult<bool> {
    Ok(find_by_token(conn, token)?.is_some())
}

/// Meetings from `from` onwards (all when `None`), soonest first.
pub fn list_meetings(conn: &Connection, from: Option<NaiveDate>) -> AppResult<Vec<Meeting>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM meetings
         WHERE (?1 IS NULL OR date >= ?1)
         ORDER BY date ASC, start_time ASC",
    )?;
    let rows = stmt.query_map(params![from.map(fmt_date)], map_meeting)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_status(conn: &Connection, id: i64, status: MeetingStatus) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE meetings SET status = ?1 WHERE id = ?2",
        params![status.to_db_str(), id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Meeting #{}", id)));
    }
    Ok(())
}

pub fn delete_meeting(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM meetings WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Meeting #{}", id)));
    }
    Ok(())
}

pub fn has_attended(conn: &Connection, meeting_id: i64, nik: &str) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM meeting_attendance WHERE meeting_id = ?1 AND nik = ?2",
            params![meeting_id, nik],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_scan(conn: &Connection, meeting_id: i64, nik: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO meeting_attendance (meeting_id, nik, kind, scanned_at)
         VALUES (?1, ?2, 'qr_scan', ?3)",
        params![meeting_id, nik, now_stamp()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn insert_manual(conn: &Connection, meeting_id: i64, a: &ManualAttendee) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO meeting_attendance (meeting_id, manual_name, manual_position, manual_department,
                                         kind, scanned_at)
         VALUES (?1, ?2, ?3, ?4, 'manual', ?5)",
        params![meeting_id, a.name, a.position, a.department, now_stamp()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_attendance(conn: &Connection, meeting_id: i64) -> AppResult<Vec<MeetingAttendance>> {
    let mut stmt = conn.prepare(
        "SELECT ma.id, ma.meeting_id, ma.nik, ma.kind, ma.scanned_at,
                COALESCE(e.name, ma.manual_name, '') AS display_name,
                COALESCE(e.position, ma.manual_position) AS display_position,
                COALESCE(e.department, ma.manual_department) AS display_department
         FROM meeting_attendance ma
         LEFT JOIN employees e ON e.nik = ma.nik
         WHERE ma.meeting_id = ?1
         ORDER BY ma.scanned_at ASC, ma.id ASC",
    )?;
    let rows = stmt.query_map([meeting_id], map_attendance)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_attendance(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM meeting_attendance WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Meeting attendance #{}", id)));
    }
    Ok(())
}
