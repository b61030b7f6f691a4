use crate::db::queries::{
    conversion_err, date_col, fmt_date, fmt_time, now_stamp, opt_time_col, shift_col, time_col,
};
use crate::errors::{AppError, AppResult};
use crate::models::checklist::Checklist;
use crate::models::sidak::{
    Observer, ObserverInput, Photo, Record, RecordInput, Session, SessionHeader, SessionSummary,
};
use crate::models::sidak_kind::SidakKind;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_session(row: &Row) -> rusqlite::Result<Session> {
    let kind: String = row.get("kind")?;
    let kind = SidakKind::parse(&kind).ok_or_else(|| conversion_err(AppError::InvalidKind(kind)))?;

    Ok(Session {
        id: row.get("id")?,
        kind,
        header: SessionHeader {
            date: date_col(row, "date")?,
            time: time_col(row, "time")?,
            shift: shift_col(row, "shift")?,
            location: row.get("location")?,
            department: row.get("department")?,
            company: row.get("company")?,
            sub_location: row.get("sub_location")?,
            speed_limit_kph: row.get("speed_limit_kph")?,
            workshop_name: row.get("workshop_name")?,
            area_pic: row.get("area_pic")?,
            end_time: opt_time_col(row, "end_time")?,
        },
        created_by: row.get("created_by")?,
        sample_count: row.get("sample_count")?,
        finished_at: row.get("finished_at")?,
        created_at: row.get("created_at")?,
    })
}

fn map_record(row: &Row) -> rusqlite::Result<Record> {
    let raw: String = row.get("checklist")?;
    let checklist: Checklist =
        serde_json::from_str(&raw).map_err(|e| conversion_err(AppError::Json(e)))?;

    Ok(Record {
        id: row.get("id")?,
        session_id: row.get("session_id")?,
        ordinal: row.get("ordinal")?,
        input: RecordInput {
            name: row.get("name")?,
            nik: row.get("nik")?,
            company: row.get("company")?,
            checklist,
            remarks: row.get("remarks")?,
        },
        created_at: row.get("created_at")?,
    })
}

fn map_observer(row: &Row) -> rusqlite::Result<Observer> {
    Ok(Observer {
        id: row.get("id")?,
        session_id: row.get("session_id")?,
        ordinal: row.get("ordinal")?,
        input: ObserverInput {
            name: row.get("name")?,
            nik: row.get("nik")?,
            company: row.get("company")?,
            position: row.get("position")?,
            signature: row.get("signature")?,
        },
        created_at: row.get("created_at")?,
    })
}

fn map_photo(row: &Row) -> rusqlite::Result<Photo> {
    Ok(Photo {
        id: row.get("id")?,
        session_id: row.get("session_id")?,
        file_name: row.get("file_name")?,
        stored_path: row.get("stored_path")?,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_session(
    conn: &Connection,
    kind: SidakKind,
    h: &SessionHeader,
    created_by: Option<&str>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sidak_sessions (kind, date, time, shift, location, department, company,
                                     sub_location, speed_limit_kph, workshop_name, area_pic,
                                     end_time, created_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            kind.as_str(),
            fmt_date(h.date),
            fmt_time(h.time),
            h.shift.as_str(),
            h.location,
            h.department,
            h.company,
            h.sub_location,
            h.speed_limit_kph,
            h.workshop_name,
            h.area_pic,
            h.end_time.map(fmt_time),
            created_by,
            now_stamp(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_session(conn: &Connection, id: i64) -> AppResult<Option<Session>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM sidak_sessions WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_session).optional()?)
}

pub fn get_session(conn: &Connection, id: i64) -> AppResult<Session> {
    find_session(conn, id)?.ok_or_else(|| AppError::NotFound(format!("SIDAK session #{}", id)))
}

pub fn count_records(conn: &Connection, session_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM sidak_records WHERE session_id = ?1",
        [session_id],
        |r| r.get(0),
    )?)
}

pub fn count_observers(conn: &Connection, session_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM sidak_observers WHERE session_id = ?1",
        [session_id],
        |r| r.get(0),
    )?)
}

/// Append a record with the next ordinal; returns (id, ordinal).
pub fn insert_record(conn: &Connection, session_id: i64, r: &RecordInput) -> AppResult<(i64, i64)> {
    let ordinal = count_records(conn, session_id)? + 1;
    let checklist = serde_json::to_string(&r.checklist)?;

    conn.execute(
        "INSERT INTO sidak_records (session_id, ordinal, name, nik, company, checklist, remarks, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![session_id, ordinal, r.name, r.nik, r.company, checklist, r.remarks, now_stamp()],
    )?;
    Ok((conn.last_insert_rowid(), ordinal))
}

pub fn insert_observer(conn: &Connection, session_id: i64, o: &ObserverInput) -> AppResult<(i64, i64)> {
    let ordinal = count_observers(conn, session_id)? + 1;

    conn.execute(
        "INSERT INTO sidak_observers (session_id, ordinal, name, nik, company, position, signature, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![session_id, ordinal, o.name, o.nik, o.company, o.position, o.signature, now_stamp()],
    )?;
    Ok((conn.last_insert_rowid(), ordinal))
}

pub fn insert_photo(conn: &Connection, session_id: i64, file_name: &str, stored_path: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO sidak_photos (session_id, file_name, stored_path, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![session_id, file_name, stored_path, now_stamp()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn mark_finished(conn: &Connection, session_id: i64, sample_count: i64) -> AppResult<()> {
    conn.execute(
        "UPDATE sidak_sessions SET sample_count = ?1, finished_at = ?2 WHERE id = ?3",
        params![sample_count, now_stamp(), session_id],
    )?;
    Ok(())
}

pub fn load_records(conn: &Connection, session_id: i64) -> AppResult<Vec<Record>> {
    let mut stmt = conn.prepare("SELECT * FROM sidak_records WHERE session_id = ?1 ORDER BY ordinal ASC")?;
    let rows = stmt.query_map([session_id], map_record)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_observers(conn: &Connection, session_id: i64) -> AppResult<Vec<Observer>> {
    let mut stmt = conn.prepare("SELECT * FROM sidak_observers WHERE session_id = ?1 ORDER BY ordinal ASC")?;
    let rows = stmt.query_map([session_id], map_observer)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_photos(conn: &Connection, session_id: i64) -> AppResult<Vec<Photo>> {
    let mut stmt = conn.prepare("SELECT * FROM sidak_photos WHERE session_id = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map([session_id], map_photo)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Sessions between two dates (inclusive), optionally limited to one kind.
pub fn list_sessions(
    conn: &Connection,
    kind: Option<SidakKind>,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<Session>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM sidak_sessions
         WHERE (?1 IS NULL OR kind = ?1) AND date BETWEEN ?2 AND ?3
         ORDER BY date ASC, time ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![kind.map(|k| k.as_str()), fmt_date(from), fmt_date(to)],
        map_session,
    )?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn list_summaries(
    conn: &Connection,
    kind: Option<SidakKind>,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<SessionSummary>> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.kind, s.date, s.time, s.shift, s.location, s.finished_at,
                (SELECT COUNT(*) FROM sidak_records r WHERE r.session_id = s.id) AS records,
                (SELECT COUNT(*) FROM sidak_observers o WHERE o.session_id = s.id) AS observers
         FROM sidak_sessions s
         WHERE (?1 IS NULL OR s.kind = ?1) AND s.date BETWEEN ?2 AND ?3
         ORDER BY s.date ASC, s.time ASC, s.id ASC",
    )?;
    let rows = stmt.query_map(
        params![kind.map(|k| k.as_str()), fmt_date(from), fmt_date(to)],
        |row| {
            Ok(SessionSummary {
                id: row.get("id")?,
                kind: row.get("kind")?,
                date: row.get("date")?,
                time: row.get("time")?,
                shift: row.get("shift")?,
                location: row.get("location")?,
                records: row.get("records")?,
                observers: row.get("observers")?,
                finished: row.get::<_, Option<String>>("finished_at")?.is_some(),
            })
        },
    )?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delete a session; records, observers and photo rows cascade.
/// Returns the stored photo paths so the caller can remove the files.
pub fn delete_session(conn: &Connection, id: i64) -> AppResult<Vec<String>> {
    let photos: Vec<String> = load_photos(conn, id)?
        .into_iter()
        .map(|p| p.stored_path)
        .collect();

    let n = conn.execute("DELETE FROM sidak_sessions WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::NotFound(format!("SIDAK session #{}", id)));
    }
    Ok(photos)
}
