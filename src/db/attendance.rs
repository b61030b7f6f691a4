use crate::db::queries::{conversion_err, date_col, fmt_date, fmt_time, now_stamp, shift_col, time_col};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{Attendance, AttendanceSource};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

const SELECT_JOINED: &str = "SELECT a.*, IFNULL(e.name, '') AS employee_name
     FROM attendance a LEFT JOIN employees e ON e.nik = a.nik";

pub fn map_attendance(row: &Row) -> rusqlite::Result<Attendance> {
    let source: String = row.get("source")?;
    let source = AttendanceSource::from_db_str(&source)
        .ok_or_else(|| conversion_err(AppError::Other(format!("Invalid source: {}", source))))?;

    Ok(Attendance {
        id: row.get("id")?,
        nik: row.get("nik")?,
        employee_name: row.get("employee_name")?,
        date: date_col(row, "date")?,
        time: time_col(row, "time")?,
        shift: shift_col(row, "shift")?,
        status: row.get("status")?,
        sleep_hours: row.get("sleep_hours")?,
        fit_to_work: row.get::<_, Option<i64>>("fit_to_work")?.map(|v| v == 1),
        source,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_attendance(conn: &Connection, a: &Attendance) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO attendance (nik, date, time, shift, status, sleep_hours, fit_to_work, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            a.nik,
            fmt_date(a.date),
            fmt_time(a.time),
            a.shift.as_str(),
            a.status,
            a.sleep_hours,
            a.fit_to_work.map(|v| v as i64),
            a.source.to_db_str(),
            now_stamp(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_for_day(conn: &Connection, nik: &str, date: NaiveDate) -> AppResult<Option<Attendance>> {
    let sql = format!("{SELECT_JOINED} WHERE a.nik = ?1 AND a.date = ?2");
    let mut stmt = conn.prepare(&sql)?;
    Ok(stmt
        .query_row(params![nik, fmt_date(date)], map_attendance)
        .optional()?)
}

/// Attendance between two dates, both inclusive.
pub fn list_between(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Attendance>> {
    let sql = format!("{SELECT_JOINED} WHERE a.date BETWEEN ?1 AND ?2 ORDER BY a.date ASC, a.time ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![fmt_date(from), fmt_date(to)], map_attendance)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn delete_attendance(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM attendance WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Attendance #{}", id)));
    }
    Ok(())
}
