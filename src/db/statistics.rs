use crate::db::queries::now_stamp;
use crate::errors::AppResult;
use crate::models::statistics::StatisticsInput;
use rusqlite::{Connection, OptionalExtension, params};

/// Stored input for `year`, or `None` when nothing was saved yet.
pub fn load_statistics(conn: &Connection, year: i32) -> AppResult<Option<StatisticsInput>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT payload FROM safety_statistics WHERE year = ?1",
            [year],
            |r| r.get(0),
        )
        .optional()?;

    match raw {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_statistics(conn: &Connection, year: i32, input: &StatisticsInput) -> AppResult<()> {
    let payload = serde_json::to_string(input)?;
    conn.execute(
        "INSERT INTO safety_statistics (year, payload, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(year) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
        params![year, payload, now_stamp()],
    )?;
    Ok(())
}
