use crate::db::queries::now_stamp;
use crate::errors::AppResult;
use rusqlite::{Connection, params};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BlastLogEntry {
    pub id: i64,
    pub batch_id: String,
    pub phone: String,
    pub recipient: String,
    pub status: String,
    pub error: Option<String>,
    pub sent_at: String,
}

pub fn insert_blast_log(
    conn: &Connection,
    batch_id: &str,
    phone: &str,
    recipient: &str,
    error: Option<&str>,
) -> AppResult<()> {
    let status = if error.is_some() { "failed" } else { "sent" };
    conn.execute(
        "INSERT INTO blast_log (batch_id, phone, recipient, status, error, sent_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![batch_id, phone, recipient, status, error, now_stamp()],
    )?;
    Ok(())
}

/// Entries of one batch, or the latest `limit` entries when `batch_id` is `None`.
pub fn list_blast_log(conn: &Connection, batch_id: Option<&str>, limit: i64) -> AppResult<Vec<BlastLogEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, batch_id, phone, recipient, status, error, sent_at FROM blast_log
         WHERE (?1 IS NULL OR batch_id = ?1)
         ORDER BY id DESC LIMIT ?2",
    )?;
    let rows = stmt.query_map(params![batch_id, limit], |row| {
        Ok(BlastLogEntry {
            id: row.get(0)?,
            batch_id: row.get(1)?,
            phone: row.get(2)?,
            recipient: row.get(3)?,
            status: row.get(4)?,
            error: row.get(5)?,
            sent_at: row.get(6)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
