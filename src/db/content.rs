//! Documents and news.

use crate::db::queries::now_stamp;
use crate::errors::{AppError, AppResult};
use crate::models::document::Document;
use crate::models::news::News;
use rusqlite::{Connection, OptionalExtension, Row, params};

fn map_document(row: &Row) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get("id")?,
        title: row.get("title")?,
        category: row.get("category")?,
        file_name: row.get("file_name")?,
        stored_path: row.get("stored_path")?,
        size_bytes: row.get("size_bytes")?,
        uploaded_by: row.get("uploaded_by")?,
        active: row.get::<_, i64>("active")? == 1,
        created_at: row.get("created_at")?,
    })
}

fn map_news(row: &Row) -> rusqlite::Result<News> {
    Ok(News {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        category: row.get("category")?,
        author: row.get("author")?,
        active: row.get::<_, i64>("active")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_document(
    conn: &Connection,
    title: &str,
    category: &str,
    file_name: &str,
    stored_path: &str,
    size_bytes: i64,
    uploaded_by: Option<&str>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO documents (title, category, file_name, stored_path, size_bytes, uploaded_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![title, category, file_name, stored_path, size_bytes, uploaded_by, now_stamp()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_document(conn: &Connection, id: i64) -> AppResult<Document> {
    let mut stmt = conn.prepare_cached("SELECT * FROM documents WHERE id = ?1")?;
    stmt.query_row([id], map_document)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("Document #{}", id)))
}

pub fn list_documents(conn: &Connection, category: Option<&str>, active_only: bool) -> AppResult<Vec<Document>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM documents
         WHERE (?1 IS NULL OR category = ?1) AND (?2 = 0 OR active = 1)
         ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![category, active_only as i64], map_document)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_document_active(conn: &Connection, id: i64, active: bool) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE documents SET active = ?1 WHERE id = ?2",
        params![active as i64, id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Document #{}", id)));
    }
    Ok(())
}

pub fn delete_document(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM documents WHERE id = ?1", [id])?;
    Ok(())
}

pub fn insert_news(
    conn: &Connection,
    title: &str,
    content: &str,
    category: &str,
    author: Option<&str>,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO news (title, content, category, author, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![title, content, category, author, now_stamp()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_news(conn: &Connection, id: i64) -> AppResult<News> {
    let mut stmt = conn.prepare_cached("SELECT * FROM news WHERE id = ?1")?;
    stmt.query_row([id], map_news)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("News #{}", id)))
}

pub fn list_news(conn: &Connection, include_inactive: bool) -> AppResult<Vec<News>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM news WHERE (?1 = 1 OR active = 1) ORDER BY created_at DESC, id DESC",
    )?;
    let rows = stmt.query_map([include_inactive as i64], map_news)?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_news_active(conn: &Connection, id: i64, active: bool) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE news SET active = ?1 WHERE id = ?2",
        params![active as i64, id],
    )?;
    if n == 0 {
        return Err(AppError::NotFound(format!("News #{}", id)));
    }
    Ok(())
}

pub fn delete_news(conn: &Connection, id: i64) -> AppResult<()> {
    let n = conn.execute("DELETE FROM news WHERE id = ?1", [id])?;
    if n == 0 {
        return Err(AppError::NotFound(format!("News #{}", id)));
    }
    Ok(())
}
