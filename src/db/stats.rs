use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

const COUNTED_TABLES: &[(&str, &str)] = &[
    ("employees", "Employees"),
    ("attendance", "Attendance rows"),
    ("sidak_sessions", "SIDAK sessions"),
    ("sidak_records", "SIDAK records"),
    ("meetings", "Meetings"),
    ("documents", "Documents"),
    ("news", "News"),
    ("blast_log", "Blast messages"),
];

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    for (table, label) in COUNTED_TABLES {
        let count: i64 = pool
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap_or(0);
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, count, RESET);
    }

    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM sidak_sessions ORDER BY date ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT date FROM sidak_sessions ORDER BY date DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let fmt = |d: Option<String>| d.unwrap_or_else(|| format!("{GREY}--{RESET}"));

    println!("{}• SIDAK date range:{}", CYAN, RESET);
    println!("    from: {}", fmt(first));
    println!("    to:   {}", fmt(last));

    println!();
    Ok(())
}
