use crate::ui::messages::{success, warning};
use rusqlite::{Connection, Error, OptionalExtension, Result};

/// A schema step, applied once and recorded in the `log` table as
/// `migration_applied`.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260101_0001_employees_attendance",
        description: "Created employees and attendance tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS employees (
            nik                TEXT PRIMARY KEY,
            name               TEXT NOT NULL,
            position           TEXT NOT NULL DEFAULT '',
            department         TEXT NOT NULL DEFAULT '',
            company            TEXT NOT NULL DEFAULT '',
            phone              TEXT,
            shift              TEXT CHECK(shift IS NULL OR shift IN ('Shift 1','Shift 2')),
            sim_expiry         TEXT,
            simper_bib_expiry  TEXT,
            simper_tia_expiry  TEXT,
            active             INTEGER NOT NULL DEFAULT 1,
            created_at         TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_employees_department ON employees(department);

        CREATE TABLE IF NOT EXISTS attendance (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            nik          TEXT NOT NULL REFERENCES employees(nik) ON DELETE CASCADE,
            date         TEXT NOT NULL,
            time         TEXT NOT NULL,
            shift        TEXT NOT NULL CHECK(shift IN ('Shift 1','Shift 2')),
            status       TEXT NOT NULL DEFAULT 'present',
            sleep_hours  REAL,
            fit_to_work  INTEGER,
            source       TEXT NOT NULL DEFAULT 'qr_scan' CHECK(source IN ('qr_scan','manual')),
            created_at   TEXT NOT NULL,
            UNIQUE(nik, date)
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance(date);
        "#,
    },
    Migration {
        version: "20260101_0002_sidak",
        description: "Created SIDAK session, record, observer and photo tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sidak_sessions (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            kind             TEXT NOT NULL,
            date             TEXT NOT NULL,
            time             TEXT NOT NULL,
            shift            TEXT NOT NULL CHECK(shift IN ('Shift 1','Shift 2')),
            location         TEXT NOT NULL,
            department       TEXT NOT NULL DEFAULT '',
            company          TEXT NOT NULL DEFAULT '',
            sub_location     TEXT,
            speed_limit_kph  REAL,
            workshop_name    TEXT,
            area_pic         TEXT,
            end_time         TEXT,
            created_by       TEXT,
            sample_count     INTEGER NOT NULL DEFAULT 0,
            finished_at      TEXT,
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sidak_sessions_kind_date ON sidak_sessions(kind, date);

        CREATE TABLE IF NOT EXISTS sidak_records (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER NOT NULL REFERENCES sidak_sessions(id) ON DELETE CASCADE,
            ordinal     INTEGER NOT NULL,
            name        TEXT NOT NULL,
            nik         TEXT,
            company     TEXT,
            checklist   TEXT NOT NULL,
            remarks     TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_sidak_records_session ON sidak_records(session_id);

        CREATE TABLE IF NOT EXISTS sidak_observers (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id  INTEGER NOT NULL REFERENCES sidak_sessions(id) ON DELETE CASCADE,
            ordinal     INTEGER NOT NULL,
            name        TEXT NOT NULL,
            nik         TEXT,
            company     TEXT,
            position    TEXT,
            signature   TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sidak_photos (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            session_id   INTEGER NOT NULL REFERENCES sidak_sessions(id) ON DELETE CASCADE,
            file_name    TEXT NOT NULL,
            stored_path  TEXT NOT NULL,
            created_at   TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260101_0003_content_meetings",
        description: "Created documents, news, meetings and meeting_attendance tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS documents (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            title        TEXT NOT NULL,
            category     TEXT NOT NULL DEFAULT 'umum',
            file_name    TEXT NOT NULL,
            stored_path  TEXT NOT NULL,
            size_bytes   INTEGER NOT NULL DEFAULT 0,
            uploaded_by  TEXT,
            active       INTEGER NOT NULL DEFAULT 1,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS news (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            title       TEXT NOT NULL,
            content     TEXT NOT NULL,
            category    TEXT NOT NULL DEFAULT 'umum',
            author      TEXT,
            active      INTEGER NOT NULL DEFAULT 1,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meetings (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            title        TEXT NOT NULL,
            date         TEXT NOT NULL,
            start_time   TEXT NOT NULL,
            end_time     TEXT NOT NULL,
            venue        TEXT NOT NULL DEFAULT '',
            organizer    TEXT,
            description  TEXT,
            status       TEXT NOT NULL DEFAULT 'scheduled'
                         CHECK(status IN ('scheduled','ongoing','completed','cancelled')),
            qr_token     TEXT NOT NULL UNIQUE,
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meeting_attendance (
            id                 INTEGER PRIMARY KEY AUTOINCREMENT,
            meeting_id         INTEGER NOT NULL REFERENCES meetings(id) ON DELETE CASCADE,
            nik                TEXT REFERENCES employees(nik) ON DELETE SET NULL,
            manual_name        TEXT,
            manual_position    TEXT,
            manual_department  TEXT,
            kind               TEXT NOT NULL CHECK(kind IN ('qr_scan','manual')),
            scanned_at         TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_meeting_attendance_once
            ON meeting_attendance(meeting_id, nik);
        "#,
    },
    Migration {
        version: "20260101_0004_statistics_blast",
        description: "Created safety_statistics and blast_log tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS safety_statistics (
            year        INTEGER PRIMARY KEY,
            payload     TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS blast_log (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            batch_id   TEXT NOT NULL,
            phone      TEXT NOT NULL,
            recipient  TEXT NOT NULL,
            status     TEXT NOT NULL CHECK(status IN ('sent','failed')),
            error      TEXT,
            sent_at    TEXT NOT NULL
        );
        "#,
    },
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Whether the file already holds application tables (anything beyond `log`).
fn has_user_tables(conn: &Connection) -> Result<bool> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master
         WHERE type = 'table' AND name NOT IN ('log', 'sqlite_sequence')",
        [],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

fn backup_before_migration(db_path: &str) -> Result<()> {
    use chrono::Local;
    use std::fs::{self, File};
    use std::io::Write;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let to_sql_err = |what: &str, e: &dyn std::fmt::Display| {
        Error::ToSqlConversionFailure(Box::new(std::io::Error::other(format!(
            "Backup failed ({what}): {e}"
        ))))
    };

    let backup_name = format!(
        "{}-backup_db_pre_migration.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let parent = std::path::Path::new(db_path)
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));
    let backup_path = parent.join(&backup_name);

    let file = File::create(&backup_path).map_err(|e| to_sql_err("create", &e))?;
    let mut zip = ZipWriter::new(file);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sqlite", options)
        .map_err(|e| to_sql_err("start_file", &e))?;
    let db_content = fs::read(db_path).map_err(|e| to_sql_err("read", &e))?;
    zip.write_all(&db_content)
        .map_err(|e| to_sql_err("write_all", &e))?;
    zip.finish().map_err(|e| to_sql_err("finish", &e))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Versions not yet recorded in the log table.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// A database that already holds data gets a zip backup next to it first.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    let pending = pending_migrations(conn)?;
    if pending.is_empty() {
        return Ok(());
    }

    if has_user_tables(conn)? {
        warning("Existing schema needs upgrading, creating a safety backup first...");

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if db_path.is_empty() {
            warning("Could not determine DB path, backup skipped.");
        } else {
            backup_before_migration(&db_path)?;
        }
    }

    for m in MIGRATIONS.iter().filter(|m| pending.contains(&m.version)) {
        conn.execute_batch(m.sql).map_err(|e| {
            Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(format!("Migration {} failed: {}", m.version, e)),
            )
        })?;

        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )?;

        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_run_once() {
        let conn = Connection::open_in_memory().unwrap();
        run_pending_migrations(&conn).unwrap();
        assert!(pending_migrations(&conn).unwrap().is_empty());

        run_pending_migrations(&conn).unwrap();
        let applied: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM log WHERE operation = 'migration_applied'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(applied as usize, MIGRATIONS.len());
    }
}
