use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// All schema creation and upgrades go through the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    Ok(())
}

/// Open the configured database and make sure its schema is current.
pub fn open_db(path: &str) -> AppResult<DbPool> {
    let pool = DbPool::new(path)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// Fresh in-memory database with the full schema (unit tests).
#[cfg(test)]
pub fn test_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("in-memory db");
    init_db(&pool.conn).expect("schema");
    pool
}
