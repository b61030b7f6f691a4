//! Unified application error type.
//! All modules (db, core, cli, export) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Serialization
    // ---------------------------
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid shift: {0}")]
    InvalidShift(String),

    #[error("Unknown inspection kind: {0}")]
    InvalidKind(String),

    #[error("Invalid QR code: {0}")]
    InvalidQr(String),

    // ---------------------------
    // Domain rules
    // ---------------------------
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Limit reached: {0}")]
    LimitReached(String),

    #[error("Session {0} is already finished")]
    SessionFinished(i64),

    #[error("Unfinished {kind} session #{session_id} has a saved draft (continue it or use --discard-draft)")]
    DraftPending { kind: String, session_id: i64 },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Scan at {time} is outside the allowed window for {shift}")]
    InvalidShiftTime { time: String, shift: String },

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Messaging
    // ---------------------------
    #[error("Messaging error: {0}")]
    Messaging(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
