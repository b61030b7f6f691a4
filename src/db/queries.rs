//! Row-mapping helpers shared by the per-entity query modules.

use crate::errors::AppError;
use crate::models::shift::Shift;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::Row;
use rusqlite::types::Type;

pub(crate) fn conversion_err(err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(err))
}

pub(crate) fn date_col(row: &Row, col: &str) -> rusqlite::Result<NaiveDate> {
    let s: String = row.get(col)?;
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| conversion_err(AppError::InvalidDate(s)))
}

pub(crate) fn opt_date_col(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveDate>> {
    let s: Option<String> = row.get(col)?;
    match s {
        Some(s) if !s.trim().is_empty() => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| conversion_err(AppError::InvalidDate(s))),
        _ => Ok(None),
    }
}

pub(crate) fn time_col(row: &Row, col: &str) -> rusqlite::Result<NaiveTime> {
    let s: String = row.get(col)?;
    NaiveTime::parse_from_str(&s, "%H:%M").map_err(|_| conversion_err(AppError::InvalidTime(s)))
}

pub(crate) fn opt_time_col(row: &Row, col: &str) -> rusqlite::Result<Option<NaiveTime>> {
    let s: Option<String> = row.get(col)?;
    match s {
        Some(s) if !s.trim().is_empty() => NaiveTime::parse_from_str(&s, "%H:%M")
            .map(Some)
            .map_err(|_| conversion_err(AppError::InvalidTime(s))),
        _ => Ok(None),
    }
}

pub(crate) fn shift_col(row: &Row, col: &str) -> rusqlite::Result<Shift> {
    let s: String = row.get(col)?;
    Shift::parse(&s).ok_or_else(|| conversion_err(AppError::InvalidShift(s)))
}

pub(crate) fn fmt_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

pub(crate) fn fmt_opt_date(d: Option<NaiveDate>) -> Option<String> {
    d.map(fmt_date)
}

pub(crate) fn fmt_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

pub(crate) fn now_stamp() -> String {
    chrono::Local::now().to_rfc3339()
}
