use crate::errors::{AppError, AppResult};
use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Indonesian month abbreviations, as printed on reports.
const MONTHS_ID: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Ags", "Sep", "Okt", "Nov", "Des",
];

/// Current date-time in WITA (UTC+8), the site's local time.
pub fn now_wita() -> NaiveDateTime {
    match FixedOffset::east_opt(8 * 3600) {
        Some(offset) => Utc::now().with_timezone(&offset).naive_local(),
        None => Utc::now().naive_utc(),
    }
}

pub fn today() -> NaiveDate {
    now_wita().date()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn require_date(s: &str) -> AppResult<NaiveDate> {
    parse_date(s).ok_or_else(|| AppError::InvalidDate(s.to_string()))
}

/// Parse an optional CLI date, defaulting to today (WITA).
pub fn date_or_today(s: Option<&String>) -> AppResult<NaiveDate> {
    match s {
        Some(v) => require_date(v),
        None => Ok(today()),
    }
}

pub fn month_abbr_id(month: u32) -> &'static str {
    MONTHS_ID
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// `2026-10-17` → `17 Okt 2026`
pub fn format_date_id(d: NaiveDate) -> String {
    format!("{:02} {} {}", d.day(), month_abbr_id(d.month()), d.year())
}

/// Whole days from `from` to `to` (negative when `to` is in the past).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn is_leap_year(y: i32) -> bool {
    (y % 4 == 0 && y % 100 != 0) || (y % 400 == 0)
}

pub fn month_last_day(y: i32, m: u32) -> Option<u32> {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 => Some(if is_leap_year(y) { 29 } else { 28 }),
        _ => None,
    }
}

/// First and last day of the month containing `d`.
pub fn month_bounds(d: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = d.with_day(1).unwrap_or(d);
    let last = month_last_day(d.year(), d.month())
        .and_then(|l| d.with_day(l))
        .unwrap_or(d);
    (first, last)
}
