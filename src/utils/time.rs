//! Time utilities: parsing HH:MM, minutes since midnight, formatting.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveTime, Timelike};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()
}

pub fn require_time(t: &str) -> AppResult<NaiveTime> {
    parse_time(t).ok_or_else(|| AppError::InvalidTime(t.to_string()))
}

/// Parse an optional CLI time, defaulting to the current WITA time.
pub fn time_or_now(t: Option<&String>) -> AppResult<NaiveTime> {
    match t {
        Some(v) => require_time(v),
        None => {
            let now = crate::utils::date::now_wita().time();
            Ok(NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now))
        }
    }
}

pub fn minutes_of_day(t: NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

pub fn format_hhmm(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_counts_minutes() {
        let t = parse_time("16:05").unwrap();
        assert_eq!(minutes_of_day(t), 965);
        assert!(parse_time("25:00").is_none());
        assert!(require_time("7.30").is_err());
    }
}
