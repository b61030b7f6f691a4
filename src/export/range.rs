use crate::errors::{AppError, AppResult};
use crate::utils::date::month_last_day;
use chrono::NaiveDate;

/// Parse `--range` (year / month / day / interval).
///
/// Supported:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - YYYY:YYYY
/// - YYYY-MM:YYYY-MM
/// - YYYY-MM-DD:YYYY-MM-DD
pub(crate) fn parse_range(r: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    let (start, end) = match r.split_once(':') {
        Some((a, b)) => {
            let (a, b) = (a.trim(), b.trim());
            if a.len() != b.len() {
                return Err(invalid(r, "start and end must have the same format"));
            }
            (period_bounds(a, r)?.0, period_bounds(b, r)?.1)
        }
        None => period_bounds(r.trim(), r)?,
    };

    if start > end {
        return Err(invalid(r, "start is after end"));
    }
    Ok((start, end))
}

/// First and last day of a single `YYYY`, `YYYY-MM` or `YYYY-MM-DD` period.
fn period_bounds(p: &str, whole: &str) -> AppResult<(NaiveDate, NaiveDate)> {
    match p.len() {
        4 => {
            let y: i32 = p.parse().map_err(|_| invalid(whole, "invalid year"))?;
            let d1 = NaiveDate::from_ymd_opt(y, 1, 1).ok_or_else(|| invalid(whole, "invalid year"))?;
            let d2 = NaiveDate::from_ymd_opt(y, 12, 31).ok_or_else(|| invalid(whole, "invalid year"))?;
            Ok((d1, d2))
        }
        7 if p.as_bytes()[4] == b'-' => {
            let y: i32 = p[0..4].parse().map_err(|_| invalid(whole, "invalid year"))?;
            let m: u32 = p[5..7].parse().map_err(|_| invalid(whole, "invalid month"))?;
            let last = month_last_day(y, m).ok_or_else(|| invalid(whole, "invalid month"))?;
            let d1 = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| invalid(whole, "invalid month"))?;
            let d2 = NaiveDate::from_ymd_opt(y, m, last).ok_or_else(|| invalid(whole, "invalid month"))?;
            Ok((d1, d2))
        }
        10 => {
            let d = NaiveDate::parse_from_str(p, "%Y-%m-%d").map_err(|_| invalid(whole, "invalid date"))?;
            Ok((d, d))
        }
        _ => Err(invalid(whole, "unsupported --range format")),
    }
}

fn invalid(range: &str, why: &str) -> AppError {
    AppError::InvalidDate(format!("{range}: {why}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn single_periods() {
        assert_eq!(parse_range("2026").unwrap(), (d(2026, 1, 1), d(2026, 12, 31)));
        assert_eq!(parse_range("2028-02").unwrap(), (d(2028, 2, 1), d(2028, 2, 29)));
        assert_eq!(parse_range("2026-10-17").unwrap(), (d(2026, 10, 17), d(2026, 10, 17)));
    }

    #[test]
    fn intervals() {
        assert_eq!(parse_range("2025:2026").unwrap(), (d(2025, 1, 1), d(2026, 12, 31)));
        assert_eq!(
            parse_range("2026-01:2026-04").unwrap(),
            (d(2026, 1, 1), d(2026, 4, 30))
        );
    }

    #[test]
    fn rejects_mixed_or_reversed() {
        assert!(parse_range("2026:2026-04").is_err());
        assert!(parse_range("2026-05:2026-04").is_err());
        assert!(parse_range("2026-13").is_err());
        assert!(parse_range("26").is_err());
    }
}
