use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Interpret a cell as date, date-time or time and return the Excel serial
/// with the number format to display it.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    let dt_formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    for fmt in dt_formats.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(("yyyy-mm-dd hh:mm", excel_serial(dt)));
        }
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(("yyyy-mm-dd hh:mm", excel_serial(dt.naive_local())));
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(("yyyy-mm-dd", excel_serial(d.and_time(NaiveTime::MIN))));
    }

    for fmt in ["%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(s, fmt) {
            let seconds = t.num_seconds_from_midnight() as f64;
            return Some(("hh:mm", seconds / 86400.0));
        }
    }

    None
}

/// Days since 1899-12-30, the epoch Excel uses once its 1900 leap-year bug
/// is accounted for.
fn excel_serial(dt: NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap_or_default()
        .and_time(NaiveTime::MIN);

    let duration = dt - epoch;
    let days = duration.num_days() as f64;
    let secs = (duration.num_seconds() - duration.num_days() * 86400) as f64;

    days + secs / 86400.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_serials() {
        assert_eq!(parse_to_excel_date("2026-10-17"), Some(("yyyy-mm-dd", 46312.0)));
        assert_eq!(parse_to_excel_date("06:00"), Some(("hh:mm", 0.25)));
        let (fmt, serial) = parse_to_excel_date("2026-10-17 12:00").unwrap();
        assert_eq!(fmt, "yyyy-mm-dd hh:mm");
        assert!((serial - 46312.5).abs() < 1e-9);
    }

    #[test]
    fn plain_text_is_not_a_date() {
        assert!(parse_to_excel_date("Pit Barat").is_none());
        assert!(parse_to_excel_date("C-025660").is_none());
    }
}
