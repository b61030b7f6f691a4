//! SIM / SIMPER expiry classification.

use crate::utils::date::days_between;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryLevel {
    // Ordered by severity: later variants are worse.
    Nodata,
    Aktif,
    Warning,
    Kritis,
    Expired,
}

impl ExpiryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryLevel::Nodata => "nodata",
            ExpiryLevel::Aktif => "aktif",
            ExpiryLevel::Warning => "warning",
            ExpiryLevel::Kritis => "kritis",
            ExpiryLevel::Expired => "expired",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpiryLevel::Nodata => "TIDAK ADA",
            ExpiryLevel::Aktif => "AKTIF",
            ExpiryLevel::Warning => "WARNING",
            ExpiryLevel::Kritis => "KRITIS",
            ExpiryLevel::Expired => "EXPIRED",
        }
    }

    pub fn color(&self) -> &'static str {
        use crate::utils::colors::{GREEN, GREY, MAGENTA, RED, YELLOW};
        match self {
            ExpiryLevel::Nodata => GREY,
            ExpiryLevel::Aktif => GREEN,
            ExpiryLevel::Warning => YELLOW,
            ExpiryLevel::Kritis => RED,
            ExpiryLevel::Expired => MAGENTA,
        }
    }
}

impl fmt::Display for ExpiryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiryStatus {
    pub level: ExpiryLevel,
    pub days_left: Option<i64>,
    pub display_text: String,
}

/// Classify an expiry date relative to `today`:
/// expired (< 0 days), kritis (0–30), warning (31–60), aktif (> 60).
pub fn expiry_status(expiry: Option<NaiveDate>, today: NaiveDate) -> ExpiryStatus {
    let Some(date) = expiry else {
        return ExpiryStatus {
            level: ExpiryLevel::Nodata,
            days_left: None,
            display_text: "—".to_string(),
        };
    };

    let days_left = days_between(today, date);

    let (level, display_text) = if days_left < 0 {
        (
            ExpiryLevel::Expired,
            format!("Expired {} hari lalu", days_left.abs()),
        )
    } else if days_left <= 30 {
        (ExpiryLevel::Kritis, format!("Sisa {days_left} hari"))
    } else if days_left <= 60 {
        (ExpiryLevel::Warning, format!("Sisa {days_left} hari"))
    } else {
        (ExpiryLevel::Aktif, format!("Sisa {days_left} hari"))
    };

    ExpiryStatus {
        level,
        days_left: Some(days_left),
        display_text,
    }
}

/// Priority: expired > kritis > warning > aktif > nodata.
pub fn worst_level<I: IntoIterator<Item = ExpiryLevel>>(levels: I) -> ExpiryLevel {
    levels.into_iter().max().unwrap_or(ExpiryLevel::Nodata)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn classifies_boundaries() {
        let today = d("2026-01-01");
        assert_eq!(expiry_status(None, today).level, ExpiryLevel::Nodata);
        assert_eq!(expiry_status(Some(d("2025-12-31")), today).level, ExpiryLevel::Expired);
        assert_eq!(expiry_status(Some(d("2026-01-01")), today).level, ExpiryLevel::Kritis);
        assert_eq!(expiry_status(Some(d("2026-01-31")), today).level, ExpiryLevel::Kritis);
        assert_eq!(expiry_status(Some(d("2026-02-01")), today).level, ExpiryLevel::Warning);
        assert_eq!(expiry_status(Some(d("2026-03-02")), today).level, ExpiryLevel::Warning);
        assert_eq!(expiry_status(Some(d("2026-03-03")), today).level, ExpiryLevel::Aktif);
    }

    #[test]
    fn display_text_matches_level() {
        let today = d("2026-01-10");
        assert_eq!(
            expiry_status(Some(d("2026-01-07")), today).display_text,
            "Expired 3 hari lalu"
        );
        assert_eq!(
            expiry_status(Some(d("2026-01-20")), today).display_text,
            "Sisa 10 hari"
        );
    }

    #[test]
    fn worst_level_prefers_expired() {
        use ExpiryLevel::*;
        assert_eq!(worst_level([Aktif, Kritis, Warning]), Kritis);
        assert_eq!(worst_level([Nodata, Expired, Aktif]), Expired);
        assert_eq!(worst_level(Vec::new()), Nodata);
    }
}
