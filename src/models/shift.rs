//! Work shifts and their check-in windows.
//!
//! Shift 1 scans are allowed 04:00–10:00, Shift 2 scans 16:00–22:00
//! (both bounds inclusive). Outside both windows nobody may check in.

use crate::utils::time::minutes_of_day;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

const SHIFT1_START: u32 = 4 * 60;
const SHIFT1_END: u32 = 10 * 60;
const SHIFT2_START: u32 = 16 * 60;
const SHIFT2_END: u32 = 22 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "Shift 1")]
    One,
    #[serde(rename = "Shift 2")]
    Two,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::One => "Shift 1",
            Shift::Two => "Shift 2",
        }
    }

    /// Accepts "Shift 1", "shift1", "1", "S1" (any case).
    pub fn parse(s: &str) -> Option<Self> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();

        match compact.as_str() {
            "shift1" | "1" | "s1" => Some(Shift::One),
            "shift2" | "2" | "s2" => Some(Shift::Two),
            _ => None,
        }
    }

    /// Check-in window as (start, end) "HH:MM" strings.
    pub fn time_range(&self) -> (&'static str, &'static str) {
        match self {
            Shift::One => ("04:00", "10:00"),
            Shift::Two => ("16:00", "22:00"),
        }
    }

    pub fn description(&self) -> String {
        let (start, end) = self.time_range();
        format!("{} ({} - {})", self.as_str(), start, end)
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        let m = minutes_of_day(t);
        match self {
            Shift::One => (SHIFT1_START..=SHIFT1_END).contains(&m),
            Shift::Two => (SHIFT2_START..=SHIFT2_END).contains(&m),
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shift 2 between 16:00 and 22:00, Shift 1 for everything else.
pub fn determine_shift_by_time(t: NaiveTime) -> Shift {
    if Shift::Two.contains(t) {
        Shift::Two
    } else {
        Shift::One
    }
}

pub fn is_valid_shift_time(t: NaiveTime, scheduled: Shift) -> bool {
    scheduled.contains(t)
}

pub fn is_outside_all_shift_times(t: NaiveTime) -> bool {
    !Shift::One.contains(t) && !Shift::Two.contains(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    #[test]
    fn windows_are_inclusive() {
        assert!(is_valid_shift_time(t("04:00"), Shift::One));
        assert!(is_valid_shift_time(t("10:00"), Shift::One));
        assert!(!is_valid_shift_time(t("10:01"), Shift::One));
        assert!(is_valid_shift_time(t("16:00"), Shift::Two));
        assert!(is_valid_shift_time(t("22:00"), Shift::Two));
        assert!(!is_valid_shift_time(t("03:59"), Shift::One));
    }

    #[test]
    fn shift_defaults_to_one_outside_windows() {
        assert_eq!(determine_shift_by_time(t("17:30")), Shift::Two);
        assert_eq!(determine_shift_by_time(t("06:00")), Shift::One);
        assert_eq!(determine_shift_by_time(t("13:00")), Shift::One);
        assert_eq!(determine_shift_by_time(t("23:30")), Shift::One);
    }

    #[test]
    fn outside_detection() {
        assert!(is_outside_all_shift_times(t("12:00")));
        assert!(is_outside_all_shift_times(t("23:00")));
        assert!(!is_outside_all_shift_times(t("05:00")));
    }

    #[test]
    fn labels_and_ranges() {
        assert_eq!(Shift::parse("Shift 2"), Some(Shift::Two));
        assert_eq!(Shift::parse("s1"), Some(Shift::One));
        assert_eq!(Shift::parse("night"), None);
        assert_eq!(Shift::One.time_range(), ("04:00", "10:00"));
        assert_eq!(Shift::Two.description(), "Shift 2 (16:00 - 22:00)");
    }
}
