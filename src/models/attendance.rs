use crate::models::shift::Shift;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceSource {
    QrScan,
    Manual,
}

impl AttendanceSource {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            AttendanceSource::QrScan => "qr_scan",
            AttendanceSource::Manual => "manual",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "qr_scan" => Some(AttendanceSource::QrScan),
            "manual" => Some(AttendanceSource::Manual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Attendance {
    pub id: i64,
    pub nik: String,
    pub employee_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub shift: Shift,
    pub status: String,
    pub sleep_hours: Option<f64>,
    pub fit_to_work: Option<bool>,
    pub source: AttendanceSource,
    pub created_at: String,
}

/// Optional fitness answers recorded together with a scan.
#[derive(Debug, Clone, Default)]
pub struct FitnessCheck {
    pub sleep_hours: Option<f64>,
    pub fit_to_work: Option<bool>,
}
