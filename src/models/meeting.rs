use chrono::{NaiveDate, NaiveTime};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Ongoing => "ongoing",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(MeetingStatus::Scheduled),
            "ongoing" => Some(MeetingStatus::Ongoing),
            "completed" => Some(MeetingStatus::Completed),
            "cancelled" => Some(MeetingStatus::Cancelled),
            _ => None,
        }
    }

    /// Attendance is only taken while a meeting is not closed.
    pub fn accepts_attendance(&self) -> bool {
        matches!(self, MeetingStatus::Scheduled | MeetingStatus::Ongoing)
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: String,
    pub organizer: Option<String>,
    pub description: Option<String>,
    pub status: MeetingStatus,
    pub qr_token: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingAttendance {
    pub id: i64,
    pub meeting_id: i64,
    pub nik: Option<String>,
    pub name: String,
    pub position: Option<String>,
    pub department: Option<String>,
    /// "qr_scan" or "manual"
    pub kind: String,
    pub scanned_at: String,
}

/// Attendee typed in by the organiser (visitors, contractors).
#[derive(Debug, Clone, Default)]
pub struct ManualAttendee {
    pub name: String,
    pub position: Option<String>,
    pub department: Option<String>,
}
