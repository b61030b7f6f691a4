use crate::models::checklist::{Checklist, JudgeContext};
use crate::models::shift::Shift;
use crate::models::sidak_kind::SidakKind;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Header of one SIDAK run (the first wizard step).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionHeader {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub shift: Shift,
    pub location: String,
    pub department: String,
    pub company: String,
    #[serde(default)]
    pub sub_location: Option<String>,
    /// Kecepatan only.
    #[serde(default)]
    pub speed_limit_kph: Option<f64>,
    /// Workshop only.
    #[serde(default)]
    pub workshop_name: Option<String>,
    #[serde(default)]
    pub area_pic: Option<String>,
    /// Fatigue checks record when the round ended.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

impl SessionHeader {
    pub fn judge_context(&self) -> JudgeContext {
        JudgeContext {
            speed_limit_kph: self.speed_limit_kph,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: i64,
    pub kind: SidakKind,
    #[serde(flatten)]
    pub header: SessionHeader,
    pub created_by: Option<String>,
    pub sample_count: i64,
    pub finished_at: Option<String>,
    pub created_at: String,
}

impl Session {
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// One inspected person, unit or piece of equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInput {
    pub name: String,
    #[serde(default)]
    pub nik: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub checklist: Checklist,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub id: i64,
    pub session_id: i64,
    pub ordinal: i64,
    #[serde(flatten)]
    pub input: RecordInput,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverInput {
    pub name: String,
    #[serde(default)]
    pub nik: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    /// Base64 PNG, with or without the `data:image/png;base64,` prefix.
    pub signature: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Observer {
    pub id: i64,
    pub session_id: i64,
    pub ordinal: i64,
    #[serde(flatten)]
    pub input: ObserverInput,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Photo {
    pub id: i64,
    pub session_id: i64,
    pub file_name: String,
    pub stored_path: String,
    pub created_at: String,
}

/// A session with everything attached to it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    pub session: Session,
    pub records: Vec<Record>,
    pub observers: Vec<Observer>,
    pub photos: Vec<Photo>,
}

impl SessionDetail {
    pub fn compliant_count(&self) -> usize {
        let ctx = self.session.header.judge_context();
        self.records
            .iter()
            .filter(|r| r.input.checklist.is_compliant(ctx))
            .count()
    }

    /// Share of compliant records in percent; 100 when there are none.
    pub fn compliance_rate(&self) -> f64 {
        if self.records.is_empty() {
            return 100.0;
        }
        self.compliant_count() as f64 * 100.0 / self.records.len() as f64
    }
}

/// Row of a session listing.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: i64,
    pub kind: String,
    pub date: String,
    pub time: String,
    pub shift: String,
    pub location: String,
    pub records: i64,
    pub observers: i64,
    pub finished: bool,
}
