use crate::db::blast::BlastLogEntry;
use crate::models::attendance::Attendance;
use crate::models::employee::Employee;
use crate::models::meeting::MeetingAttendance;
use crate::models::sidak::{Record, SessionDetail};
use crate::models::statistics::MonthlyStat;
use crate::utils::date::month_abbr_id;
use crate::utils::formatting::yes_no;
use serde::Serialize;

/// A flat row type that can be written by every exporter.
/// CSV and JSON go through `Serialize`; XLSX and PDF use `headers`/`cells`.
pub trait Exportable: Serialize {
    fn headers() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

fn opt(v: &Option<String>) -> String {
    v.clone().unwrap_or_default()
}

#[derive(Serialize, Clone, Debug)]
pub struct EmployeeExport {
    pub nik: String,
    pub name: String,
    pub position: String,
    pub department: String,
    pub company: String,
    pub phone: String,
    pub shift: String,
    pub sim_expiry: String,
    pub simper_bib_expiry: String,
    pub simper_tia_expiry: String,
    pub active: bool,
}

impl From<&Employee> for EmployeeExport {
    fn from(e: &Employee) -> Self {
        let d = |v: Option<chrono::NaiveDate>| v.map(|d| d.to_string()).unwrap_or_default();
        Self {
            nik: e.nik.clone(),
            name: e.name.clone(),
            position: e.position.clone(),
            department: e.department.clone(),
            company: e.company.clone(),
            phone: opt(&e.phone),
            shift: e.shift.map(|s| s.as_str().to_string()).unwrap_or_default(),
            sim_expiry: d(e.sim_expiry),
            simper_bib_expiry: d(e.simper_bib_expiry),
            simper_tia_expiry: d(e.simper_tia_expiry),
            active: e.active,
        }
    }
}

impl Exportable for EmployeeExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "nik",
            "name",
            "position",
            "department",
            "company",
            "phone",
            "shift",
            "sim_expiry",
            "simper_bib_expiry",
            "simper_tia_expiry",
            "active",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.nik.clone(),
            self.name.clone(),
            self.position.clone(),
            self.department.clone(),
            self.company.clone(),
            self.phone.clone(),
            self.shift.clone(),
            self.sim_expiry.clone(),
            self.simper_bib_expiry.clone(),
            self.simper_tia_expiry.clone(),
            yes_no(self.active).to_string(),
        ]
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct AttendanceExport {
    pub id: i64,
    pub date: String,
    pub time: String,
    pub shift: String,
    pub nik: String,
    pub name: String,
    pub status: String,
    pub sleep_hours: Option<f64>,
    pub fit_to_work: Option<bool>,
    pub source: String,
}

impl From<&Attendance> for AttendanceExport {
    fn from(a: &Attendance) -> Self {
        Self {
            id: a.id,
            date: a.date.to_string(),
            time: a.time.format("%H:%M").to_string(),
            shift: a.shift.as_str().to_string(),
            nik: a.nik.clone(),
            name: a.employee_name.clone(),
            status: a.status.clone(),
            sleep_hours: a.sleep_hours,
            fit_to_work: a.fit_to_work,
            source: a.source.to_db_str().to_string(),
        }
    }
}

impl Exportable for AttendanceExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "id",
            "date",
            "time",
            "shift",
            "nik",
            "name",
            "status",
            "sleep_hours",
            "fit_to_work",
            "source",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.date.clone(),
            self.time.clone(),
            self.shift.clone(),
            self.nik.clone(),
            self.name.clone(),
            self.status.clone(),
            self.sleep_hours.map(|h| h.to_string()).unwrap_or_default(),
            self.fit_to_work.map(|f| yes_no(f).to_string()).unwrap_or_default(),
            self.source.clone(),
        ]
    }
}

/// One row per SIDAK session with its compliance figures.
#[derive(Serialize, Clone, Debug)]
pub struct SessionExport {
    pub id: i64,
    pub kind: String,
    pub date: String,
    pub time: String,
    pub shift: String,
    pub location: String,
    pub department: String,
    pub company: String,
    pub records: usize,
    pub compliant: usize,
    pub compliance_rate: f64,
    pub observers: usize,
    pub finished: bool,
}

impl From<&SessionDetail> for SessionExport {
    fn from(d: &SessionDetail) -> Self {
        let h = &d.session.header;
        Self {
            id: d.session.id,
            kind: d.session.kind.as_str().to_string(),
            date: h.date.to_string(),
            time: h.time.format("%H:%M").to_string(),
            shift: h.shift.as_str().to_string(),
            location: h.location.clone(),
            department: h.department.clone(),
            company: h.company.clone(),
            records: d.records.len(),
            compliant: d.compliant_count(),
            compliance_rate: (d.compliance_rate() * 10.0).round() / 10.0,
            observers: d.observers.len(),
            finished: d.session.is_finished(),
        }
    }
}

impl Exportable for SessionExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "id",
            "kind",
            "date",
            "time",
            "shift",
            "location",
            "department",
            "company",
            "records",
            "compliant",
            "compliance_rate",
            "observers",
            "finished",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.kind.clone(),
            self.date.clone(),
            self.time.clone(),
            self.shift.clone(),
            self.location.clone(),
            self.department.clone(),
            self.company.clone(),
            self.records.to_string(),
            self.compliant.to_string(),
            format!("{:.1}", self.compliance_rate),
            self.observers.to_string(),
            yes_no(self.finished).to_string(),
        ]
    }
}

/// One row per inspected person or unit, across sessions.
#[derive(Serialize, Clone, Debug)]
pub struct RecordExport {
    pub session_id: i64,
    pub kind: String,
    pub date: String,
    pub location: String,
    pub ordinal: i64,
    pub name: String,
    pub nik: String,
    pub company: String,
    pub compliant: bool,
    pub findings: String,
    pub remarks: String,
}

impl RecordExport {
    pub fn from_detail(d: &SessionDetail) -> Vec<Self> {
        let ctx = d.session.header.judge_context();
        d.records
            .iter()
            .map(|r: &Record| {
                let findings = r.input.checklist.findings(ctx);
                Self {
                    session_id: d.session.id,
                    kind: d.session.kind.as_str().to_string(),
                    date: d.session.header.date.to_string(),
                    location: d.session.header.location.clone(),
                    ordinal: r.ordinal,
                    name: r.input.name.clone(),
                    nik: opt(&r.input.nik),
                    company: opt(&r.input.company),
                    compliant: findings.is_empty(),
                    findings: findings.join("; "),
                    remarks: opt(&r.input.remarks),
                }
            })
            .collect()
    }
}

impl Exportable for RecordExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "session_id",
            "kind",
            "date",
            "location",
            "no",
            "name",
            "nik",
            "company",
            "compliant",
            "findings",
            "remarks",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.session_id.to_string(),
            self.kind.clone(),
            self.date.clone(),
            self.location.clone(),
            self.ordinal.to_string(),
            self.name.clone(),
            self.nik.clone(),
            self.company.clone(),
            yes_no(self.compliant).to_string(),
            self.findings.clone(),
            self.remarks.clone(),
        ]
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct MeetingAttendanceExport {
    pub id: i64,
    pub meeting_id: i64,
    pub nik: String,
    pub name: String,
    pub position: String,
    pub department: String,
    pub kind: String,
    pub scanned_at: String,
}

impl From<&MeetingAttendance> for MeetingAttendanceExport {
    fn from(a: &MeetingAttendance) -> Self {
        Self {
            id: a.id,
            meeting_id: a.meeting_id,
            nik: opt(&a.nik),
            name: a.name.clone(),
            position: opt(&a.position),
            department: opt(&a.department),
            kind: a.kind.clone(),
            scanned_at: a.scanned_at.clone(),
        }
    }
}

impl Exportable for MeetingAttendanceExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "id",
            "meeting_id",
            "nik",
            "name",
            "position",
            "department",
            "kind",
            "scanned_at",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.meeting_id.to_string(),
            self.nik.clone(),
            self.name.clone(),
            self.position.clone(),
            self.department.clone(),
            self.kind.clone(),
            self.scanned_at.clone(),
        ]
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct StatisticsExport {
    pub year: i32,
    pub month: String,
    pub days: u32,
    pub man_hours: f64,
    pub ti: u32,
    pub tifr: f64,
    pub fatigue: u32,
    pub fatigue_rate: f64,
    pub cifr_incidents: u32,
    pub cifr: f64,
}

impl StatisticsExport {
    pub fn from_month(year: i32, m: &MonthlyStat) -> Self {
        Self {
            year,
            month: month_abbr_id(m.month).to_string(),
            days: m.days,
            man_hours: m.man_hours,
            ti: m.ti,
            tifr: m.tifr,
            fatigue: m.fatigue,
            fatigue_rate: m.fatigue_rate,
            cifr_incidents: m.cifr_incidents,
            cifr: m.cifr,
        }
    }
}

impl Exportable for StatisticsExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "year",
            "month",
            "days",
            "man_hours",
            "ti",
            "tifr",
            "fatigue",
            "fatigue_rate",
            "cifr_incidents",
            "cifr",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.month.clone(),
            self.days.to_string(),
            format!("{:.0}", self.man_hours),
            self.ti.to_string(),
            format!("{:.2}", self.tifr),
            self.fatigue.to_string(),
            format!("{:.2}", self.fatigue_rate),
            self.cifr_incidents.to_string(),
            format!("{:.2}", self.cifr),
        ]
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct BlastExport {
    pub id: i64,
    pub batch_id: String,
    pub phone: String,
    pub recipient: String,
    pub status: String,
    pub error: String,
    pub sent_at: String,
}

impl From<&BlastLogEntry> for BlastExport {
    fn from(b: &BlastLogEntry) -> Self {
        Self {
            id: b.id,
            batch_id: b.batch_id.clone(),
            phone: b.phone.clone(),
            recipient: b.recipient.clone(),
            status: b.status.clone(),
            error: opt(&b.error),
            sent_at: b.sent_at.clone(),
        }
    }
}

impl Exportable for BlastExport {
    fn headers() -> Vec<&'static str> {
        vec![
            "id",
            "batch_id",
            "phone",
            "recipient",
            "status",
            "error",
            "sent_at",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.batch_id.clone(),
            self.phone.clone(),
            self.recipient.clone(),
            self.status.clone(),
            self.error.clone(),
            self.sent_at.clone(),
        ]
    }
}

pub(crate) fn to_table<T: Exportable>(items: &[T]) -> Vec<Vec<String>> {
    items.iter().map(Exportable::cells).collect()
}
