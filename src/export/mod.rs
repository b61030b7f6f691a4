mod excel_date;
pub(crate) mod fs_utils;
mod json_csv;
pub mod logic;
pub mod model;
mod pdf;
mod pdf_export;
pub(crate) mod range;
mod xlsx;

pub use logic::{ExportLogic, ExportRequest};

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

/// Dataset selected by `export --what`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Employees,
    Attendance,
    /// One row per SIDAK session
    Sidak,
    /// One row per inspected person or unit
    SidakRecords,
    MeetingAttendance,
    Statistics,
    Blast,
}

impl ExportTarget {
    pub(crate) fn title(&self) -> &'static str {
        match self {
            ExportTarget::Employees => "Data karyawan",
            ExportTarget::Attendance => "Rekap absensi",
            ExportTarget::Sidak => "Rekap SIDAK",
            ExportTarget::SidakRecords => "Detail SIDAK",
            ExportTarget::MeetingAttendance => "Daftar hadir meeting",
            ExportTarget::Statistics => "Statistik keselamatan",
            ExportTarget::Blast => "Log WhatsApp blast",
        }
    }

    pub(crate) fn sheet_name(&self) -> &'static str {
        match self {
            ExportTarget::Employees => "Karyawan",
            ExportTarget::Attendance => "Absensi",
            ExportTarget::Sidak => "SIDAK",
            ExportTarget::SidakRecords => "Detail SIDAK",
            ExportTarget::MeetingAttendance => "Daftar Hadir",
            ExportTarget::Statistics => "Statistik",
            ExportTarget::Blast => "Blast",
        }
    }
}
