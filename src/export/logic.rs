use crate::config::Config;
use crate::core::sidak::SidakLogic;
use crate::core::statistics::StatisticsLogic;
use crate::db::attendance::list_between;
use crate::db::blast::list_blast_log;
use crate::db::employees::{EmployeeFilter, list_employees};
use crate::db::meetings::{get_meeting, list_attendance};
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{
    AttendanceExport, BlastExport, EmployeeExport, Exportable, MeetingAttendanceExport,
    RecordExport, SessionExport, StatisticsExport, to_table,
};
use crate::export::pdf_export::{export_pdf, export_session_report};
use crate::export::range::parse_range;
use crate::export::xlsx::export_xlsx;
use crate::export::{ExportFormat, ExportTarget};
use crate::models::sidak_kind::SidakKind;
use crate::ui::messages::warning;
use crate::utils::date::{month_abbr_id, today};
use chrono::{Datelike, NaiveDate};
use std::path::Path;

/// Everything an export run needs besides the database.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub target: ExportTarget,
    pub format: ExportFormat,
    pub file: String,
    pub range: Option<String>,
    pub kind: Option<SidakKind>,
    pub meeting: Option<i64>,
    pub force: bool,
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export one dataset to the requested format.
    ///
    /// `range` accepts `all` or
    ///   - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`
    ///   - `YYYY:YYYY`, `YYYY-MM:YYYY-MM`, `YYYY-MM-DD:YYYY-MM-DD`
    ///
    /// Returns the number of exported rows (0 when nothing matched and no
    /// file was written).
    pub fn export(pool: &DbPool, req: &ExportRequest) -> AppResult<usize> {
        let path = output_path(&req.file)?;

        let bounds: Option<(NaiveDate, NaiveDate)> = match req.range.as_deref() {
            None => None,
            Some(r) if r.eq_ignore_ascii_case("all") => None,
            Some(r) => Some(parse_range(r)?),
        };
        let (from, to) = bounds.unwrap_or((min_date(), max_date()));
        let title = build_pdf_title(req.target, req.range.as_deref());

        match req.target {
            ExportTarget::Employees => {
                if bounds.is_some() {
                    warning("--range does not apply to employees, exporting all.");
                }
                let filter = EmployeeFilter::default();
                let rows: Vec<EmployeeExport> = list_employees(&pool.conn, &filter)?
                    .iter()
                    .map(EmployeeExport::from)
                    .collect();
                write(&rows, req, path, &title)
            }
            ExportTarget::Attendance => {
                let rows: Vec<AttendanceExport> = list_between(&pool.conn, from, to)?
                    .iter()
                    .map(AttendanceExport::from)
                    .collect();
                write(&rows, req, path, &title)
            }
            ExportTarget::Sidak => {
                let rows: Vec<SessionExport> = SidakLogic::details_between(pool, req.kind, from, to)?
                    .iter()
                    .map(SessionExport::from)
                    .collect();
                write(&rows, req, path, &title)
            }
            ExportTarget::SidakRecords => {
                let rows: Vec<RecordExport> = SidakLogic::details_between(pool, req.kind, from, to)?
                    .iter()
                    .flat_map(RecordExport::from_detail)
                    .collect();
                write(&rows, req, path, &title)
            }
            ExportTarget::MeetingAttendance => {
                let id = req.meeting.ok_or_else(|| {
                    AppError::Validation("--meeting <ID> is required for meeting-attendance".into())
                })?;
                let meeting = get_meeting(&pool.conn, id)?;
                let rows: Vec<MeetingAttendanceExport> = list_attendance(&pool.conn, id)?
                    .iter()
                    .map(MeetingAttendanceExport::from)
                    .collect();
                let title = format!("Daftar hadir: {} ({})", meeting.title, meeting.date);
                write(&rows, req, path, &title)
            }
            ExportTarget::Statistics => {
                let year = bounds.map(|(f, _)| f.year()).unwrap_or_else(|| today().year());
                let report = StatisticsLogic::report(pool, year)?;
                let rows: Vec<StatisticsExport> = report
                    .months
                    .iter()
                    .map(|m| StatisticsExport::from_month(year, m))
                    .collect();
                let title = format!("Statistik keselamatan {year}");
                write(&rows, req, path, &title)
            }
            ExportTarget::Blast => {
                let rows: Vec<BlastExport> = list_blast_log(&pool.conn, None, i64::MAX)?
                    .iter()
                    .filter(|b| in_bounds(&b.sent_at, from, to))
                    .map(BlastExport::from)
                    .collect();
                write(&rows, req, path, &title)
            }
        }
    }

    /// PDF report of a single SIDAK session.
    pub fn session_report(
        pool: &DbPool,
        cfg: &Config,
        session_id: i64,
        file: &str,
        force: bool,
    ) -> AppResult<()> {
        let path = output_path(file)?;
        ensure_writable(path, force)?;
        let detail = SidakLogic::detail(pool, session_id)?;
        export_session_report(&detail, &cfg.company_name, path)
    }
}

fn output_path(file: &str) -> AppResult<&Path> {
    let path = Path::new(file);
    if !path.is_absolute() {
        return Err(AppError::Export(format!(
            "Output file path must be absolute: {file}"
        )));
    }
    Ok(path)
}

fn write<T: Exportable>(rows: &[T], req: &ExportRequest, path: &Path, title: &str) -> AppResult<usize> {
    if rows.is_empty() {
        warning("No data found for the selected range. Nothing to export.");
        return Ok(0);
    }

    ensure_writable(path, req.force)?;

    let headers = T::headers();
    match req.format {
        ExportFormat::Csv => export_csv(rows, path)?,
        ExportFormat::Json => export_json(rows, path)?,
        ExportFormat::Xlsx => export_xlsx(req.target.sheet_name(), &headers, &to_table(rows), path)?,
        ExportFormat::Pdf => export_pdf(title, &headers, &to_table(rows), path)?,
    }

    Ok(rows.len())
}

fn min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or_default()
}

fn max_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or_default()
}

/// True when the date prefix of a stored timestamp falls in `[from, to]`.
fn in_bounds(stamp: &str, from: NaiveDate, to: NaiveDate) -> bool {
    stamp
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .is_some_and(|d| d >= from && d <= to)
}

/// PDF title built from the dataset and the selected period.
fn build_pdf_title(target: ExportTarget, period: Option<&str>) -> String {
    let base = target.title();

    let Some(p) = period.filter(|p| !p.eq_ignore_ascii_case("all")) else {
        return base.to_string();
    };

    match p.len() {
        4 => format!("{base} tahun {p}"),
        7 => match p[5..7].parse::<u32>() {
            Ok(m) if (1..=12).contains(&m) => format!("{base} {} {}", month_abbr_id(m), &p[0..4]),
            _ => base.to_string(),
        },
        10 => format!("{base} tanggal {p}"),
        _ => match p.split_once(':') {
            Some((a, b)) => format!("{base} {a} s/d {b}"),
            None => base.to_string(),
        },
    }
}
