use crate::config::Config;
use crate::db::employees::{self, EmployeeFilter};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, EmployeeInput, LicenseKind};
use crate::models::expiry::ExpiryStatus;
use crate::models::shift::Shift;
use crate::utils::date::require_date;
use chrono::NaiveDate;
use std::path::Path;

/// Outcome of one CSV row.
#[derive(Debug, Clone)]
pub struct ImportRow {
    pub line: usize,
    pub nik: String,
    pub result: Result<ImportAction, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    Created,
    Updated,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub rows: Vec<ImportRow>,
}

impl ImportReport {
    pub fn created(&self) -> usize {
        self.count(ImportAction::Created)
    }

    pub fn updated(&self) -> usize {
        self.count(ImportAction::Updated)
    }

    pub fn failed(&self) -> usize {
        self.rows.iter().filter(|r| r.result.is_err()).count()
    }

    fn count(&self, action: ImportAction) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.result, Ok(a) if a == action))
            .count()
    }
}

/// One licence that needs attention.
#[derive(Debug, Clone)]
pub struct ExpiryEntry {
    pub employee: Employee,
    pub license: LicenseKind,
    pub status: ExpiryStatus,
}

fn clean(v: &Option<String>) -> Option<String> {
    v.as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_opt_date(v: &Option<String>) -> AppResult<Option<NaiveDate>> {
    match clean(v) {
        Some(s) => Ok(Some(require_date(&s)?)),
        None => Ok(None),
    }
}

/// Merge `input` over `base`. Fields absent from `input` keep their old value.
fn merge(base: Employee, input: &EmployeeInput) -> AppResult<Employee> {
    let shift = match clean(&input.shift) {
        Some(s) => Some(Shift::parse(&s).ok_or(AppError::InvalidShift(s))?),
        None => base.shift,
    };

    let merged = Employee {
        name: clean(&input.name).unwrap_or(base.name),
        position: clean(&input.position).unwrap_or(base.position),
        department: clean(&input.department).unwrap_or(base.department),
        company: clean(&input.company).unwrap_or(base.company),
        phone: clean(&input.phone).or(base.phone),
        shift,
        sim_expiry: parse_opt_date(&input.sim_expiry)?.or(base.sim_expiry),
        simper_bib_expiry: parse_opt_date(&input.simper_bib_expiry)?.or(base.simper_bib_expiry),
        simper_tia_expiry: parse_opt_date(&input.simper_tia_expiry)?.or(base.simper_tia_expiry),
        ..base
    };

    if merged.name.is_empty() {
        return Err(AppError::Validation("employee name is required".into()));
    }
    Ok(merged)
}

fn blank(nik: &str, cfg: &Config) -> Employee {
    Employee {
        nik: nik.to_string(),
        name: String::new(),
        position: String::new(),
        department: cfg.default_department.clone(),
        company: cfg.company_name.clone(),
        phone: None,
        shift: None,
        sim_expiry: None,
        simper_bib_expiry: None,
        simper_tia_expiry: None,
        active: true,
        created_at: String::new(),
    }
}

pub struct EmployeeLogic;

impl EmployeeLogic {
    pub fn add(pool: &mut DbPool, cfg: &Config, input: &EmployeeInput) -> AppResult<Employee> {
        let nik = input.nik.trim();
        if nik.is_empty() {
            return Err(AppError::Validation("NIK is required".into()));
        }
        if employees::find_employee(&pool.conn, nik)?.is_some() {
            return Err(AppError::Duplicate(format!("employee {}", nik)));
        }

        let emp = merge(blank(nik, cfg), input)?;
        employees::insert_employee(&pool.conn, &emp)?;
        ttlog_quiet(&pool.conn, "add", &format!("employee {}", nik), &emp.name);

        employees::get_employee(&pool.conn, nik)
    }

    pub fn update(pool: &mut DbPool, input: &EmployeeInput) -> AppResult<Employee> {
        let current = employees::get_employee(&pool.conn, input.nik.trim())?;
        let emp = merge(current, input)?;
        employees::update_employee(&pool.conn, &emp)?;
        ttlog_quiet(&pool.conn, "edit", &format!("employee {}", emp.nik), "Employee updated");
        Ok(emp)
    }

    pub fn show(pool: &DbPool, nik: &str) -> AppResult<Employee> {
        employees::get_employee(&pool.conn, nik)
    }

    pub fn list(pool: &DbPool, filter: &EmployeeFilter) -> AppResult<Vec<Employee>> {
        employees::list_employees(&pool.conn, filter)
    }

    pub fn set_active(pool: &mut DbPool, nik: &str, active: bool) -> AppResult<()> {
        employees::set_active(&pool.conn, nik, active)?;
        let msg = if active { "Employee activated" } else { "Employee deactivated" };
        ttlog_quiet(&pool.conn, "edit", &format!("employee {}", nik), msg);
        Ok(())
    }

    pub fn delete(pool: &mut DbPool, nik: &str) -> AppResult<()> {
        employees::delete_employee(&pool.conn, nik)?;
        ttlog_quiet(&pool.conn, "del", &format!("employee {}", nik), "Employee deleted");
        Ok(())
    }

    /// Import employees from a CSV file with a header row. Existing NIKs are
    /// updated, new ones created. Every row is reported on its own.
    pub fn import_csv(pool: &mut DbPool, cfg: &Config, path: &Path) -> AppResult<ImportReport> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut report = ImportReport::default();

        for (idx, row) in reader.deserialize::<EmployeeInput>().enumerate() {
            // header is line 1
            let line = idx + 2;
            let (nik, result) = match row {
                Ok(input) => {
                    let nik = input.nik.trim().to_string();
                    (nik, Self::upsert(pool, cfg, &input))
                }
                Err(e) => (String::new(), Err(e.to_string())),
            };
            report.rows.push(ImportRow { line, nik, result });
        }

        ttlog_quiet(
            &pool.conn,
            "import",
            &path.to_string_lossy(),
            &format!(
                "Employees imported: {} created, {} updated, {} failed",
                report.created(),
                report.updated(),
                report.failed()
            ),
        );

        Ok(report)
    }

    fn upsert(pool: &mut DbPool, cfg: &Config, input: &EmployeeInput) -> Result<ImportAction, String> {
        let nik = input.nik.trim();
        if nik.is_empty() {
            return Err("missing NIK".into());
        }

        let existing = employees::find_employee(&pool.conn, nik).map_err(|e| e.to_string())?;
        match existing {
            Some(current) => {
                let emp = merge(current, input).map_err(|e| e.to_string())?;
                employees::update_employee(&pool.conn, &emp).map_err(|e| e.to_string())?;
                Ok(ImportAction::Updated)
            }
            None => {
                let emp = merge(blank(nik, cfg), input).map_err(|e| e.to_string())?;
                employees::insert_employee(&pool.conn, &emp).map_err(|e| e.to_string())?;
                Ok(ImportAction::Created)
            }
        }
    }

    /// Active employees' licences that are expired or expire within
    /// `within_days`, most urgent first. Missing dates are not reported.
    pub fn expiry_report(pool: &DbPool, today: NaiveDate, within_days: i64) -> AppResult<Vec<ExpiryEntry>> {
        let filter = EmployeeFilter {
            active_only: true,
            ..Default::default()
        };

        let mut out = Vec::new();
        for emp in employees::list_employees(&pool.conn, &filter)? {
            for (license, status) in emp.license_statuses(today) {
                if matches!(status.days_left, Some(d) if d <= within_days) {
                    out.push(ExpiryEntry {
                        employee: emp.clone(),
                        license,
                        status,
                    });
                }
            }
        }

        out.sort_by_key(|e| e.status.days_left);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::test_pool;
    use std::path::PathBuf;

    fn cfg() -> Config {
        Config::with_database(PathBuf::from("/tmp/unused.sqlite"))
    }

    fn input(nik: &str, name: &str) -> EmployeeInput {
        EmployeeInput {
            nik: nik.into(),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[test]
    fn add_fills_defaults_and_rejects_duplicates() {
        let mut pool = test_pool();
        let e = EmployeeLogic::add(&mut pool, &cfg(), &input("C-1", "Budi")).unwrap();
        assert_eq!(e.department, "HSE");
        assert!(e.active);

        let err = EmployeeLogic::add(&mut pool, &cfg(), &input("C-1", "Budi")).unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
    }

    #[test]
    fn update_is_partial() {
        let mut pool = test_pool();
        let mut first = input("C-2", "Sari");
        first.position = Some("Operator".into());
        EmployeeLogic::add(&mut pool, &cfg(), &first).unwrap();

        let patch = EmployeeInput {
            nik: "C-2".into(),
            shift: Some("2".into()),
            simper_bib_expiry: Some("2027-03-01".into()),
            ..Default::default()
        };
        let e = EmployeeLogic::update(&mut pool, &patch).unwrap();
        assert_eq!(e.name, "Sari");
        assert_eq!(e.position, "Operator");
        assert_eq!(e.shift, Some(Shift::Two));
        assert_eq!(e.simper_bib_expiry, NaiveDate::from_ymd_opt(2027, 3, 1));
    }

    #[test]
    fn update_rejects_bad_date() {
        let mut pool = test_pool();
        EmployeeLogic::add(&mut pool, &cfg(), &input("C-3", "Andi")).unwrap();
        let patch = EmployeeInput {
            nik: "C-3".into(),
            sim_expiry: Some("31/12/2026".into()),
            ..Default::default()
        };
        assert!(matches!(
            EmployeeLogic::update(&mut pool, &patch),
            Err(AppError::InvalidDate(_))
        ));
    }

    #[test]
    fn import_reports_each_row() {
        let mut pool = test_pool();
        EmployeeLogic::add(&mut pool, &cfg(), &input("C-10", "Lama")).unwrap();

        let dir = std::env::temp_dir().join("rhse_import_unit");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("emp.csv");
        std::fs::write(
            &path,
            "nik,name,department,shift,simper_bib_expiry\n\
             C-10,Baru,Hauling,1,2027-01-01\n\
             C-11,Dewi,Mining,,\n\
             C-12,Eko,Mining,shift 9,\n",
        )
        .unwrap();

        let report = EmployeeLogic::import_csv(&mut pool, &cfg(), &path).unwrap();
        assert_eq!(report.updated(), 1);
        assert_eq!(report.created(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.rows[2].line, 4);

        let e = EmployeeLogic::show(&pool, "C-10").unwrap();
        assert_eq!(e.name, "Baru");
        assert_eq!(e.department, "Hauling");
    }

    #[test]
    fn expiry_report_sorts_by_urgency() {
        let mut pool = test_pool();
        let mut a = input("C-20", "A");
        a.sim_expiry = Some("2026-01-20".into());
        let mut b = input("C-21", "B");
        b.simper_tia_expiry = Some("2025-12-25".into());
        let mut c = input("C-22", "C");
        c.simper_bib_expiry = Some("2027-06-01".into());
        for i in [a, b, c] {
            EmployeeLogic::add(&mut pool, &cfg(), &i).unwrap();
        }

        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let report = EmployeeLogic::expiry_report(&pool, today, 30).unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report[0].employee.nik, "C-21");
        assert_eq!(report[0].status.days_left, Some(-7));
        assert_eq!(report[1].license, LicenseKind::Sim);
    }
}
