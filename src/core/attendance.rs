use crate::core::qr::decode_employee_qr;
use crate::db::attendance as queries;
use crate::db::employees;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{Attendance, AttendanceSource, FitnessCheck};
use crate::models::shift::{Shift, determine_shift_by_time, is_outside_all_shift_times, is_valid_shift_time};
use crate::utils::time::format_hhmm;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Attendance counts for one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub shift1: usize,
    pub shift2: usize,
    pub total: usize,
    pub active_employees: i64,
    pub absent: i64,
    pub unfit: usize,
}

pub struct AttendanceLogic;

impl AttendanceLogic {
    /// Record a check-in from a scanned employee QR payload.
    pub fn scan(
        pool: &mut DbPool,
        payload: &str,
        date: NaiveDate,
        time: NaiveTime,
        fitness: FitnessCheck,
    ) -> AppResult<Attendance> {
        let nik = decode_employee_qr(payload)?;
        Self::record(pool, &nik, date, time, fitness, AttendanceSource::QrScan)
    }

    /// Manual check-in by NIK, with the same rules as a scan.
    pub fn manual(
        pool: &mut DbPool,
        nik: &str,
        date: NaiveDate,
        time: NaiveTime,
        fitness: FitnessCheck,
    ) -> AppResult<Attendance> {
        Self::record(pool, nik.trim(), date, time, fitness, AttendanceSource::Manual)
    }

    fn record(
        pool: &mut DbPool,
        nik: &str,
        date: NaiveDate,
        time: NaiveTime,
        fitness: FitnessCheck,
        source: AttendanceSource,
    ) -> AppResult<Attendance> {
        let emp = employees::get_employee(&pool.conn, nik)?;
        if !emp.active {
            return Err(AppError::Validation(format!("employee {} is inactive", nik)));
        }

        if is_outside_all_shift_times(time) {
            return Err(AppError::InvalidShiftTime {
                time: format_hhmm(time),
                shift: format!("{} / {}", Shift::One.description(), Shift::Two.description()),
            });
        }

        let shift = match emp.shift {
            Some(scheduled) => {
                if !is_valid_shift_time(time, scheduled) {
                    return Err(AppError::InvalidShiftTime {
                        time: format_hhmm(time),
                        shift: scheduled.description(),
                    });
                }
                scheduled
            }
            None => determine_shift_by_time(time),
        };

        if let Some(h) = fitness.sleep_hours
            && !(0.0..=24.0).contains(&h)
        {
            return Err(AppError::Validation(format!("sleep hours out of range: {}", h)));
        }

        if queries::find_for_day(&pool.conn, nik, date)?.is_some() {
            return Err(AppError::Duplicate(format!("{} already checked in on {}", nik, date)));
        }

        let att = Attendance {
            id: 0,
            nik: nik.to_string(),
            employee_name: emp.name.clone(),
            date,
            time,
            shift,
            status: "present".to_string(),
            sleep_hours: fitness.sleep_hours,
            fit_to_work: fitness.fit_to_work,
            source,
            created_at: String::new(),
        };

        let id = queries::insert_attendance(&pool.conn, &att)?;
        ttlog_quiet(
            &pool.conn,
            "attendance",
            nik,
            &format!("{} {} {} ({})", date, format_hhmm(time), shift, source.to_db_str()),
        );

        Ok(Attendance { id, ..att })
    }

    pub fn list(pool: &DbPool, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Attendance>> {
        queries::list_between(&pool.conn, from, to)
    }

    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<()> {
        queries::delete_attendance(&pool.conn, id)?;
        ttlog_quiet(&pool.conn, "del", &format!("attendance #{}", id), "Attendance deleted");
        Ok(())
    }

    pub fn daily_summary(pool: &DbPool, date: NaiveDate) -> AppResult<DaySummary> {
        let rows = queries::list_between(&pool.conn, date, date)?;
        let shift1 = rows.iter().filter(|a| a.shift == Shift::One).count();
        let shift2 = rows.len() - shift1;
        let unfit = rows.iter().filter(|a| a.fit_to_work == Some(false)).count();
        let active = employees::count_active(&pool.conn)?;

        Ok(DaySummary {
            date,
            shift1,
            shift2,
            total: rows.len(),
            active_employees: active,
            absent: (active - rows.len() as i64).max(0),
            unfit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::test_pool;
    use crate::models::employee::Employee;

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn seed(pool: &DbPool, nik: &str, shift: Option<Shift>, active: bool) {
        let e = Employee {
            nik: nik.into(),
            name: format!("Emp {nik}"),
            position: "Driver".into(),
            department: "Hauling".into(),
            company: "GECL".into(),
            phone: None,
            shift,
            sim_expiry: None,
            simper_bib_expiry: None,
            simper_tia_expiry: None,
            active,
            created_at: String::new(),
        };
        employees::insert_employee(&pool.conn, &e).unwrap();
    }

    #[test]
    fn scan_derives_shift_from_time() {
        let mut pool = test_pool();
        seed(&pool, "C-1", None, true);

        let a = AttendanceLogic::scan(
            &mut pool,
            "https://hse.gecl.local/driver-view?nik=C-1",
            d(),
            t("17:45"),
            FitnessCheck::default(),
        )
        .unwrap();
        assert_eq!(a.shift, Shift::Two);
        assert_eq!(a.source, AttendanceSource::QrScan);
        assert!(a.id > 0);
    }

    #[test]
    fn rejects_time_outside_windows_and_wrong_shift() {
        let mut pool = test_pool();
        seed(&pool, "C-2", Some(Shift::One), true);

        let err = AttendanceLogic::manual(&mut pool, "C-2", d(), t("12:00"), FitnessCheck::default())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidShiftTime { .. }));

        let err = AttendanceLogic::manual(&mut pool, "C-2", d(), t("16:30"), FitnessCheck::default())
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidShiftTime { .. }));

        assert!(AttendanceLogic::manual(&mut pool, "C-2", d(), t("10:00"), FitnessCheck::default()).is_ok());
    }

    #[test]
    fn one_check_in_per_day() {
        let mut pool = test_pool();
        seed(&pool, "C-3", None, true);
        AttendanceLogic::manual(&mut pool, "C-3", d(), t("05:00"), FitnessCheck::default()).unwrap();
        let err = AttendanceLogic::manual(&mut pool, "C-3", d(), t("06:00"), FitnessCheck::default())
            .unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));
    }

    #[test]
    fn inactive_and_unknown_employees_are_refused() {
        let mut pool = test_pool();
        seed(&pool, "C-4", None, false);
        assert!(matches!(
            AttendanceLogic::manual(&mut pool, "C-4", d(), t("05:00"), FitnessCheck::default()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            AttendanceLogic::manual(&mut pool, "C-404", d(), t("05:00"), FitnessCheck::default()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn summary_counts_per_shift() {
        let mut pool = test_pool();
        seed(&pool, "A", None, true);
        seed(&pool, "B", None, true);
        seed(&pool, "C", None, true);
        AttendanceLogic::manual(&mut pool, "A", d(), t("05:00"), FitnessCheck::default()).unwrap();
        let unfit = FitnessCheck {
            sleep_hours: Some(4.0),
            fit_to_work: Some(false),
        };
        AttendanceLogic::manual(&mut pool, "B", d(), t("18:00"), unfit).unwrap();

        let s = AttendanceLogic::daily_summary(&pool, d()).unwrap();
        assert_eq!((s.shift1, s.shift2, s.total), (1, 1, 2));
        assert_eq!(s.absent, 1);
        assert_eq!(s.unfit, 1);
    }
}
