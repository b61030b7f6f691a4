use crate::core::attendance::{AttendanceLogic, DaySummary};
use crate::core::meeting::MeetingLogic;
use crate::core::sidak::SidakLogic;
use crate::db::employees::{self, EmployeeFilter};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::expiry::ExpiryLevel;
use crate::models::meeting::Meeting;
use crate::models::sidak_kind::SidakKind;
use crate::utils::date::month_bounds;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct KindStat {
    pub kind: SidakKind,
    pub sessions: usize,
    pub records: usize,
    pub compliant: usize,
    pub compliance_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub active_employees: i64,
    /// Worst licence level per active employee.
    pub license_levels: BTreeMap<ExpiryLevel, usize>,
    pub attendance: DaySummary,
    pub sidak_month: Vec<KindStat>,
    pub upcoming_meetings: Vec<Meeting>,
}

pub struct DashboardLogic;

impl DashboardLogic {
    pub fn build(pool: &DbPool, today: NaiveDate) -> AppResult<Dashboard> {
        let filter = EmployeeFilter {
            active_only: true,
            ..Default::default()
        };
        let active = employees::list_employees(&pool.conn, &filter)?;

        let mut license_levels = BTreeMap::new();
        for e in &active {
            *license_levels.entry(e.worst_license_level(today)).or_insert(0) += 1;
        }

        let (first, last) = month_bounds(today);
        let details = SidakLogic::details_between(pool, None, first, last)?;
        let sidak_month = SidakKind::ALL
            .iter()
            .filter_map(|kind| {
                let of_kind: Vec<_> = details.iter().filter(|d| d.session.kind == *kind).collect();
                if of_kind.is_empty() {
                    return None;
                }
                let records: usize = of_kind.iter().map(|d| d.records.len()).sum();
                let compliant: usize = of_kind.iter().map(|d| d.compliant_count()).sum();
                Some(KindStat {
                    kind: *kind,
                    sessions: of_kind.len(),
                    records,
                    compliant,
                    compliance_rate: if records == 0 {
                        100.0
                    } else {
                        compliant as f64 * 100.0 / records as f64
                    },
                })
            })
            .collect();

        let upcoming_meetings = MeetingLogic::list(pool, Some(today))?
            .into_iter()
            .filter(|m| m.status.accepts_attendance())
            .take(5)
            .collect();

        Ok(Dashboard {
            date: today,
            active_employees: active.len() as i64,
            license_levels,
            attendance: AttendanceLogic::daily_summary(pool, today)?,
            sidak_month,
            upcoming_meetings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::test_pool;

    #[test]
    fn empty_database_gives_zeroes() {
        let pool = test_pool();
        let d = DashboardLogic::build(&pool, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()).unwrap();
        assert_eq!(d.active_employees, 0);
        assert_eq!(d.attendance.total, 0);
        assert!(d.sidak_month.is_empty());
        assert!(d.upcoming_meetings.is_empty());
    }
}
