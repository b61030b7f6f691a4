//! TIFR / fatigue / CIFR rates from monthly man-hours and incidents.

use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::statistics as queries;
use crate::errors::{AppError, AppResult};
use crate::models::statistics::{MonthlyStat, StatSeries, StatisticsInput, StatisticsReport};

const RATE_BASE: f64 = 1_000_000.0;
const CALENDAR_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Tunable parameters of a year.
#[derive(Debug, Clone, Default)]
pub struct StatParams {
    pub leap_year: Option<bool>,
    pub hours_per_day: Option<f64>,
    pub factor_mh: Option<f64>,
    pub tr_value: Option<f64>,
    pub mode_ytd_tifr: Option<bool>,
    pub mode_ytd_fatigue: Option<bool>,
    pub mode_ytd_cifr: Option<bool>,
}

fn rate(incidents: f64, man_hours: f64) -> f64 {
    if man_hours <= 0.0 {
        0.0
    } else {
        incidents * RATE_BASE / man_hours
    }
}

/// Monthly or year-to-date rate series for one incident array.
fn series(incidents: &[u32; 12], man_hours: &[f64; 12], ytd: bool) -> [f64; 12] {
    let mut out = [0.0; 12];
    let mut cum_inc = 0.0;
    let mut cum_mh = 0.0;
    for m in 0..12 {
        cum_inc += incidents[m] as f64;
        cum_mh += man_hours[m];
        out[m] = if ytd {
            rate(cum_inc, cum_mh)
        } else {
            rate(incidents[m] as f64, man_hours[m])
        };
    }
    out
}

/// February always follows `leap_year`; other months may be overridden.
pub fn days_in_month(input: &StatisticsInput, month_idx: usize) -> u32 {
    if month_idx == 1 {
        return if input.leap_year { 29 } else { 28 };
    }
    match input.days_in_month.get(month_idx) {
        Some(Some(d)) => *d,
        _ => CALENDAR_DAYS[month_idx],
    }
}

pub fn calculate(year: i32, input: &StatisticsInput) -> StatisticsReport {
    let mut days = [0u32; 12];
    let mut man_hours = [0.0; 12];
    let mut cifr_inc = [0u32; 12];

    for m in 0..12 {
        days[m] = days_in_month(input, m);
        man_hours[m] = input.manpower[m] * input.hours_per_day * days[m] as f64 * input.factor_mh;
        cifr_inc[m] = input.menabrak[m] + input.rebah[m];
    }

    let tifr = series(&input.ti_incidents, &man_hours, input.mode_ytd_tifr);
    let fatigue = series(&input.fatigue_incidents, &man_hours, input.mode_ytd_fatigue);
    let cifr = series(&cifr_inc, &man_hours, input.mode_ytd_cifr);

    let months = (0..12)
        .map(|m| MonthlyStat {
            month: m as u32 + 1,
            days: days[m],
            man_hours: man_hours[m],
            ti: input.ti_incidents[m],
            tifr: tifr[m],
            fatigue: input.fatigue_incidents[m],
            fatigue_rate: fatigue[m],
            cifr_incidents: cifr_inc[m],
            cifr: cifr[m],
        })
        .collect();

    let total_man_hours: f64 = man_hours.iter().sum();
    let total_ti: u32 = input.ti_incidents.iter().sum();

    StatisticsReport {
        year,
        months,
        total_man_hours,
        total_ti,
        total_fatigue: input.fatigue_incidents.iter().sum(),
        total_cifr_incidents: cifr_inc.iter().sum(),
        tifr_year: rate(total_ti as f64, total_man_hours),
        tr_value: input.tr_value,
    }
}

pub struct StatisticsLogic;

impl StatisticsLogic {
    /// Saved input for `year`, or the defaults.
    pub fn load(pool: &DbPool, year: i32) -> AppResult<StatisticsInput> {
        Ok(queries::load_statistics(&pool.conn, year)?.unwrap_or_default())
    }

    pub fn report(pool: &DbPool, year: i32) -> AppResult<StatisticsReport> {
        Ok(calculate(year, &Self::load(pool, year)?))
    }

    /// Set one monthly value (month is 1-based).
    pub fn set_value(pool: &mut DbPool, year: i32, series: StatSeries, month: u32, value: f64) -> AppResult<StatisticsInput> {
        if !(1..=12).contains(&month) {
            return Err(AppError::Validation(format!("month must be 1..12, got {}", month)));
        }
        if value < 0.0 || !value.is_finite() {
            return Err(AppError::Validation(format!("value must be a non-negative number, got {}", value)));
        }

        if series != StatSeries::Manpower && value.fract() != 0.0 {
            return Err(AppError::Validation(format!("{:?} must be a whole number, got {}", series, value)));
        }

        let idx = (month - 1) as usize;
        let mut input = Self::load(pool, year)?;
        let count = value as u32;

        match series {
            StatSeries::Manpower => input.manpower[idx] = value,
            StatSeries::Days => {
                if month == 2 {
                    return Err(AppError::Validation(
                        "February days follow the leap year setting (stats params --leap-year)".into(),
                    ));
                }
                if !(1..=31).contains(&count) {
                    return Err(AppError::Validation("days must be 1..31".into()));
                }
                input.days_in_month[idx] = Some(count);
            }
            StatSeries::Ti => input.ti_incidents[idx] = count,
            StatSeries::Fatigue => input.fatigue_incidents[idx] = count,
            StatSeries::Menabrak => input.menabrak[idx] = count,
            StatSeries::Rebah => input.rebah[idx] = count,
        }

        queries::save_statistics(&pool.conn, year, &input)?;
        ttlog_quiet(
            &pool.conn,
            "stats",
            &year.to_string(),
            &format!("{:?} month {} = {}", series, month, value),
        );
        Ok(input)
    }

    pub fn set_params(pool: &mut DbPool, year: i32, p: &StatParams) -> AppResult<StatisticsInput> {
        let mut input = Self::load(pool, year)?;

        for (name, v) in [("hours_per_day", p.hours_per_day), ("factor_mh", p.factor_mh), ("tr_value", p.tr_value)] {
            if let Some(v) = v
                && (v < 0.0 || !v.is_finite())
            {
                return Err(AppError::Validation(format!("{} must be non-negative", name)));
            }
        }

        if let Some(v) = p.leap_year {
            input.leap_year = v;
        }
        if let Some(v) = p.hours_per_day {
            input.hours_per_day = v;
        }
        if let Some(v) = p.factor_mh {
            input.factor_mh = v;
        }
        if let Some(v) = p.tr_value {
            input.tr_value = v;
        }
        if let Some(v) = p.mode_ytd_tifr {
            input.mode_ytd_tifr = v;
        }
        if let Some(v) = p.mode_ytd_fatigue {
            input.mode_ytd_fatigue = v;
        }
        if let Some(v) = p.mode_ytd_cifr {
            input.mode_ytd_cifr = v;
        }

        queries::save_statistics(&pool.conn, year, &input)?;
        ttlog_quiet(&pool.conn, "stats", &year.to_string(), "Parameters updated");
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::test_pool;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn man_hours_follow_the_formula() {
        let input = StatisticsInput::default();
        let r = calculate(2026, &input);
        // 100 × 11 × 31 × 0.85
        assert!(close(r.months[0].man_hours, 28_985.0));
        // February, not a leap year
        assert!(close(r.months[1].man_hours, 100.0 * 11.0 * 28.0 * 0.85));

        let leap = StatisticsInput {
            leap_year: true,
            ..Default::default()
        };
        assert_eq!(calculate(2028, &leap).months[1].days, 29);
    }

    #[test]
    fn monthly_and_ytd_rates() {
        let mut input = StatisticsInput {
            mode_ytd_tifr: false,
            ..Default::default()
        };
        input.ti_incidents[0] = 1;
        let r = calculate(2026, &input);
        assert!(close(r.months[0].tifr, 1_000_000.0 / 28_985.0));
        assert!(close(r.months[1].tifr, 0.0));

        input.mode_ytd_tifr = true;
        let r = calculate(2026, &input);
        let cum = 28_985.0 + 100.0 * 11.0 * 28.0 * 0.85;
        assert!(close(r.months[1].tifr, 1_000_000.0 / cum));
    }

    #[test]
    fn cifr_adds_both_incident_kinds_and_zero_mh_is_zero() {
        let mut input = StatisticsInput::default();
        input.menabrak[2] = 2;
        input.rebah[2] = 1;
        input.manpower = [0.0; 12];
        let r = calculate(2026, &input);
        assert_eq!(r.months[2].cifr_incidents, 3);
        assert_eq!(r.months[2].cifr, 0.0);
        assert_eq!(r.tifr_year, 0.0);
    }

    #[test]
    fn values_and_params_persist() {
        let mut pool = test_pool();
        StatisticsLogic::set_value(&mut pool, 2026, StatSeries::Manpower, 3, 250.0).unwrap();
        StatisticsLogic::set_value(&mut pool, 2026, StatSeries::Ti, 3, 2.0).unwrap();
        StatisticsLogic::set_params(
            &mut pool,
            2026,
            &StatParams {
                hours_per_day: Some(12.0),
                mode_ytd_tifr: Some(false),
                ..Default::default()
            },
        )
        .unwrap();

        let input = StatisticsLogic::load(&pool, 2026).unwrap();
        assert_eq!(input.manpower[2], 250.0);
        assert_eq!(input.ti_incidents[2], 2);
        assert_eq!(input.hours_per_day, 12.0);
        assert!(!input.mode_ytd_tifr);
        assert_eq!(StatisticsLogic::load(&pool, 2025).unwrap(), StatisticsInput::default());

        assert!(StatisticsLogic::set_value(&mut pool, 2026, StatSeries::Ti, 13, 1.0).is_err());
    }

    #[test]
    fn february_ignores_stored_day_override() {
        let mut input = StatisticsInput::default();
        input.days_in_month[1] = Some(30);
        input.days_in_month[3] = Some(25);
        let r = calculate(2026, &input);
        assert_eq!(r.months[1].days, 28);
        assert_eq!(r.months[3].days, 25);

        input.leap_year = true;
        assert_eq!(calculate(2028, &input).months[1].days, 29);

        let mut pool = test_pool();
        assert!(StatisticsLogic::set_value(&mut pool, 2026, StatSeries::Days, 2, 30.0).is_err());
        StatisticsLogic::set_value(&mut pool, 2026, StatSeries::Days, 4, 25.0).unwrap();
    }

    #[test]
    fn fractional_incident_counts_are_rejected() {
        let mut pool = test_pool();
        assert!(StatisticsLogic::set_value(&mut pool, 2026, StatSeries::Ti, 1, 1.5).is_err());
        assert!(StatisticsLogic::set_value(&mut pool, 2026, StatSeries::Rebah, 1, 0.2).is_err());
        StatisticsLogic::set_value(&mut pool, 2026, StatSeries::Manpower, 1, 120.5).unwrap();
        assert_eq!(StatisticsLogic::load(&pool, 2026).unwrap().ti_incidents[0], 0);
    }
}
