use serde::{Deserialize, Serialize};

/// Yearly safety statistics input, stored as one JSON payload per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsInput {
    pub manpower: [f64; 12],
    /// Overrides for the calendar length of each month; `None` uses the calendar.
    pub days_in_month: [Option<u32>; 12],
    pub leap_year: bool,
    pub hours_per_day: f64,
    pub factor_mh: f64,
    pub ti_incidents: [u32; 12],
    pub tr_value: f64,
    pub mode_ytd_tifr: bool,
    pub fatigue_incidents: [u32; 12],
    pub mode_ytd_fatigue: bool,
    pub menabrak: [u32; 12],
    pub rebah: [u32; 12],
    pub mode_ytd_cifr: bool,
}

impl Default for StatisticsInput {
    fn default() -> Self {
        Self {
            manpower: [100.0; 12],
            days_in_month: [None; 12],
            leap_year: false,
            hours_per_day: 11.0,
            factor_mh: 0.85,
            ti_incidents: [0; 12],
            tr_value: 6.42,
            mode_ytd_tifr: true,
            fatigue_incidents: [0; 12],
            mode_ytd_fatigue: true,
            menabrak: [0; 12],
            rebah: [0; 12],
            mode_ytd_cifr: true,
        }
    }
}

/// Which monthly incident series a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StatSeries {
    Manpower,
    Days,
    Ti,
    Fatigue,
    Menabrak,
    Rebah,
}

/// Computed figures for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStat {
    pub month: u32,
    pub days: u32,
    pub man_hours: f64,
    pub ti: u32,
    pub tifr: f64,
    pub fatigue: u32,
    pub fatigue_rate: f64,
    pub cifr_incidents: u32,
    pub cifr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub year: i32,
    pub months: Vec<MonthlyStat>,
    pub total_man_hours: f64,
    pub total_ti: u32,
    pub total_fatigue: u32,
    pub total_cifr_incidents: u32,
    /// Year-to-date TIFR over all twelve months.
    pub tifr_year: f64,
    pub tr_value: f64,
}
