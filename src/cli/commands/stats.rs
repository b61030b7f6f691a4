use crate::cli::parser::{Commands, StatsCmd};
use crate::config::Config;
use crate::core::statistics::{StatParams, StatisticsLogic};
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::statistics::StatisticsReport;
use crate::ui::messages::{header, success};
use crate::utils::date::{month_abbr_id, today};
use crate::utils::table::Table;
use chrono::Datelike;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Stats { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;

    match action {
        StatsCmd::Show { year, json } => {
            let year = year.unwrap_or_else(|| today().year());
            let report = StatisticsLogic::report(&pool, year)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, cfg.separator());
            }
        }
        StatsCmd::Set {
            year,
            series,
            month,
            value,
        } => {
            StatisticsLogic::set_value(&mut pool, *year, *series, *month, *value)?;
            success(format!(
                "{:?} {} {} set to {}.",
                series,
                month_abbr_id(*month),
                year,
                value
            ));
        }
        StatsCmd::Params {
            year,
            leap_year,
            hours_per_day,
            factor_mh,
            tr_value,
            ytd_tifr,
            ytd_fatigue,
            ytd_cifr,
        } => {
            let params = StatParams {
                leap_year: *leap_year,
                hours_per_day: *hours_per_day,
                factor_mh: *factor_mh,
                tr_value: *tr_value,
                mode_ytd_tifr: *ytd_tifr,
                mode_ytd_fatigue: *ytd_fatigue,
                mode_ytd_cifr: *ytd_cifr,
            };
            let input = StatisticsLogic::set_params(&mut pool, *year, &params)?;
            success(format!(
                "Parameters {}: {} h/day, factor {}, TR {}, leap year {}.",
                year, input.hours_per_day, input.factor_mh, input.tr_value, input.leap_year
            ));
        }
    }

    Ok(())
}

fn print_report(r: &StatisticsReport, sep: char) {
    header(format!("Statistik keselamatan {}", r.year));

    let mut table = Table::new(
        &["Bulan", "Hari", "Man hours", "TI", "TIFR", "Fatigue", "Rate", "CI", "CIFR"],
        sep,
    );
    for m in &r.months {
        table.add_row(vec![
            month_abbr_id(m.month).to_string(),
            m.days.to_string(),
            format!("{:.0}", m.man_hours),
            m.ti.to_string(),
            format!("{:.2}", m.tifr),
            m.fatigue.to_string(),
            format!("{:.2}", m.fatigue_rate),
            m.cifr_incidents.to_string(),
            format!("{:.2}", m.cifr),
        ]);
    }
    table.add_row(vec![
        "Total".into(),
        String::new(),
        format!("{:.0}", r.total_man_hours),
        r.total_ti.to_string(),
        format!("{:.2}", r.tifr_year),
        r.total_fatigue.to_string(),
        String::new(),
        r.total_cifr_incidents.to_string(),
        String::new(),
    ]);
    print!("{}", table.render());
    println!("\nTarget TR: {:.2}", r.tr_value);
}
