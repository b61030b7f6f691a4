use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dashboard::DashboardLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::expiry::ExpiryLevel;
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_rate};
use crate::utils::date::{date_or_today, format_date_id};
use crate::utils::formatting::rate_id;
use crate::utils::time::format_hhmm;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Dashboard { date, json } = cmd else {
        return Ok(());
    };

    let pool = open_db(&cfg.database)?;
    let d = DashboardLogic::build(&pool, date_or_today(date.as_ref())?)?;

    if *json {
        println!("{}", serde_json::to_string_pretty(&d)?);
        return Ok(());
    }

    header(format!("{} | {}", cfg.company_name, format_date_id(d.date)));

    println!("Karyawan aktif : {}", d.active_employees);
    for level in [
        ExpiryLevel::Expired,
        ExpiryLevel::Kritis,
        ExpiryLevel::Warning,
        ExpiryLevel::Aktif,
        ExpiryLevel::Nodata,
    ] {
        let n = d.license_levels.get(&level).copied().unwrap_or(0);
        println!("  {}{:<10}{} {}", level.color(), level.label(), RESET, n);
    }

    let a = &d.attendance;
    println!(
        "\nAbsensi        : {} hadir (Shift 1: {}, Shift 2: {}), {} belum hadir",
        a.total, a.shift1, a.shift2, a.absent
    );
    if a.unfit > 0 {
        println!("Tidak fit      : {}", a.unfit);
    }

    println!("\nSIDAK bulan ini:");
    if d.sidak_month.is_empty() {
        println!("  -");
    }
    for k in &d.sidak_month {
        println!(
            "  {:<10} {:>3} sesi {:>4} sampel  {}{}%{}",
            k.kind.as_str(),
            k.sessions,
            k.records,
            color_for_rate(k.compliance_rate),
            rate_id(k.compliance_rate),
            RESET
        );
    }

    println!("\nMeeting terdekat:");
    if d.upcoming_meetings.is_empty() {
        println!("  -");
    }
    for m in &d.upcoming_meetings {
        println!(
            "  #{} {} {} {}",
            m.id,
            m.date,
            format_hhmm(m.start_time),
            m.title
        );
    }

    Ok(())
}
