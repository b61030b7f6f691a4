use crate::cli::parser::{AttendanceCmd, Commands, FitnessArgs};
use crate::config::Config;
use crate::core::attendance::AttendanceLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::export::range::parse_range;
use crate::models::attendance::{Attendance, FitnessCheck};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date::{date_or_today, format_date_id};
use crate::utils::formatting::truncate;
use crate::utils::table::Table;
use crate::utils::time::{format_hhmm, time_or_now};

impl From<&FitnessArgs> for FitnessCheck {
    fn from(a: &FitnessArgs) -> Self {
        let fit_to_work = if a.fit {
            Some(true)
        } else if a.unfit {
            Some(false)
        } else {
            None
        };
        FitnessCheck {
            sleep_hours: a.sleep_hours,
            fit_to_work,
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Attendance { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;

    match action {
        AttendanceCmd::Scan {
            payload,
            date,
            time,
            fitness,
        } => {
            let att = AttendanceLogic::scan(
                &mut pool,
                payload,
                date_or_today(date.as_ref())?,
                time_or_now(time.as_ref())?,
                fitness.into(),
            )?;
            report_checkin(&att);
        }
        AttendanceCmd::Manual {
            nik,
            date,
            time,
            fitness,
        } => {
            let att = AttendanceLogic::manual(
                &mut pool,
                nik,
                date_or_today(date.as_ref())?,
                time_or_now(time.as_ref())?,
                fitness.into(),
            )?;
            report_checkin(&att);
        }
        AttendanceCmd::List { date, range } => {
            let (from, to) = match range {
                Some(r) => parse_range(r)?,
                None => {
                    let d = date_or_today(date.as_ref())?;
                    (d, d)
                }
            };

            let rows = AttendanceLogic::list(&pool, from, to)?;
            if rows.is_empty() {
                warning("No attendance recorded for this period.");
                return Ok(());
            }

            let mut table = Table::new(
                &["ID", "Tanggal", "Jam", "Shift", "NIK", "Nama", "Tidur", "Fit", "Sumber"],
                cfg.separator(),
            );
            for a in &rows {
                table.add_row(vec![
                    a.id.to_string(),
                    a.date.to_string(),
                    format_hhmm(a.time),
                    a.shift.as_str().to_string(),
                    a.nik.clone(),
                    truncate(&a.employee_name, 28),
                    a.sleep_hours.map(|h| format!("{h:.1}")).unwrap_or_else(|| "-".into()),
                    match a.fit_to_work {
                        Some(true) => "Ya".into(),
                        Some(false) => "Tidak".into(),
                        None => "-".into(),
                    },
                    a.source.to_db_str().to_string(),
                ]);
            }
            print!("{}", table.render());
            info(format!("{} check-in(s).", rows.len()));
        }
        AttendanceCmd::Summary { date } => {
            let s = AttendanceLogic::daily_summary(&pool, date_or_today(date.as_ref())?)?;
            header(format!("Absensi {}", format_date_id(s.date)));
            println!("Shift 1          : {}", s.shift1);
            println!("Shift 2          : {}", s.shift2);
            println!("Total hadir      : {}", s.total);
            println!("Karyawan aktif   : {}", s.active_employees);
            println!("Belum hadir      : {}", s.absent);
            if s.unfit > 0 {
                warning(format!("{} employee(s) declared unfit to work.", s.unfit));
            }
        }
        AttendanceCmd::Del { id } => {
            AttendanceLogic::delete(&mut pool, *id)?;
            success(format!("Attendance #{id} deleted."));
        }
    }

    Ok(())
}

fn report_checkin(a: &Attendance) {
    success(format!(
        "{} ({}) checked in at {} {} [{}].",
        a.employee_name,
        a.nik,
        a.date,
        format_hhmm(a.time),
        a.shift
    ));
    if a.fit_to_work == Some(false) {
        warning("Declared NOT fit to work. Inform the supervisor.");
    }
    if let Some(h) = a.sleep_hours
        && h < 6.0
    {
        warning(format!("Only {h:.1} hours of sleep reported."));
    }
}
