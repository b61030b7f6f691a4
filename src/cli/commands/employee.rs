use crate::cli::parser::{Commands, EmployeeCmd, EmployeeFields};
use crate::config::Config;
use crate::core::employee::EmployeeLogic;
use crate::core::qr::{employee_qr_json, employee_qr_url};
use crate::db::employees::EmployeeFilter;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::employee::{Employee, EmployeeInput};
use crate::models::expiry::worst_level;
use crate::ui::messages::{header, info, item_result, success, warning};
use crate::utils::colors::{RESET, color_for_optional_field};
use crate::utils::date::today;
use crate::utils::formatting::{truncate, yes_no};
use crate::utils::table::Table;

fn to_input(nik: &str, f: &EmployeeFields) -> EmployeeInput {
    EmployeeInput {
        nik: nik.to_string(),
        name: f.name.clone(),
        position: f.position.clone(),
        department: f.department.clone(),
        company: f.company.clone(),
        phone: f.phone.clone(),
        shift: f.shift.clone(),
        sim_expiry: f.sim_expiry.clone(),
        simper_bib_expiry: f.simper_bib_expiry.clone(),
        simper_tia_expiry: f.simper_tia_expiry.clone(),
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Employee { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;

    match action {
        EmployeeCmd::Add { nik, fields } => {
            let emp = EmployeeLogic::add(&mut pool, cfg, &to_input(nik, fields))?;
            success(format!("Employee {} ({}) added.", emp.name, emp.nik));
        }
        EmployeeCmd::Edit { nik, fields } => {
            let emp = EmployeeLogic::update(&mut pool, &to_input(nik, fields))?;
            success(format!("Employee {} ({}) updated.", emp.name, emp.nik));
        }
        EmployeeCmd::Show { nik } => {
            let emp = EmployeeLogic::show(&pool, nik)?;
            print_employee(&emp);
        }
        EmployeeCmd::List {
            department,
            search,
            all,
        } => {
            let filter = EmployeeFilter {
                department: department.clone(),
                search: search.clone(),
                active_only: !*all,
            };
            let rows = EmployeeLogic::list(&pool, &filter)?;
            if rows.is_empty() {
                warning("No employees found.");
                return Ok(());
            }

            let day = today();
            let mut table = Table::new(
                &["NIK", "Nama", "Jabatan", "Departemen", "Shift", "Lisensi", "Aktif"],
                cfg.separator(),
            );
            for e in &rows {
                let level = e.worst_license_level(day);
                table.add_row(vec![
                    e.nik.clone(),
                    truncate(&e.name, 28),
                    truncate(&e.position, 20),
                    e.department.clone(),
                    e.shift.map(|s| s.as_str().to_string()).unwrap_or_else(|| "-".into()),
                    level.label().to_string(),
                    yes_no(e.active).to_string(),
                ]);
            }
            print!("{}", table.render());
            info(format!("{} employee(s).", rows.len()));
        }
        EmployeeCmd::Activate { nik } => {
            EmployeeLogic::set_active(&mut pool, nik, true)?;
            success(format!("Employee {nik} activated."));
        }
        EmployeeCmd::Deactivate { nik } => {
            EmployeeLogic::set_active(&mut pool, nik, false)?;
            success(format!("Employee {nik} deactivated."));
        }
        EmployeeCmd::Del { nik } => {
            EmployeeLogic::delete(&mut pool, nik)?;
            success(format!("Employee {nik} deleted."));
        }
        EmployeeCmd::Import { file } => {
            header(format!("Importing employees from {}", file.display()));
            let report = EmployeeLogic::import_csv(&mut pool, cfg, file)?;
            for row in &report.rows {
                let label = format!("line {:>4}  {}", row.line, row.nik);
                match &row.result {
                    Ok(action) => {
                        let done = format!("{action:?}").to_lowercase();
                        item_result(label, Ok(done.as_str()));
                    }
                    Err(e) => item_result(label, Err(e.as_str())),
                }
            }
            success(format!(
                "{} created, {} updated, {} failed.",
                report.created(),
                report.updated(),
                report.failed()
            ));
        }
        EmployeeCmd::Qr { nik } => {
            let emp = EmployeeLogic::show(&pool, nik)?;
            header(format!("QR card of {} ({})", emp.name, emp.nik));
            println!("URL  : {}", employee_qr_url(&cfg.qr_base_url, &emp.nik));
            println!("Token: {}", employee_qr_json(&emp.nik));
        }
        EmployeeCmd::Expiry { within } => {
            let entries = EmployeeLogic::expiry_report(&pool, today(), *within)?;
            if entries.is_empty() {
                success(format!("No licence expires within {within} days."));
                return Ok(());
            }

            let mut table = Table::new(
                &["NIK", "Nama", "Lisensi", "Berlaku s/d", "Status", "Keterangan"],
                cfg.separator(),
            );
            for e in &entries {
                let expiry = e
                    .employee
                    .licenses()
                    .iter()
                    .find(|(k, _)| *k == e.license)
                    .and_then(|(_, d)| *d)
                    .map(|d| d.to_string())
                    .unwrap_or_default();
                table.add_row(vec![
                    e.employee.nik.clone(),
                    truncate(&e.employee.name, 28),
                    e.license.label().to_string(),
                    expiry,
                    e.status.level.label().to_string(),
                    e.status.display_text.clone(),
                ]);
            }
            print!("{}", table.render());
            warning(format!("{} licence(s) need attention.", entries.len()));
        }
    }

    Ok(())
}

fn print_employee(e: &Employee) {
    let day = today();
    header(format!("{} ({})", e.name, e.nik));
    println!("Jabatan    : {}", e.position);
    println!("Departemen : {}", e.department);
    println!("Perusahaan : {}", e.company);
    println!(
        "Telepon    : {}{}{}",
        color_for_optional_field(e.phone.as_deref()),
        e.phone.as_deref().unwrap_or("-"),
        RESET
    );
    println!(
        "Shift      : {}",
        e.shift.map(|s| s.description()).unwrap_or_else(|| "-".into())
    );
    println!("Aktif      : {}", yes_no(e.active));

    println!();
    for (kind, status) in e.license_statuses(day) {
        let date = e
            .licenses()
            .iter()
            .find(|(k, _)| *k == kind)
            .and_then(|(_, d)| *d)
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<11}: {:<10} {}{:<9}{} {}",
            kind.label(),
            date,
            status.level.color(),
            status.level.label(),
            RESET,
            status.display_text
        );
    }

    let worst = worst_level(e.license_statuses(day).into_iter().map(|(_, s)| s.level));
    println!("\nStatus lisensi: {}{}{}", worst.color(), worst.label(), RESET);
}
