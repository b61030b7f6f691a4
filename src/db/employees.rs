use crate::db::queries::{conversion_err, fmt_opt_date, now_stamp, opt_date_col};
use crate::errors::{AppError, AppResult};
use crate::models::employee::Employee;
use crate::models::shift::Shift;
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_employee(row: &Row) -> rusqlite::Result<Employee> {
    let shift: Option<String> = row.get("shift")?;
    let shift = match shift {
        Some(s) => Some(Shift::parse(&s).ok_or_else(|| conversion_err(AppError::InvalidShift(s)))?),
        None => None,
    };

    Ok(Employee {
        nik: row.get("nik")?,
        name: row.get("name")?,
        position: row.get("position")?,
        department: row.get("department")?,
        company: row.get("company")?,
        phone: row.get("phone")?,
        shift,
        sim_expiry: opt_date_col(row, "sim_expiry")?,
        simper_bib_expiry: opt_date_col(row, "simper_bib_expiry")?,
        simper_tia_expiry: opt_date_col(row, "simper_tia_expiry")?,
        active: row.get::<_, i64>("active")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_employee(conn: &Connection, e: &Employee) -> AppResult<()> {
    conn.execute(
        "INSERT INTO employees (nik, name, position, department, company, phone, shift,
                                sim_expiry, simper_bib_expiry, simper_tia_expiry, active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            e.nik,
            e.name,
            e.position,
            e.department,
            e.company,
            e.phone,
            e.shift.map(|s| s.as_str()),
            fmt_opt_date(e.sim_expiry),
            fmt_opt_date(e.simper_bib_expiry),
            fmt_opt_date(e.simper_tia_expiry),
            e.active as i64,
            if e.created_at.is_empty() { now_stamp() } else { e.created_at.clone() },
        ],
    )?;
    Ok(())
}

/// Update all fields except `nik` and `created_at`.
pub fn update_employee(conn: &Connection, e: &Employee) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE employees
         SET name = ?1, position = ?2, department = ?3, company = ?4, phone = ?5, shift = ?6,
             sim_expiry = ?7, simper_bib_expiry = ?8, simper_tia_expiry = ?9, active = ?10
         WHERE nik = ?11",
        params![
            e.name,
            e.position,
            e.department,
            e.company,
            e.phone,
            e.shift.map(|s| s.as_str()),
            fmt_opt_date(e.sim_expiry),
            fmt_opt_date(e.simper_bib_expiry),
            fmt_opt_date(e.simper_tia_expiry),
            e.active as i64,
            e.nik,
        ],
    )?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Employee {}", e.nik)));
    }
    Ok(())
}

pub fn find_employee(conn: &Connection, nik: &str) -> AppResult<Option<Employee>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM employees WHERE nik = ?1")?;
    Ok(stmt.query_row([nik], map_employee).optional()?)
}

pub fn get_employee(conn: &Connection, nik: &str) -> AppResult<Employee> {
    find_employee(conn, nik)?.ok_or_else(|| AppError::NotFound(format!("Employee {}", nik)))
}

/// Filters for [`list_employees`]; empty filters match everything.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub department: Option<String>,
    pub search: Option<String>,
    pub active_only: bool,
}

pub fn list_employees(conn: &Connection, filter: &EmployeeFilter) -> AppResult<Vec<Employee>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM employees
         WHERE (?1 IS NULL OR department = ?1)
           AND (?2 IS NULL OR name LIKE '%' || ?2 || '%' OR nik LIKE '%' || ?2 || '%')
           AND (?3 = 0 OR active = 1)
         ORDER BY name ASC",
    )?;

    let rows = stmt.query_map(
        params![filter.department, filter.search, filter.active_only as i64],
        map_employee,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn set_active(conn: &Connection, nik: &str, active: bool) -> AppResult<()> {
    let n = conn.execute(
        "UPDATE employees SET active = ?1 WHERE nik = ?2",
        params![active as i64, nik],
    )?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Employee {}", nik)));
    }
    Ok(())
}

pub fn delete_employee(conn: &Connection, nik: &str) -> AppResult<()> {
    let n = conn.execute("DELETE FROM employees WHERE nik = ?1", [nik])?;
    if n == 0 {
        return Err(AppError::NotFound(format!("Employee {}", nik)));
    }
    Ok(())
}

pub fn count_active(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM employees WHERE active = 1",
        [],
        |r| r.get(0),
    )?)
}
