use predicates::str::contains;
use std::fs;
use std::path::Path;

mod common;
use common::{init_db_with_employees, rhse, setup_test_db, temp_out};

fn with_attendance(name: &str) -> String {
    let db = setup_test_db(name);
    init_db_with_employees(&db);
    for (nik, time) in [("1001", "06:30"), ("1003", "17:15")] {
        rhse()
            .args([
                "--db", &db, "attendance", "manual", nik, "--date", "2026-10-17", "--time", time,
            ])
            .assert()
            .success();
    }
    db
}

#[test]
fn attendance_csv_for_a_month() {
    let db = with_attendance("exp_att_csv");
    let out = temp_out("exp_att_csv", "csv");

    rhse()
        .args([
            "--db", &db, "export", "--what", "attendance", "--format", "csv", "--file", &out,
            "--range", "2026-10",
        ])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("1001"));
    assert!(content.contains("Citra Lestari"));
    assert_eq!(content.lines().count(), 3);
}

#[test]
fn employees_json_and_xlsx() {
    let db = with_attendance("exp_emp");

    let json = temp_out("exp_emp", "json");
    rhse()
        .args(["--db", &db, "export", "--what", "employees", "--format", "json", "--file", &json])
        .assert()
        .success();
    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(parsed.as_array().map(|a| a.len()), Some(3));

    let xlsx = temp_out("exp_emp", "xlsx");
    rhse()
        .args(["--db", &db, "export", "--what", "employees", "--format", "xlsx", "--file", &xlsx])
        .assert()
        .success();
    // xlsx is a zip container
    assert!(fs::read(&xlsx).unwrap().starts_with(b"PK"));
}

#[test]
fn attendance_pdf() {
    let db = with_attendance("exp_att_pdf");
    let out = temp_out("exp_att_pdf", "pdf");

    rhse()
        .args(["--db", &db, "export", "--format", "pdf", "--file", &out, "--range", "2026"])
        .assert()
        .success();
    assert!(fs::read(&out).unwrap().starts_with(b"%PDF"));
}

#[test]
fn empty_period_writes_nothing() {
    let db = with_attendance("exp_empty");
    let out = temp_out("exp_empty", "csv");

    rhse()
        .args(["--db", &db, "export", "--file", &out, "--range", "2020-01"])
        .assert()
        .success()
        .stdout(contains("Nothing to export"));
    assert!(!Path::new(&out).exists());
}

#[test]
fn relative_output_path_is_rejected() {
    let db = with_attendance("exp_relative");

    rhse()
        .args(["--db", &db, "export", "--file", "out.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn invalid_range_is_rejected() {
    let db = with_attendance("exp_bad_range");
    let out = temp_out("exp_bad_range", "csv");

    rhse()
        .args(["--db", &db, "export", "--file", &out, "--range", "2026-05:2026-04"])
        .assert()
        .failure()
        .stderr(contains("start is after end"));
}

#[test]
fn meeting_attendance_needs_a_meeting_id() {
    let db = with_attendance("exp_meeting");
    let out = temp_out("exp_meeting", "csv");

    rhse()
        .args(["--db", &db, "export", "--what", "meeting-attendance", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("--meeting"));
}
