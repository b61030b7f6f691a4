use predicates::str::contains;

mod common;
use common::{init_db_with_employees, rhse, setup_test_db};

fn scan(db: &str, payload: &str, time: &str) -> assert_cmd::assert::Assert {
    rhse()
        .args([
            "--db", db, "attendance", "scan", payload, "--date", "2026-10-17", "--time", time,
        ])
        .assert()
}

#[test]
fn scan_url_and_json_payloads() {
    let db = setup_test_db("att_scan");
    init_db_with_employees(&db);

    scan(&db, "https://hse.local/driver-view?nik=1001", "06:30")
        .success()
        .stdout(contains("Andi Saputra (1001) checked in"))
        .stdout(contains("Shift 1"));

    scan(&db, r#"{"id":"1003","type":"employee"}"#, "17:10")
        .success()
        .stdout(contains("Shift 2"));
}

#[test]
fn second_scan_on_the_same_day_is_rejected() {
    let db = setup_test_db("att_dup");
    init_db_with_employees(&db);

    scan(&db, "1001", "06:30").success();
    scan(&db, "1001", "07:00")
        .failure()
        .stderr(contains("already checked in"));
}

#[test]
fn scans_outside_the_shift_window_fail() {
    let db = setup_test_db("att_window");
    init_db_with_employees(&db);

    // nobody checks in at noon
    scan(&db, "1003", "12:00")
        .failure()
        .stderr(contains("outside the allowed window"));

    // 1002 is scheduled on Shift 1
    scan(&db, "1002", "17:00")
        .failure()
        .stderr(contains("Shift 1"));
}

#[test]
fn unfit_answer_is_reported() {
    let db = setup_test_db("att_unfit");
    init_db_with_employees(&db);

    rhse()
        .args([
            "--db", &db, "attendance", "manual", "1002", "--date", "2026-10-17", "--time",
            "05:00", "--sleep", "4.5", "--unfit",
        ])
        .assert()
        .success()
        .stdout(contains("NOT fit to work"))
        .stdout(contains("4.5 hours of sleep"));
}

#[test]
fn daily_summary_counts_per_shift() {
    let db = setup_test_db("att_summary");
    init_db_with_employees(&db);

    scan(&db, "1001", "06:30").success();
    scan(&db, "1003", "17:10").success();

    rhse()
        .args(["--db", &db, "attendance", "summary", "--date", "2026-10-17"])
        .assert()
        .success()
        .stdout(contains("Total hadir      : 2"))
        .stdout(contains("Belum hadir      : 1"));

    rhse()
        .args(["--db", &db, "attendance", "list", "--range", "2026-10"])
        .assert()
        .success()
        .stdout(contains("2 check-in(s)."));
}
