use predicates::str::contains;

mod common;
use common::{init_db_with_employees, rhse, setup_test_db};

/// Create a meeting and return the QR URL printed for it.
fn create_meeting(db: &str) -> String {
    let out = rhse()
        .args([
            "--db", db, "meeting", "create", "--title", "Safety Talk", "--date", "2026-10-20",
            "--start", "07:00", "--end", "08:00", "--venue", "Ruang P2H",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8_lossy(&out);
    text.lines()
        .find_map(|l| l.strip_prefix("QR : "))
        .map(|s| s.trim().to_string())
        .unwrap()
}

#[test]
fn attendance_by_qr_and_by_hand() {
    let db = setup_test_db("meeting_attend");
    init_db_with_employees(&db);
    let url = create_meeting(&db);
    assert!(url.contains("/meeting-attend?token="));

    rhse()
        .args(["--db", &db, "meeting", "attend", "--token", &url, "--employee", "1001"])
        .assert()
        .success();

    rhse()
        .args(["--db", &db, "meeting", "attend", "--token", &url, "--employee", "1001"])
        .assert()
        .failure()
        .stderr(contains("already attended"));

    rhse()
        .args(["--db", &db, "meeting", "attend-manual", "1", "--name", "Tamu Vendor"])
        .assert()
        .success();

    rhse()
        .args(["--db", &db, "meeting", "attendance", "1"])
        .assert()
        .success()
        .stdout(contains("Andi Saputra"))
        .stdout(contains("Tamu Vendor"))
        .stdout(contains("2 attendee(s)."));
}

#[test]
fn closed_meetings_refuse_attendance() {
    let db = setup_test_db("meeting_closed");
    init_db_with_employees(&db);
    create_meeting(&db);

    rhse()
        .args(["--db", &db, "meeting", "status", "1", "completed"])
        .assert()
        .success();

    rhse()
        .args(["--db", &db, "meeting", "attend-manual", "1", "--name", "Late"])
        .assert()
        .failure()
        .stderr(contains("completed"));
}

#[test]
fn end_before_start_is_rejected() {
    let db = setup_test_db("meeting_times");
    init_db_with_employees(&db);

    rhse()
        .args([
            "--db", &db, "meeting", "create", "--title", "X", "--date", "2026-10-20", "--start",
            "09:00", "--end", "08:00", "--venue", "Office",
        ])
        .assert()
        .failure()
        .stderr(contains("end time must be after start time"));
}
