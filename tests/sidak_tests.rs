use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{PNG_B64, init_db, rhse, setup_test_db, temp_out};

fn start_apd(db: &str) {
    rhse()
        .args([
            "--db", db, "sidak", "start", "apd", "--date", "2026-10-17", "--time", "07:00",
            "--location", "Pit 3",
        ])
        .assert()
        .success()
        .stdout(contains("session #1"));
}

fn add_observer(db: &str) {
    rhse()
        .args([
            "--db", db, "sidak", "observer", "1", "--name", "Joko", "--position", "Pengawas",
            "--signature", PNG_B64,
        ])
        .assert()
        .success();
}

#[test]
fn wizard_runs_from_header_to_finish() {
    let db = setup_test_db("sidak_wizard");
    init_db(&db);
    start_apd(&db);

    rhse()
        .args(["--db", &db, "sidak", "record", "1", "--name", "Andi", "-F", "helmet=no"])
        .assert()
        .success()
        .stdout(contains("Findings: Helm"));

    rhse()
        .args(["--db", &db, "sidak", "record", "1", "--name", "Budi"])
        .assert()
        .success()
        .stdout(contains("No findings."));

    rhse()
        .args(["--db", &db, "sidak", "finish", "1"])
        .assert()
        .failure()
        .stderr(contains("observer"));

    add_observer(&db);

    rhse()
        .args(["--db", &db, "sidak", "finish", "1"])
        .assert()
        .success()
        .stdout(contains("2 record(s), 1 compliant (50,00%)"));

    rhse()
        .args(["--db", &db, "sidak", "record", "1", "--name", "Late"])
        .assert()
        .failure()
        .stderr(contains("already finished"));
}

#[test]
fn draft_follows_the_wizard_and_is_cleared_on_finish() {
    let db = setup_test_db("sidak_draft");
    init_db(&db);
    start_apd(&db);

    rhse()
        .args(["--db", &db, "sidak", "record", "1", "--name", "Andi"])
        .assert()
        .success();

    rhse()
        .args(["--db", &db, "draft", "list"])
        .assert()
        .success()
        .stdout(contains("apd").and(contains("#1")));

    rhse()
        .args(["--db", &db, "draft", "show", "apd"])
        .assert()
        .success()
        .stdout(contains("\"session_id\": 1"));

    add_observer(&db);
    rhse().args(["--db", &db, "sidak", "finish", "1"]).assert().success();

    rhse()
        .args(["--db", &db, "draft", "list"])
        .assert()
        .success()
        .stdout(contains("No saved drafts."));
}

#[test]
fn unknown_checklist_field_is_rejected() {
    let db = setup_test_db("sidak_field");
    init_db(&db);
    start_apd(&db);

    rhse()
        .args(["--db", &db, "sidak", "record", "1", "--name", "Andi", "-F", "hat=no"])
        .assert()
        .failure()
        .stderr(contains("unknown field 'hat'"));
}

#[test]
fn invalid_signature_is_rejected() {
    let db = setup_test_db("sidak_sig");
    init_db(&db);
    start_apd(&db);

    rhse()
        .args([
            "--db", &db, "sidak", "observer", "1", "--name", "Joko", "--signature",
            "data:image/jpeg;base64,AAAA",
        ])
        .assert()
        .failure()
        .stderr(contains("PNG"));
}

#[test]
fn workshop_requires_a_workshop_name() {
    let db = setup_test_db("sidak_ws");
    init_db(&db);

    rhse()
        .args([
            "--db", &db, "sidak", "start", "workshop", "--time", "08:00", "--location", "Area A",
        ])
        .assert()
        .failure()
        .stderr(contains("workshop name is required"));
}

#[test]
fn session_report_is_a_pdf() {
    let db = setup_test_db("sidak_report");
    init_db(&db);
    start_apd(&db);
    rhse()
        .args(["--db", &db, "sidak", "record", "1", "--name", "Andi", "-F", "gloves=no"])
        .assert()
        .success();
    add_observer(&db);

    let out = temp_out("sidak_report", "pdf");
    rhse()
        .args(["--db", &db, "sidak", "report", "1", "--file", &out])
        .assert()
        .success();

    let bytes = fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn list_and_delete_sessions() {
    let db = setup_test_db("sidak_list");
    init_db(&db);
    start_apd(&db);

    rhse()
        .args(["--db", &db, "sidak", "list", "--range", "2026-10"])
        .assert()
        .success()
        .stdout(contains("Pit 3"))
        .stdout(contains("1 session(s)."));

    rhse().args(["--db", &db, "sidak", "del", "1"]).assert().success();

    rhse()
        .args(["--db", &db, "sidak", "show", "1"])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn unfinished_draft_is_offered_before_a_new_start() {
    let db = setup_test_db("sidak_resume");
    init_db(&db);
    start_apd(&db);
    rhse()
        .args(["--db", &db, "sidak", "record", "1", "--name", "Andi"])
        .assert()
        .success();

    let again: [&str; 11] = [
        "--db", &db, "sidak", "start", "apd", "--date", "2026-10-18", "--time", "07:00",
        "--location", "Pit 4",
    ];

    // no answer keeps the draft and creates nothing
    rhse()
        .args(again)
        .assert()
        .success()
        .stdout(contains("Unfinished"))
        .stdout(contains("session #1, step 2, 1 record(s)"))
        .stdout(contains("Resuming session #1"));

    rhse()
        .args(["--db", &db, "draft", "show", "apd"])
        .assert()
        .success()
        .stdout(contains("\"session_id\": 1"));

    rhse()
        .args(again)
        .write_stdin("y\n")
        .assert()
        .success()
        .stdout(contains("Draft discarded."))
        .stdout(contains("session #2"));

    rhse()
        .args(["--db", &db, "draft", "show", "apd"])
        .assert()
        .success()
        .stdout(contains("\"session_id\": 2"));
}

#[test]
fn discard_draft_flag_skips_the_question() {
    let db = setup_test_db("sidak_discard");
    init_db(&db);
    start_apd(&db);

    rhse()
        .args([
            "--db", &db, "sidak", "start", "apd", "--date", "2026-10-17", "--time", "08:00",
            "--location", "Pit 3", "--discard-draft",
        ])
        .assert()
        .success()
        .stdout(contains("session #2"));
}
