use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;
use std::io::Read;

mod common;
use common::{init_db, init_db_with_employees, rhse, setup_test_db, temp_out};

#[test]
fn db_check_and_info() {
    let db = setup_test_db("admin_db");
    init_db(&db);

    rhse()
        .args(["--db", &db, "db", "--check", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"))
        .stdout(contains("up to date"));
}

#[test]
fn log_records_operations() {
    let db = setup_test_db("admin_log");
    init_db_with_employees(&db);

    rhse()
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init").and(contains("employee 1001")));
}

#[test]
fn compressed_backup_contains_documents() {
    let db = setup_test_db("admin_backup");
    init_db(&db);

    let pdf = temp_out("admin_backup_src", "pdf");
    fs::write(&pdf, b"%PDF-1.4\n%%EOF\n").unwrap();
    rhse()
        .args(["--db", &db, "document", "upload", &pdf, "--title", "SOP Hauling"])
        .assert()
        .success();

    let out = temp_out("admin_backup", "zip");
    rhse()
        .args(["--db", &db, "backup", "--file", &out, "--compress"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    let mut archive = zip::ZipArchive::new(fs::File::open(&out).unwrap()).unwrap();
    let names: Vec<String> = archive.file_names().map(String::from).collect();
    assert!(names.iter().any(|n| n.starts_with("data/documents/")));

    let mut head = Vec::new();
    let db_name = std::path::Path::new(&db).file_name().unwrap().to_string_lossy().to_string();
    archive.by_name(&db_name).unwrap().read_to_end(&mut head).unwrap();
    assert!(head.starts_with(b"SQLite format 3"));
}

#[test]
fn backup_of_missing_database_fails() {
    let db = setup_test_db("admin_backup_missing");
    let out = temp_out("admin_backup_missing", "sqlite");

    rhse()
        .args(["--db", &db, "backup", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("not found"));
}

#[test]
fn documents_accept_only_pdf() {
    let db = setup_test_db("admin_docs");
    init_db(&db);

    let fake = temp_out("admin_docs_fake", "pdf");
    fs::write(&fake, b"not a pdf").unwrap();
    let real = temp_out("admin_docs_real", "pdf");
    fs::write(&real, b"%PDF-1.7\n%%EOF\n").unwrap();

    rhse()
        .args(["--db", &db, "document", "upload", &fake, &real, "--category", "sop"])
        .assert()
        .success()
        .stdout(contains("1 of 2 document(s) uploaded."));

    rhse()
        .args(["--db", &db, "document", "deactivate", "1"])
        .assert()
        .success();

    rhse()
        .args(["--db", &db, "document", "list"])
        .assert()
        .success()
        .stdout(contains("No documents found."));

    rhse()
        .args(["--db", &db, "document", "list", "--all", "--category", "sop"])
        .assert()
        .success()
        .stdout(contains("admin_docs_real_out"));
}

#[test]
fn news_toggle_hides_and_shows() {
    let db = setup_test_db("admin_news");
    init_db(&db);

    rhse()
        .args(["--db", &db, "news", "add", "--title", "Jalan licin", "--content", "Hati-hati di KM 12"])
        .assert()
        .success();

    rhse()
        .args(["--db", &db, "news", "toggle", "1"])
        .assert()
        .success()
        .stdout(contains("hidden"));

    rhse()
        .args(["--db", &db, "news", "list"])
        .assert()
        .success()
        .stdout(contains("No news."));
}

#[test]
fn statistics_values_and_json_report() {
    let db = setup_test_db("admin_stats");
    init_db(&db);

    rhse()
        .args(["--db", &db, "stats", "set", "2026", "manpower", "1", "250"])
        .assert()
        .success();
    rhse()
        .args(["--db", &db, "stats", "set", "2026", "ti", "1", "2"])
        .assert()
        .success();

    rhse()
        .args(["--db", &db, "stats", "show", "2026", "--json"])
        .assert()
        .success()
        .stdout(contains("\"total_ti\": 2"))
        .stdout(contains("\"year\": 2026"));

    rhse()
        .args(["--db", &db, "stats", "set", "2026", "ti", "13", "1"])
        .assert()
        .failure();
}

#[test]
fn blast_dry_run_reaches_every_active_employee() {
    let db = setup_test_db("admin_blast");
    init_db_with_employees(&db);

    rhse()
        .args([
            "--db", &db, "blast", "send", "--message", "Halo {nama}, briefing jam 7.", "--dry-run",
        ])
        .assert()
        .success()
        .stdout(contains("Halo Andi Saputra"))
        .stdout(contains("3 message(s) sent"));

    rhse()
        .args(["--db", &db, "blast", "log"])
        .assert()
        .success()
        .stdout(contains("6281234567890"));
}

#[test]
fn dashboard_as_json() {
    let db = setup_test_db("admin_dashboard");
    init_db_with_employees(&db);

    rhse()
        .args(["--db", &db, "dashboard", "--date", "2026-10-17", "--json"])
        .assert()
        .success()
        .stdout(contains("\"active_employees\": 3"));
}
