#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// 1x1 transparent PNG, used as an observer signature.
pub const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

fn home_dir() -> PathBuf {
    let dir = env::temp_dir().join("rhse_it_home");
    fs::create_dir_all(&dir).ok();
    dir
}

/// Binary under test, isolated from the user's configuration.
pub fn rhse() -> Command {
    let mut cmd = cargo_bin_cmd!("rhse");
    cmd.env("RHSE_HOME", home_dir());
    cmd
}

/// Unique test DB path inside the system temp dir; old DB and data dir are removed.
pub fn setup_test_db(name: &str) -> String {
    let path = env::temp_dir().join(format!("{}_rhse.sqlite", name));
    fs::remove_file(&path).ok();
    fs::remove_dir_all(path.with_extension("data")).ok();
    path.to_string_lossy().to_string()
}

/// Temporary output file path inside the temp dir, removed beforehand.
pub fn temp_out(name: &str, ext: &str) -> String {
    let path = env::temp_dir().join(format!("{}_out.{}", name, ext));
    fs::remove_file(&path).ok();
    path.to_string_lossy().to_string()
}

pub fn init_db(db: &str) {
    rhse().args(["--db", db, "--test", "init"]).assert().success();
}

/// Two drivers on Shift 1 and one mechanic without a fixed shift.
pub fn init_db_with_employees(db: &str) {
    init_db(db);

    for (nik, name, shift, simper) in [
        ("1001", "Andi Saputra", "1", "2026-11-01"),
        ("1002", "Budi Santoso", "1", "2027-06-30"),
        ("1003", "Citra Lestari", "", "2026-10-01"),
    ] {
        let mut args = vec![
            "--db",
            db,
            "employee",
            "add",
            nik,
            "--name",
            name,
            "--position",
            "Driver",
            "--department",
            "Hauling",
            "--phone",
            "081234567890",
            "--simper-bib",
            simper,
        ];
        if !shift.is_empty() {
            args.extend(["--shift", shift]);
        }
        rhse().args(&args).assert().success();
    }
}
