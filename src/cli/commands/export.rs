use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::export::{ExportLogic, ExportRequest};

/// Export the selected dataset.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        what,
        format,
        file,
        range,
        kind,
        meeting,
        force,
    } = cmd
    {
        let pool = open_db(&cfg.database)?;

        let req = ExportRequest {
            target: *what,
            format: *format,
            file: file.clone(),
            range: range.clone(),
            kind: *kind,
            meeting: *meeting,
            force: *force,
        };
        ExportLogic::export(&pool, &req)?;
    }

    Ok(())
}
