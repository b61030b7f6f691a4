//! rHSE library root.
//! Exposes the CLI parser, the high-level run() function and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let cmd = &cli.command;
    match cmd {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(cmd, cfg),
        Commands::Db { .. } => cli::commands::db::handle(cmd, cfg),
        Commands::Log { .. } => cli::commands::log::handle(cmd, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(cmd, cfg),
        Commands::Employee { .. } => cli::commands::employee::handle(cmd, cfg),
        Commands::Attendance { .. } => cli::commands::attendance::handle(cmd, cfg),
        Commands::Sidak { .. } => cli::commands::sidak::handle(cmd, cfg),
        Commands::Draft { .. } => cli::commands::draft::handle(cmd, cfg),
        Commands::Meeting { .. } => cli::commands::meeting::handle(cmd, cfg),
        Commands::Document { .. } => cli::commands::document::handle(cmd, cfg),
        Commands::News { .. } => cli::commands::news::handle(cmd, cfg),
        Commands::Blast { .. } => cli::commands::blast::handle(cmd, cfg),
        Commands::Stats { .. } => cli::commands::stats::handle(cmd, cfg),
        Commands::Dashboard { .. } => cli::commands::dashboard::handle(cmd, cfg),
        Commands::Export { .. } => cli::commands::export::handle(cmd, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // config is loaded once and shared by every handler
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
