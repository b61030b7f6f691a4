use crate::config::Config;
use crate::config::migrate::{migrate_config_file, missing_fields};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    /// Print the effective configuration (file values plus defaults).
    pub fn print(cfg: &Config) -> AppResult<()> {
        println!("📄 Current configuration:\n");
        println!("{}", serde_yaml::to_string(cfg)?);
        println!("data directory: {}", cfg.data_dir().display());
        Ok(())
    }

    /// Report the keys absent from the configuration file.
    pub fn check(path: &Path) -> AppResult<Vec<&'static str>> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "{} does not exist, run `rhse init` first",
                path.display()
            )));
        }

        let missing = missing_fields(path)?;
        if missing.is_empty() {
            success("Configuration file is complete.");
        } else {
            warning(format!("Missing fields: {}", missing.join(", ")));
            info("Run `rhse config --migrate` to add them with default values.");
        }
        Ok(missing)
    }

    pub fn migrate(path: &Path) -> AppResult<Vec<&'static str>> {
        if !path.exists() {
            return Err(AppError::Config(format!("{} does not exist", path.display())));
        }
        migrate_config_file(path)
    }

    /// Open the configuration file in `editor`, falling back to `$EDITOR`,
    /// `$VISUAL` and finally the platform default.
    pub fn edit(path: &Path, editor: Option<&str>) -> AppResult<()> {
        let default_editor = std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(target_os = "windows") {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            });

        let requested = editor.map(str::to_string).unwrap_or_else(|| default_editor.clone());

        match Command::new(&requested).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!("Configuration file edited using '{requested}'"));
                return Ok(());
            }
            _ if requested == default_editor => {
                return Err(AppError::Config(format!(
                    "failed to run editor '{requested}'"
                )));
            }
            _ => warning(format!(
                "Editor '{requested}' not available, falling back to '{default_editor}'"
            )),
        }

        match Command::new(&default_editor).arg(path).status() {
            Ok(s) if s.success() => {
                success(format!(
                    "Configuration file edited using fallback '{default_editor}'"
                ));
                Ok(())
            }
            _ => Err(AppError::Config(format!(
                "failed to run fallback editor '{default_editor}'"
            ))),
        }
    }
}
