use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Directory for drafts, uploaded documents and photos.
    /// When absent it is derived from the database path.
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default = "default_company")]
    pub company_name: String,
    #[serde(default = "default_department")]
    pub default_department: String,
    #[serde(default = "default_qr_base_url")]
    pub qr_base_url: String,
    #[serde(default = "default_debounce")]
    pub draft_debounce_ms: u64,
    #[serde(default = "default_whatsapp_url")]
    pub whatsapp_api_url: String,
    #[serde(default)]
    pub whatsapp_api_key: Option<String>,
    #[serde(default = "default_admin_phone")]
    pub admin_phone: String,
    #[serde(default = "default_separator_char")]
    pub separator_char: String,
}

pub(crate) fn default_company() -> String {
    "PT. Goden Energi Cemerlang Lesrari".to_string()
}
pub(crate) fn default_department() -> String {
    "HSE".to_string()
}
pub(crate) fn default_qr_base_url() -> String {
    "https://hse.gecl.local".to_string()
}
pub(crate) fn default_debounce() -> u64 {
    1000
}
pub(crate) fn default_whatsapp_url() -> String {
    "https://app.notif.my.id/api/v2/send-message".to_string()
}
pub(crate) fn default_admin_phone() -> String {
    "6285126406588".to_string()
}
pub(crate) fn default_separator_char() -> String {
    "-".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    pub(crate) fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            data_dir: None,
            company_name: default_company(),
            default_department: default_department(),
            qr_base_url: default_qr_base_url(),
            draft_debounce_ms: default_debounce(),
            whatsapp_api_url: default_whatsapp_url(),
            whatsapp_api_key: None,
            admin_phone: default_admin_phone(),
            separator_char: default_separator_char(),
        }
    }

    /// Return the standard configuration directory depending on the platform.
    /// `RHSE_HOME` takes precedence when set.
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var("RHSE_HOME") {
            return PathBuf::from(custom);
        }

        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rhse")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rhse")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rhse.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rhse.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|_| AppError::ConfigLoad)?;
            let cfg: Config = serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))?;
            Ok(cfg)
        } else {
            Ok(Config::default())
        }
    }

    /// Effective data directory: explicit `data_dir`, or `<db file stem>.data`
    /// next to the database.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => crate::utils::path::expand_home(dir),
            None => Path::new(&self.database).with_extension("data"),
        }
    }

    /// First character of `separator_char`, used to underline tables.
    pub fn separator(&self) -> char {
        self.separator_char.chars().next().unwrap_or('-')
    }

    pub fn drafts_dir(&self) -> PathBuf {
        self.data_dir().join("drafts")
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.data_dir().join("documents")
    }

    pub fn photos_dir(&self) -> PathBuf {
        self.data_dir().join("photos")
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            dir.join("rhse.sqlite")
        };

        let config = Config::with_database(db_path.clone());

        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        fs::create_dir_all(config.drafts_dir())?;
        fs::create_dir_all(config.documents_dir())?;
        fs::create_dir_all(config.photos_dir())?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_follows_database_when_not_set() {
        let cfg = Config::with_database(PathBuf::from("/tmp/site_a.sqlite"));
        assert_eq!(cfg.data_dir(), PathBuf::from("/tmp/site_a.data"));
        assert_eq!(cfg.drafts_dir(), PathBuf::from("/tmp/site_a.data/drafts"));
    }

    #[test]
    fn partial_yaml_gets_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.draft_debounce_ms, 1000);
        assert_eq!(cfg.default_department, "HSE");
        assert!(cfg.whatsapp_api_key.is_none());
    }
}
