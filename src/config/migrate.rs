use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

/// Every key a complete configuration file carries.
const KNOWN_FIELDS: &[&str] = &[
    "database",
    "data_dir",
    "company_name",
    "default_department",
    "qr_base_url",
    "draft_debounce_ms",
    "whatsapp_api_url",
    "whatsapp_api_key",
    "admin_phone",
    "separator_char",
];

/// Return the known keys absent from the YAML document at `path`.
pub fn missing_fields(path: &Path) -> AppResult<Vec<&'static str>> {
    let content = fs::read_to_string(path)?;
    let yaml: Value = serde_yaml::from_str(&content)?;
    Ok(missing_in(&yaml))
}

fn missing_in(yaml: &Value) -> Vec<&'static str> {
    let Some(map) = yaml.as_mapping() else {
        return KNOWN_FIELDS.to_vec();
    };

    KNOWN_FIELDS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String((*k).to_string())))
        .collect()
}

/// Add missing keys with their default values, keeping existing ones untouched.
/// Returns the list of keys that were written.
pub fn migrate_config_file(path: &Path) -> AppResult<Vec<&'static str>> {
    let content = fs::read_to_string(path)?;
    let mut yaml: Value = serde_yaml::from_str(&content)?;

    let missing = missing_in(&yaml);
    if missing.is_empty() {
        info("Configuration file is up to date.");
        return Ok(missing);
    }

    let defaults = serde_yaml::to_value(super::Config::default())?;
    let default_map = defaults.as_mapping().cloned().unwrap_or_default();

    if !yaml.is_mapping() {
        yaml = Value::Mapping(Mapping::new());
    }

    if let Some(map) = yaml.as_mapping_mut() {
        for key in &missing {
            let k = Value::String((*key).to_string());
            let v = default_map.get(&k).cloned().unwrap_or(Value::Null);
            map.insert(k, v);
        }
    }

    fs::write(path, serde_yaml::to_string(&yaml)?)?;
    success(format!("Configuration migrated, added: {}", missing.join(", ")));

    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_missing_keys() {
        let yaml: Value = serde_yaml::from_str("database: /tmp/a.sqlite\nadmin_phone: '62811'\n").unwrap();
        let missing = missing_in(&yaml);
        assert!(!missing.contains(&"database"));
        assert!(!missing.contains(&"admin_phone"));
        assert!(missing.contains(&"qr_base_url"));
        assert_eq!(missing.len(), KNOWN_FIELDS.len() - 2);
    }

    #[test]
    fn migrate_fills_defaults_and_keeps_values() {
        let dir = std::env::temp_dir().join("rhse_cfg_migrate_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rhse.conf");
        fs::write(&path, "database: /srv/hse.sqlite\n").unwrap();

        let added = migrate_config_file(&path).unwrap();
        assert!(added.contains(&"draft_debounce_ms"));

        let cfg: super::super::Config =
            serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cfg.database, "/srv/hse.sqlite");
        assert_eq!(cfg.draft_debounce_ms, 1000);
        assert!(missing_fields(&path).unwrap().is_empty());
    }
}
