//! Path utilities: expand ~, validate absolute paths, build stored file names.

use chrono::Local;
use std::path::{Path, PathBuf};

pub fn expand_home(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

pub fn is_absolute(path: &str) -> bool {
    PathBuf::from(path).is_absolute()
}

/// Lowercased extension of `path`, if any.
pub fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Name used when copying an uploaded file into the data directory:
/// `<prefix>_<timestamp>_<sanitized original name>`.
pub fn stored_file_name(prefix: &str, original: &Path) -> String {
    let stamp = Local::now().format("%Y%m%d%H%M%S%3f");
    let name = original
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());

    let clean: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    format!("{prefix}_{stamp}_{clean}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_name_is_sanitized() {
        let n = stored_file_name("doc", Path::new("/tmp/Prosedur K3 (rev 2).pdf"));
        assert!(n.starts_with("doc_"));
        assert!(n.ends_with("Prosedur_K3__rev_2_.pdf"));
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_lower(Path::new("a/B.PDF")).as_deref(), Some("pdf"));
        assert_eq!(extension_lower(Path::new("noext")), None);
    }
}
