use crate::errors::{AppError, AppResult};
use crate::ui::messages::{confirm, info, warning};
use std::path::Path;

/// Check that `path` may be written.
///
/// A missing file, or `force`, passes. Otherwise the user is asked on stdin;
/// anything but `y`/`yes` (including a closed stdin) cancels.
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    warning(format!("The file '{}' already exists.", path.display()));

    if confirm("Overwrite?")? {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(format!(
            "cancelled, '{}' was not overwritten (use --force)",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_or_force_passes() {
        let p = std::env::temp_dir().join("rhse_fs_utils_missing.csv");
        let _ = std::fs::remove_file(&p);
        assert!(ensure_writable(&p, false).is_ok());
        std::fs::write(&p, "x").unwrap();
        assert!(ensure_writable(&p, true).is_ok());
    }
}
