use crate::config::Config;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`. With `compress` the copy is
    /// replaced by a zip archive that also carries the data directory
    /// (uploaded documents, SIDAK photos, drafts).
    pub fn backup(
        cfg: &Config,
        dest_file: &str,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        let src = Path::new(&cfg.database);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::NotFound(format!("Database {}", src.display())));
        }

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let final_path = if compress {
            let zip_path = dest.with_extension("zip");
            ensure_writable(&zip_path, force)?;
            compress_backup(src, &cfg.data_dir(), &zip_path)?;
            zip_path
        } else {
            ensure_writable(dest, force)?;
            fs::copy(src, dest)?;
            dest.to_path_buf()
        };

        success(format!("Backup created: {}", final_path.display()));

        let pool = DbPool::new(&cfg.database)?;
        ttlog_quiet(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(final_path)
    }
}

/// Write `db` and every file below `data_dir` into a zip archive.
/// Entries of the data directory are stored under `data/`.
fn compress_backup(db: &Path, data_dir: &Path, zip_path: &Path) -> AppResult<()> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let db_name = db
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "rhse.sqlite".to_string());

    zip.start_file(db_name, options).map_err(io::Error::other)?;
    let mut f = fs::File::open(db)?;
    io::copy(&mut f, &mut zip)?;

    let mut files = Vec::new();
    if data_dir.is_dir() {
        collect_files(data_dir, &mut files)?;
    } else {
        info(format!(
            "No data directory at {}, archiving the database only.",
            data_dir.display()
        ));
    }

    for path in files {
        let Ok(rel) = path.strip_prefix(data_dir) else {
            continue;
        };
        let entry = format!(
            "data/{}",
            rel.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/")
        );

        match fs::File::open(&path) {
            Ok(mut f) => {
                zip.start_file(entry, options).map_err(io::Error::other)?;
                io::copy(&mut f, &mut zip)?;
            }
            Err(e) => warning(format!("Skipped {}: {}", path.display(), e)),
        }
    }

    zip.finish().map_err(io::Error::other)?;
    info(format!("Compressed: {}", zip_path.display()));

    Ok(())
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn archive_contains_database_and_data_files() {
        let dir = std::env::temp_dir().join("rhse_backup_unit");
        let _ = fs::remove_dir_all(&dir);
        let data = dir.join("site.data");
        fs::create_dir_all(data.join("photos/3")).unwrap();
        fs::write(dir.join("site.sqlite"), b"sqlite").unwrap();
        fs::write(data.join("photos/3/a.jpg"), b"jpeg").unwrap();

        let zip_path = dir.join("out.zip");
        compress_backup(&dir.join("site.sqlite"), &data, &zip_path).unwrap();

        let mut archive = zip::ZipArchive::new(fs::File::open(&zip_path).unwrap()).unwrap();
        let mut content = String::new();
        archive
            .by_name("data/photos/3/a.jpg")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "jpeg");
        assert!(archive.by_name("site.sqlite").is_ok());
    }
}
