//! Document library (PDF only) and news posts.

use crate::config::Config;
use crate::db::content as queries;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::document::Document;
use crate::models::news::News;
use crate::utils::path::{extension_lower, stored_file_name};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A file is accepted only with a `.pdf` extension and PDF magic bytes.
pub fn check_pdf(path: &Path) -> AppResult<()> {
    if extension_lower(path).as_deref() != Some("pdf") {
        return Err(AppError::InvalidFile(format!(
            "{}: only PDF files are accepted",
            path.display()
        )));
    }

    let mut head = [0u8; 5];
    let mut f = fs::File::open(path)
        .map_err(|e| AppError::InvalidFile(format!("{}: {}", path.display(), e)))?;
    match f.read_exact(&mut head) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(AppError::InvalidFile(format!(
                "{}: file too short to be a PDF document",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    }
    if head[..] != *PDF_MAGIC {
        return Err(AppError::InvalidFile(format!(
            "{}: content is not a PDF document",
            path.display()
        )));
    }
    Ok(())
}

pub struct DocumentLogic;

impl DocumentLogic {
    pub fn upload(
        pool: &mut DbPool,
        cfg: &Config,
        src: &Path,
        title: Option<&str>,
        category: &str,
        uploaded_by: Option<&str>,
    ) -> AppResult<Document> {
        check_pdf(src)?;

        let file_name = src
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => src
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| file_name.clone()),
        };

        let dir = cfg.documents_dir();
        fs::create_dir_all(&dir)?;
        let dest = dir.join(stored_file_name("doc", src));
        let size = fs::copy(src, &dest)? as i64;

        let id = queries::insert_document(
            &pool.conn,
            &title,
            category,
            &file_name,
            &dest.to_string_lossy(),
            size,
            uploaded_by,
        )?;
        ttlog_quiet(&pool.conn, "upload", &format!("document #{}", id), &title);
        queries::get_document(&pool.conn, id)
    }

    pub fn list(pool: &DbPool, category: Option<&str>, active_only: bool) -> AppResult<Vec<Document>> {
        queries::list_documents(&pool.conn, category, active_only)
    }

    pub fn set_active(pool: &mut DbPool, id: i64, active: bool) -> AppResult<()> {
        queries::set_document_active(&pool.conn, id, active)?;
        let msg = if active { "Document activated" } else { "Document deactivated" };
        ttlog_quiet(&pool.conn, "edit", &format!("document #{}", id), msg);
        Ok(())
    }

    /// Remove the row and its stored file.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<()> {
        let doc = queries::get_document(&pool.conn, id)?;
        queries::delete_document(&pool.conn, id)?;
        if let Err(e) = fs::remove_file(&doc.stored_path) {
            crate::ui::messages::warning(format!("Could not remove {}: {}", doc.stored_path, e));
        }
        ttlog_quiet(&pool.conn, "del", &format!("document #{}", id), &doc.title);
        Ok(())
    }
}

pub struct NewsLogic;

impl NewsLogic {
    pub fn add(pool: &mut DbPool, title: &str, content: &str, category: &str, author: Option<&str>) -> AppResult<News> {
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(AppError::Validation("news needs a title and content".into()));
        }
        let id = queries::insert_news(&pool.conn, title.trim(), content.trim(), category, author)?;
        ttlog_quiet(&pool.conn, "add", &format!("news #{}", id), title);
        queries::get_news(&pool.conn, id)
    }

    pub fn list(pool: &DbPool, include_inactive: bool) -> AppResult<Vec<News>> {
        queries::list_news(&pool.conn, include_inactive)
    }

    /// Flip the active flag; returns the new value.
    pub fn toggle(pool: &mut DbPool, id: i64) -> AppResult<bool> {
        let news = queries::get_news(&pool.conn, id)?;
        let active = !news.active;
        queries::set_news_active(&pool.conn, id, active)?;
        ttlog_quiet(&pool.conn, "edit", &format!("news #{}", id), if active { "Shown" } else { "Hidden" });
        Ok(active)
    }

    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<()> {
        queries::delete_news(&pool.conn, id)?;
        ttlog_quiet(&pool.conn, "del", &format!("news #{}", id), "News deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::test_pool;

    fn cfg(name: &str) -> Config {
        let dir = std::env::temp_dir().join(format!("rhse_docs_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        Config::with_database(dir.join("t.sqlite"))
    }

    #[test]
    fn only_real_pdfs_are_uploaded() {
        let cfg = cfg("upload");
        let mut pool = test_pool();
        let dir = cfg.data_dir();
        fs::create_dir_all(&dir).unwrap();

        let fake = dir.join("fake.pdf");
        fs::write(&fake, b"hello").unwrap();
        let wrong_ext = dir.join("real.txt");
        fs::write(&wrong_ext, b"%PDF-1.7\n").unwrap();
        let good = dir.join("SOP Hauling.pdf");
        fs::write(&good, b"%PDF-1.7\n%%EOF\n").unwrap();

        assert!(matches!(
            DocumentLogic::upload(&mut pool, &cfg, &fake, None, "sop", None),
            Err(AppError::InvalidFile(_))
        ));
        assert!(matches!(
            DocumentLogic::upload(&mut pool, &cfg, &wrong_ext, None, "sop", None),
            Err(AppError::InvalidFile(_))
        ));

        let doc = DocumentLogic::upload(&mut pool, &cfg, &good, None, "sop", Some("admin")).unwrap();
        assert_eq!(doc.title, "SOP Hauling");
        assert_eq!(doc.size_bytes, 15);
        assert!(Path::new(&doc.stored_path).exists());

        DocumentLogic::set_active(&mut pool, doc.id, false).unwrap();
        assert!(DocumentLogic::list(&pool, Some("sop"), true).unwrap().is_empty());
        assert_eq!(DocumentLogic::list(&pool, None, false).unwrap().len(), 1);

        DocumentLogic::delete(&mut pool, doc.id).unwrap();
        assert!(!Path::new(&doc.stored_path).exists());
    }

    #[test]
    fn short_files_fail_the_magic_check() {
        let dir = cfg("short").data_dir();
        fs::create_dir_all(&dir).unwrap();

        let short = dir.join("short.pdf");
        fs::write(&short, b"%PD").unwrap();
        assert!(matches!(check_pdf(&short), Err(AppError::InvalidFile(_))));

        let empty = dir.join("empty.pdf");
        fs::write(&empty, b"").unwrap();
        assert!(matches!(check_pdf(&empty), Err(AppError::InvalidFile(_))));

        let minimal = dir.join("minimal.pdf");
        fs::write(&minimal, b"%PDF-").unwrap();
        assert!(check_pdf(&minimal).is_ok());
    }

    #[test]
    fn news_toggle_hides_from_default_list() {
        let mut pool = test_pool();
        let n = NewsLogic::add(&mut pool, "Zero Accident", "Bulan ke-6 tanpa LTI", "umum", None).unwrap();
        assert_eq!(NewsLogic::list(&pool, false).unwrap().len(), 1);
        assert!(!NewsLogic::toggle(&mut pool, n.id).unwrap());
        assert!(NewsLogic::list(&pool, false).unwrap().is_empty());
        assert_eq!(NewsLogic::list(&pool, true).unwrap().len(), 1);
        NewsLogic::delete(&mut pool, n.id).unwrap();
        assert!(NewsLogic::add(&mut pool, " ", "x", "umum", None).is_err());
    }
}
