use crate::cli::parser::{Commands, DocumentCmd};
use crate::config::Config;
use crate::core::content::DocumentLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::ui::messages::{item_result, success, warning};
use crate::utils::formatting::{truncate, yes_no};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Document { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;

    match action {
        DocumentCmd::Upload {
            files,
            title,
            category,
            uploaded_by,
        } => {
            if title.is_some() && files.len() > 1 {
                warning("--title is ignored when uploading several files.");
            }
            let title = if files.len() == 1 { title.as_deref() } else { None };

            let mut ok = 0;
            for src in files {
                match DocumentLogic::upload(&mut pool, cfg, src, title, category, uploaded_by.as_deref()) {
                    Ok(doc) => {
                        ok += 1;
                        item_result(src.display(), Ok(format!("#{} {}", doc.id, doc.title).as_str()));
                    }
                    Err(e) => item_result(src.display(), Err(e.to_string().as_str())),
                }
            }

            if ok == files.len() {
                success(format!("{ok} document(s) uploaded."));
            } else {
                warning(format!("{} of {} document(s) uploaded.", ok, files.len()));
            }
        }
        DocumentCmd::List { category, all } => {
            let docs = DocumentLogic::list(&pool, category.as_deref(), !*all)?;
            if docs.is_empty() {
                warning("No documents found.");
                return Ok(());
            }

            let mut table = Table::new(
                &["ID", "Judul", "Kategori", "File", "Ukuran", "Aktif", "Diunggah"],
                cfg.separator(),
            );
            for d in &docs {
                table.add_row(vec![
                    d.id.to_string(),
                    truncate(&d.title, 32),
                    d.category.clone(),
                    truncate(&d.file_name, 28),
                    format!("{:.1} KB", d.size_bytes as f64 / 1024.0),
                    yes_no(d.active).to_string(),
                    d.created_at.clone(),
                ]);
            }
            print!("{}", table.render());
        }
        DocumentCmd::Activate { id } => {
            DocumentLogic::set_active(&mut pool, *id, true)?;
            success(format!("Document #{id} activated."));
        }
        DocumentCmd::Deactivate { id } => {
            DocumentLogic::set_active(&mut pool, *id, false)?;
            success(format!("Document #{id} deactivated."));
        }
        DocumentCmd::Del { id } => {
            DocumentLogic::delete(&mut pool, *id)?;
            success(format!("Document #{id} deleted."));
        }
    }

    Ok(())
}
