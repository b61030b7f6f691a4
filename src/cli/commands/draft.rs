use crate::cli::parser::{Commands, DraftCmd};
use crate::config::Config;
use crate::core::draft::{DraftStore, format_draft_timestamp};
use crate::errors::AppResult;
use crate::models::sidak_kind::SidakKind;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Draft { action } = cmd else {
        return Ok(());
    };

    let store = DraftStore::new(cfg.drafts_dir());

    match action {
        DraftCmd::List => {
            let mut table = Table::new(&["Jenis", "Langkah", "Sesi", "Sampel", "Disimpan"], cfg.separator());
            for kind in SidakKind::ALL {
                let Some(draft) = store.get_saved_draft(kind) else {
                    continue;
                };
                table.add_row(vec![
                    kind.as_str().to_string(),
                    draft.step.to_string(),
                    draft
                        .session_id
                        .map(|id| format!("#{id}"))
                        .unwrap_or_else(|| "-".into()),
                    draft.records.len().to_string(),
                    format_draft_timestamp(store.draft_timestamp(kind).as_deref()),
                ]);
            }

            if table.is_empty() {
                info("No saved drafts.");
            } else {
                print!("{}", table.render());
            }
        }
        DraftCmd::Show { kind } => match store.get_saved_draft(*kind) {
            Some(draft) => {
                header(format!(
                    "Draft {} (saved {})",
                    kind,
                    format_draft_timestamp(store.draft_timestamp(*kind).as_deref())
                ));
                println!("{}", serde_json::to_string_pretty(&draft)?);
                if let Some(id) = draft.session_id {
                    info(format!("Resume with `rhse sidak record {id} ...`."));
                }
            }
            None => warning(format!("No draft saved for {kind}.")),
        },
        DraftCmd::Clear { kind } => {
            if store.has_draft(*kind) {
                store.ignore_draft(*kind)?;
                success(format!("Draft for {kind} discarded."));
            } else {
                warning(format!("No draft saved for {kind}."));
            }
        }
    }

    Ok(())
}
