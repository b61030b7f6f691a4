use crate::cli::parser::{Commands, NewsCmd};
use crate::config::Config;
use crate::core::content::NewsLogic;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREY, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::News { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;

    match action {
        NewsCmd::Add {
            title,
            content,
            category,
            author,
        } => {
            let n = NewsLogic::add(&mut pool, title, content, category, author.as_deref())?;
            success(format!("News #{} \"{}\" published.", n.id, n.title));
        }
        NewsCmd::List { all } => {
            let items = NewsLogic::list(&pool, *all)?;
            if items.is_empty() {
                info("No news.");
                return Ok(());
            }
            for n in &items {
                let dim = if n.active { "" } else { GREY };
                println!(
                    "{}#{} [{}] {} ({}{}){}",
                    dim,
                    n.id,
                    n.category,
                    n.title,
                    n.created_at,
                    n.author.as_deref().map(|a| format!(", {a}")).unwrap_or_default(),
                    RESET
                );
                println!("{}    {}{}\n", dim, n.content, RESET);
            }
        }
        NewsCmd::Toggle { id } => {
            let active = NewsLogic::toggle(&mut pool, *id)?;
            success(format!(
                "News #{} is now {}.",
                id,
                if active { "visible" } else { "hidden" }
            ));
        }
        NewsCmd::Del { id } => {
            NewsLogic::delete(&mut pool, *id)?;
            success(format!("News #{id} deleted."));
        }
    }

    Ok(())
}
