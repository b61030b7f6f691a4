use crate::db::log::{LogEntry, load_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::info;
use ansi_term::Colour;
use regex::Regex;
use std::sync::OnceLock;

const OP_TARGET_MAX: usize = 60;

fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    match RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").ok()) {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    }
}

/// ANSI colour of an operation name.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "import" | "upload" | "create" => Colour::Green,
        "del" | "delete" => Colour::Red,
        "edit" | "status" | "toggle" | "deactivate" | "activate" => Colour::Yellow,
        "attendance" | "meeting_attend" => Colour::Cyan,
        "blast" => Colour::RGB(37, 211, 102),
        "stats" => Colour::RGB(102, 153, 255),
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        other if other.starts_with("sidak_") => Colour::RGB(255, 204, 0),
        other if other.starts_with("migrate_to_") => Colour::Purple,
        _ => Colour::White,
    }
}

/// `operation (target)` cut to [`OP_TARGET_MAX`] visible characters, with
/// only the operation word coloured.
fn render_op_target(entry: &LogEntry) -> String {
    let visible = if entry.target.is_empty() {
        entry.operation.clone()
    } else {
        format!("{} ({})", entry.operation, entry.target)
    };

    let truncated = if visible.chars().count() > OP_TARGET_MAX {
        let mut s: String = visible.chars().take(OP_TARGET_MAX - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    let color = color_for_operation(&entry.operation);
    match truncated.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(truncated.as_str()).to_string(),
    }
}

fn display_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = load_log(&pool.conn)?;

        if entries.is_empty() {
            info("The internal log is empty.");
            return Ok(());
        }

        let rendered: Vec<(i64, String, String, &str)> = entries
            .iter()
            .map(|e| {
                (
                    e.id,
                    display_date(&e.date),
                    render_op_target(e),
                    e.message.as_str(),
                )
            })
            .collect();

        let op_w = rendered
            .iter()
            .map(|(_, _, op, _)| strip_ansi(op).chars().count())
            .max()
            .unwrap_or(10)
            .min(OP_TARGET_MAX);
        let id_w = rendered
            .iter()
            .map(|(id, _, _, _)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = rendered
            .iter()
            .map(|(_, date, _, _)| date.len())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, op_target, message) in rendered {
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op_target).chars().count()));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                id,
                date,
                op_target,
                padding,
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(op: &str, target: &str) -> LogEntry {
        LogEntry {
            id: 1,
            date: "2026-10-17T08:00:00+08:00".into(),
            operation: op.into(),
            target: target.into(),
            message: String::new(),
        }
    }

    #[test]
    fn long_targets_are_truncated_without_counting_ansi() {
        let long = "x".repeat(100);
        let out = render_op_target(&entry("sidak_record", &long));
        let visible = strip_ansi(&out);
        assert_eq!(visible.chars().count(), OP_TARGET_MAX);
        assert!(visible.starts_with("sidak_record ("));
        assert!(visible.ends_with("..."));
    }

    #[test]
    fn empty_target_shows_operation_only() {
        let out = strip_ansi(&render_op_target(&entry("init", "")));
        assert_eq!(out, "init");
    }
}
