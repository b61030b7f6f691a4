use crate::cli::parser::{BlastCmd, Commands};
use crate::config::Config;
use crate::core::blast::{
    BlastLogic, BlastReport, DryRunSender, MessageSender, NotifymeSender, Outgoing,
    admin_progress_message, pickup_message,
};
use crate::core::employee::EmployeeLogic;
use crate::db::blast::list_blast_log;
use crate::db::employees::EmployeeFilter;
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::ui::messages::{info, item_result, success, warning};
use crate::utils::date::today;
use crate::utils::formatting::truncate;
use crate::utils::table::Table;

fn sender(cfg: &Config, dry_run: bool) -> AppResult<Box<dyn MessageSender>> {
    if dry_run {
        info("Dry run: nothing is sent.");
        Ok(Box::new(DryRunSender {
            verbose: true,
            ..Default::default()
        }))
    } else {
        Ok(Box::new(NotifymeSender::from_config(cfg)?))
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Blast { action } = cmd else {
        return Ok(());
    };

    let pool = open_db(&cfg.database)?;

    let report = match action {
        BlastCmd::Send {
            message,
            department,
            search,
            dry_run,
        } => {
            let filter = EmployeeFilter {
                department: department.clone(),
                search: search.clone(),
                active_only: true,
            };
            let s = sender(cfg, *dry_run)?;
            BlastLogic::blast(&pool, s.as_ref(), &filter, message)?
        }
        BlastCmd::SimperReminders { within, dry_run } => {
            let s = sender(cfg, *dry_run)?;
            BlastLogic::simper_reminders(&pool, s.as_ref(), today(), *within)?
        }
        BlastCmd::Admin { message, dry_run } => {
            let s = sender(cfg, *dry_run)?;
            BlastLogic::notify_admin(&pool, cfg, s.as_ref(), message)?
        }
        BlastCmd::Progress {
            nik,
            doc,
            status,
            dry_run,
        } => {
            let emp = EmployeeLogic::show(&pool, nik)?;
            let text = admin_progress_message(&emp.name, &emp.nik, doc, status);
            let s = sender(cfg, *dry_run)?;
            BlastLogic::notify_admin(&pool, cfg, s.as_ref(), &text)?
        }
        BlastCmd::Pickup { nik, doc, dry_run } => {
            let emp = EmployeeLogic::show(&pool, nik)?;
            let msg = Outgoing {
                recipient: emp.nik.clone(),
                phone: emp.phone.clone().unwrap_or_default(),
                text: pickup_message(&emp.name, doc),
            };
            let s = sender(cfg, *dry_run)?;
            BlastLogic::send_batch(&pool, s.as_ref(), &[msg])?
        }
        BlastCmd::Log { batch, limit } => {
            let rows = list_blast_log(&pool.conn, batch.as_deref(), *limit)?;
            if rows.is_empty() {
                info("No messages logged.");
                return Ok(());
            }
            let mut table = Table::new(
                &["Waktu", "Batch", "Penerima", "Nomor", "Status", "Error"],
                cfg.separator(),
            );
            for r in &rows {
                table.add_row(vec![
                    r.sent_at.clone(),
                    r.batch_id.clone(),
                    r.recipient.clone(),
                    r.phone.clone(),
                    r.status.clone(),
                    truncate(r.error.as_deref().unwrap_or("-"), 40),
                ]);
            }
            print!("{}", table.render());
            return Ok(());
        }
    };

    print_report(&report);
    Ok(())
}

fn print_report(r: &BlastReport) {
    for (who, why) in &r.failures {
        item_result(who, Err(why.as_str()));
    }

    if r.sent == 0 && r.failed == 0 {
        warning("No recipients matched.");
    } else if r.failed == 0 {
        success(format!("{} message(s) sent (batch {}).", r.sent, r.batch_id));
    } else {
        warning(format!(
            "{} sent, {} failed (batch {}).",
            r.sent, r.failed, r.batch_id
        ));
    }
}
