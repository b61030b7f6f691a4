//! WhatsApp notifications: phone normalisation, message templates,
//! senders, and per-recipient batch delivery.

use crate::config::Config;
use crate::db::blast::insert_blast_log;
use crate::db::employees::{self, EmployeeFilter};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, LicenseKind};
use crate::ui::messages::info;
use crate::utils::date::{days_between, format_date_id};
use chrono::{Local, NaiveDate};
use rand::Rng;
use std::cell::RefCell;
use std::time::Duration;

pub const API_KEY_MISSING: &str = "API key not configured";

/// `0812-3456 789` → `628123456789`. Empty input stays empty.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return digits;
    }
    if let Some(rest) = digits.strip_prefix('0') {
        format!("62{rest}")
    } else if digits.starts_with("62") {
        digits
    } else {
        format!("62{digits}")
    }
}

pub fn urgency_label(days_left: i64) -> &'static str {
    if days_left <= 7 {
        "🔴 URGENT"
    } else if days_left <= 14 {
        "🟠 PENTING"
    } else {
        "🟡 REMINDER"
    }
}

pub fn simper_reminder_message(name: &str, license: LicenseKind, days_left: i64, expiry: NaiveDate) -> String {
    let doc = license.label();
    let date = format_date_id(expiry);

    if days_left < 0 {
        return format!(
            "⚠️ *PERINGATAN {doc} EXPIRED*\n\n\
             Halo {name},\n\n\
             {doc} Anda sudah *EXPIRED* {} hari yang lalu ({date}).\n\n\
             Segera urus perpanjangannya!\n\n\
             - OneTalent GECL",
            days_left.abs()
        );
    }

    format!(
        "{} *Reminder {doc}*\n\n\
         Halo {name},\n\n\
         {doc} Anda akan expired dalam *{days_left} hari* ({date}).\n\n\
         Mohon segera urus perpanjangannya.\n\n\
         - OneTalent GECL",
        urgency_label(days_left)
    )
}

pub fn admin_progress_message(employee_name: &str, nik: &str, doc_type: &str, status: &str) -> String {
    format!(
        "📋 *Update Status {doc_type}*\n\n\
         Karyawan: {employee_name}\n\
         NIK: {nik}\n\
         Status: {status}\n\n\
         - OneTalent GECL"
    )
}

pub fn pickup_message(name: &str, doc_type: &str) -> String {
    format!(
        "📦 *{doc_type} Siap Diambil*\n\n\
         Halo {name},\n\n\
         {doc_type} Anda sudah selesai diproses dan dapat diambil di kantor.\n\n\
         Terima kasih,\n\
         - OneTalent GECL"
    )
}

/// Fill `{nama}`, `{nik}` and `{departemen}` for one employee.
pub fn render_template(template: &str, emp: &Employee) -> String {
    template
        .replace("{nama}", &emp.name)
        .replace("{nik}", &emp.nik)
        .replace("{departemen}", &emp.department)
}

/// Delivers one text message to one (normalised) phone number.
pub trait MessageSender {
    fn send(&self, phone: &str, text: &str) -> AppResult<()>;
}

/// Notifyme HTTP gateway.
pub struct NotifymeSender {
    client: reqwest::blocking::Client,
    url: String,
    api_key: Option<String>,
}

impl NotifymeSender {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| AppError::Messaging(e.to_string()))?;

        Ok(Self {
            client,
            url: cfg.whatsapp_api_url.clone(),
            api_key: cfg.whatsapp_api_key.clone().filter(|k| !k.trim().is_empty()),
        })
    }
}

impl MessageSender for NotifymeSender {
    fn send(&self, phone: &str, text: &str) -> AppResult<()> {
        let Some(key) = &self.api_key else {
            return Err(AppError::Messaging(API_KEY_MISSING.into()));
        };

        let resp = self
            .client
            .get(&self.url)
            .query(&[("apikey", key.as_str()), ("mtype", "text"), ("receiver", phone), ("text", text)])
            .send()
            .map_err(|e| AppError::Messaging(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = resp.text().unwrap_or_default();
            Err(AppError::Messaging(format!("HTTP {}: {}", status, body.trim())))
        }
    }
}

/// Prints instead of sending and keeps what it would have sent.
#[derive(Default)]
pub struct DryRunSender {
    pub sent: RefCell<Vec<(String, String)>>,
    pub verbose: bool,
}

impl MessageSender for DryRunSender {
    fn send(&self, phone: &str, text: &str) -> AppResult<()> {
        if self.verbose {
            info(format!("[dry-run] → {}\n{}\n", phone, text));
        }
        self.sent.borrow_mut().push((phone.to_string(), text.to_string()));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Outgoing {
    pub recipient: String,
    pub phone: String,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct BlastReport {
    pub batch_id: String,
    pub sent: usize,
    pub failed: usize,
    pub failures: Vec<(String, String)>,
}

fn new_batch_id() -> String {
    let suffix: u16 = rand::thread_rng().r#gen();
    format!("blast_{}_{:04x}", Local::now().format("%Y%m%d%H%M%S"), suffix)
}

pub struct BlastLogic;

impl BlastLogic {
    /// Send every message in turn. A failure is logged and the loop goes on.
    pub fn send_batch(pool: &DbPool, sender: &dyn MessageSender, messages: &[Outgoing]) -> AppResult<BlastReport> {
        let mut report = BlastReport {
            batch_id: new_batch_id(),
            ..Default::default()
        };

        for m in messages {
            let phone = normalize_phone(&m.phone);
            let outcome = if phone.is_empty() {
                Err(AppError::Messaging("no phone number".into()))
            } else {
                sender.send(&phone, &m.text)
            };

            match outcome {
                Ok(()) => {
                    report.sent += 1;
                    insert_blast_log(&pool.conn, &report.batch_id, &phone, &m.recipient, None)?;
                }
                Err(e) => {
                    let reason = match e {
                        AppError::Messaging(msg) => msg,
                        other => other.to_string(),
                    };
                    report.failed += 1;
                    insert_blast_log(&pool.conn, &report.batch_id, &phone, &m.recipient, Some(&reason))?;
                    report.failures.push((m.recipient.clone(), reason));
                }
            }
        }

        ttlog_quiet(
            &pool.conn,
            "blast",
            &report.batch_id,
            &format!("{} sent, {} failed", report.sent, report.failed),
        );
        Ok(report)
    }

    /// Free-form message to employees matching `filter`; placeholders are filled per person.
    pub fn blast(pool: &DbPool, sender: &dyn MessageSender, filter: &EmployeeFilter, template: &str) -> AppResult<BlastReport> {
        let messages: Vec<Outgoing> = employees::list_employees(&pool.conn, filter)?
            .into_iter()
            .map(|e| Outgoing {
                recipient: format!("{} ({})", e.name, e.nik),
                phone: e.phone.clone().unwrap_or_default(),
                text: render_template(template, &e),
            })
            .collect();
        Self::send_batch(pool, sender, &messages)
    }

    /// Reminder for every licence that expires within `within_days` or has expired.
    pub fn reminder_messages(pool: &DbPool, today: NaiveDate, within_days: i64) -> AppResult<Vec<Outgoing>> {
        let filter = EmployeeFilter {
            active_only: true,
            ..Default::default()
        };

        let mut out = Vec::new();
        for e in employees::list_employees(&pool.conn, &filter)? {
            for (license, expiry) in e.licenses() {
                let Some(date) = expiry else {
                    continue;
                };
                let days = days_between(today, date);
                if days <= within_days {
                    out.push(Outgoing {
                        recipient: format!("{} ({}) {}", e.name, e.nik, license.label()),
                        phone: e.phone.clone().unwrap_or_default(),
                        text: simper_reminder_message(&e.name, license, days, date),
                    });
                }
            }
        }
        Ok(out)
    }

    pub fn simper_reminders(pool: &DbPool, sender: &dyn MessageSender, today: NaiveDate, within_days: i64) -> AppResult<BlastReport> {
        let messages = Self::reminder_messages(pool, today, within_days)?;
        Self::send_batch(pool, sender, &messages)
    }

    pub fn notify_admin(pool: &DbPool, cfg: &Config, sender: &dyn MessageSender, text: &str) -> AppResult<BlastReport> {
        let msg = Outgoing {
            recipient: "admin".into(),
            phone: cfg.admin_phone.clone(),
            text: text.to_string(),
        };
        Self::send_batch(pool, sender, &[msg])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::blast::list_blast_log;
    use crate::db::initialize::test_pool;
    use std::path::PathBuf;

    #[test]
    fn phone_normalisation() {
        assert_eq!(normalize_phone("0812-3456-789"), "628123456789");
        assert_eq!(normalize_phone("+62 812 3456"), "628123456");
        assert_eq!(normalize_phone("8123"), "628123");
        assert_eq!(normalize_phone("  "), "");
    }

    #[test]
    fn urgency_levels() {
        assert_eq!(urgency_label(7), "🔴 URGENT");
        assert_eq!(urgency_label(8), "🟠 PENTING");
        assert_eq!(urgency_label(14), "🟠 PENTING");
        assert_eq!(urgency_label(15), "🟡 REMINDER");

        let d = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let expired = simper_reminder_message("Budi", LicenseKind::SimperBib, -3, d);
        assert!(expired.contains("EXPIRED* 3 hari yang lalu"));
        assert!(expired.ends_with("- OneTalent GECL"));
        assert!(simper_reminder_message("Budi", LicenseKind::Sim, 5, d).starts_with("🔴 URGENT *Reminder SIMPOL*"));
    }

    #[test]
    fn placeholders_are_filled() {
        let e = Employee {
            nik: "C-1".into(),
            name: "Sari".into(),
            position: String::new(),
            department: "Hauling".into(),
            company: String::new(),
            phone: None,
            shift: None,
            sim_expiry: None,
            simper_bib_expiry: None,
            simper_tia_expiry: None,
            active: true,
            created_at: String::new(),
        };
        assert_eq!(
            render_template("Halo {nama} ({nik}) dari {departemen}", &e),
            "Halo Sari (C-1) dari Hauling"
        );
    }

    #[test]
    fn missing_api_key_fails_every_recipient() {
        let pool = test_pool();
        let mut cfg = Config::with_database(PathBuf::from("/tmp/unused.sqlite"));
        cfg.whatsapp_api_key = None;
        let sender = NotifymeSender::from_config(&cfg).unwrap();

        let msgs = vec![
            Outgoing { recipient: "A".into(), phone: "0811".into(), text: "x".into() },
            Outgoing { recipient: "B".into(), phone: "0812".into(), text: "y".into() },
        ];
        let report = BlastLogic::send_batch(&pool, &sender, &msgs).unwrap();
        assert_eq!((report.sent, report.failed), (0, 2));
        assert_eq!(report.failures[0].1, API_KEY_MISSING);

        let log = list_blast_log(&pool.conn, Some(&report.batch_id), 10).unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|l| l.status == "failed"));
    }

    #[test]
    fn batch_continues_after_failure() {
        let pool = test_pool();
        let sender = DryRunSender::default();
        let msgs = vec![
            Outgoing { recipient: "no phone".into(), phone: String::new(), text: "x".into() },
            Outgoing { recipient: "ok".into(), phone: "0813 1111".into(), text: "y".into() },
        ];
        let report = BlastLogic::send_batch(&pool, &sender, &msgs).unwrap();
        assert_eq!((report.sent, report.failed), (1, 1));
        assert_eq!(sender.sent.borrow()[0].0, "628131111");
    }
}
