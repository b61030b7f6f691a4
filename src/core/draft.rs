//! Per-kind autosave of an in-progress SIDAK wizard.
//!
//! Each kind keeps at most one draft file, `sidak_draft_<kind>.json`, in the
//! drafts directory. A draft equal to the kind's initial state is never
//! written, and an unreadable file counts as "no draft".

use crate::errors::AppResult;
use crate::models::sidak::{ObserverInput, RecordInput, SessionHeader};
use crate::models::sidak_kind::SidakKind;
use crate::ui::messages::warning;
use crate::utils::date::month_abbr_id;
use chrono::{DateTime, Datelike, FixedOffset, Local, Timelike};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Wizard state worth recovering after a crash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardDraft {
    /// 1 = header, 2 = records, 3 = observers.
    pub step: u8,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub header: Option<SessionHeader>,
    #[serde(default)]
    pub records: Vec<RecordInput>,
    #[serde(default)]
    pub observers: Vec<ObserverInput>,
}

impl WizardDraft {
    pub fn initial() -> Self {
        Self {
            step: 1,
            session_id: None,
            header: None,
            records: Vec::new(),
            observers: Vec::new(),
        }
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::initial()
    }
}

#[derive(Serialize, Deserialize)]
struct DraftFile {
    saved_at: String,
    data: WizardDraft,
}

pub fn draft_key(kind: SidakKind) -> String {
    format!("sidak_draft_{}", kind.as_str())
}

pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, kind: SidakKind) -> PathBuf {
        self.dir.join(format!("{}.json", draft_key(kind)))
    }

    fn read(&self, kind: SidakKind) -> Option<DraftFile> {
        let path = self.path_for(kind);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<DraftFile>(&content) {
            Ok(f) => Some(f),
            Err(e) => {
                warning(format!("Ignoring unreadable draft {}: {}", path.display(), e));
                None
            }
        }
    }

    /// Persist `data` unless it equals the initial state.
    /// Returns whether a file was written.
    pub fn save_draft(&self, kind: SidakKind, data: &WizardDraft) -> AppResult<bool> {
        if data.is_initial() {
            return Ok(false);
        }

        fs::create_dir_all(&self.dir)?;
        let file = DraftFile {
            saved_at: Local::now().to_rfc3339(),
            data: data.clone(),
        };
        fs::write(self.path_for(kind), serde_json::to_string_pretty(&file)?)?;
        Ok(true)
    }

    pub fn has_draft(&self, kind: SidakKind) -> bool {
        self.read(kind).is_some()
    }

    /// RFC 3339 timestamp of the last save.
    pub fn draft_timestamp(&self, kind: SidakKind) -> Option<String> {
        self.read(kind).map(|f| f.saved_at)
    }

    pub fn get_saved_draft(&self, kind: SidakKind) -> Option<WizardDraft> {
        self.read(kind).map(|f| f.data)
    }

    /// The draft to resume from: the saved one, or a fresh initial state.
    pub fn restore_draft(&self, kind: SidakKind) -> WizardDraft {
        self.get_saved_draft(kind).unwrap_or_else(WizardDraft::initial)
    }

    pub fn clear_draft(&self, kind: SidakKind) -> AppResult<()> {
        let path = self.path_for(kind);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// The user chose not to resume: the draft is discarded.
    pub fn ignore_draft(&self, kind: SidakKind) -> AppResult<()> {
        self.clear_draft(kind)
    }
}

/// `2026-10-07T14:05:09+08:00` → `07 Okt 2026 14:05`; empty on bad input.
pub fn format_draft_timestamp(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };
    match DateTime::<FixedOffset>::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => format!(
            "{:02} {} {} {:02}:{:02}",
            dt.day(),
            month_abbr_id(dt.month()),
            dt.year(),
            dt.hour(),
            dt.minute()
        ),
        Err(_) => String::new(),
    }
}

/// Time source for [`DebouncedDraft`].
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Clock moved by hand, for tests and replays.
#[derive(Default)]
pub struct ManualClock {
    ms: Cell<u64>,
}

impl ManualClock {
    pub fn advance(&self, ms: u64) {
        self.ms.set(self.ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.ms.get())
    }
}

/// Coalesces rapid successive changes into one write, issued once
/// `debounce` has passed since the last change (or on [`flush`](Self::flush)).
pub struct DebouncedDraft<'a, C: Clock> {
    store: &'a DraftStore,
    kind: SidakKind,
    clock: C,
    debounce: Duration,
    pending: Option<WizardDraft>,
    changed_at: Duration,
}

impl<'a, C: Clock> DebouncedDraft<'a, C> {
    pub fn new(store: &'a DraftStore, kind: SidakKind, debounce_ms: u64, clock: C) -> Self {
        Self {
            store,
            kind,
            clock,
            debounce: Duration::from_millis(debounce_ms),
            pending: None,
            changed_at: Duration::ZERO,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn update(&mut self, data: WizardDraft) {
        self.pending = Some(data);
        self.changed_at = self.clock.now();
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Write the pending change if the debounce window has elapsed.
    pub fn tick(&mut self) -> AppResult<bool> {
        if self.pending.is_none() || self.clock.now() - self.changed_at < self.debounce {
            return Ok(false);
        }
        self.flush()
    }

    pub fn flush(&mut self) -> AppResult<bool> {
        match self.pending.take() {
            Some(data) => self.store.save_draft(self.kind, &data),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shift::Shift;
    use chrono::{NaiveDate, NaiveTime};

    fn store(name: &str) -> DraftStore {
        let dir = std::env::temp_dir().join(format!("rhse_drafts_{name}"));
        let _ = fs::remove_dir_all(&dir);
        DraftStore::new(dir)
    }

    fn with_header() -> WizardDraft {
        WizardDraft {
            header: Some(SessionHeader {
                date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
                time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                shift: Shift::One,
                location: "Pit 3".into(),
                department: "HSE".into(),
                company: "GECL".into(),
                sub_location: None,
                speed_limit_kph: None,
                workshop_name: None,
                area_pic: None,
                end_time: None,
            }),
            ..WizardDraft::initial()
        }
    }

    #[test]
    fn initial_state_is_not_saved() {
        let s = store("initial");
        assert!(!s.save_draft(SidakKind::Apd, &WizardDraft::initial()).unwrap());
        assert!(!s.has_draft(SidakKind::Apd));
    }

    #[test]
    fn save_restore_clear() {
        let s = store("cycle");
        assert!(s.save_draft(SidakKind::Rambu, &with_header()).unwrap());
        assert!(s.has_draft(SidakKind::Rambu));
        assert!(!s.has_draft(SidakKind::Apd));
        assert!(s.path_for(SidakKind::Rambu).ends_with("sidak_draft_rambu.json"));
        assert_eq!(s.restore_draft(SidakKind::Rambu), with_header());
        assert!(!format_draft_timestamp(s.draft_timestamp(SidakKind::Rambu).as_deref()).is_empty());

        s.ignore_draft(SidakKind::Rambu).unwrap();
        assert!(!s.has_draft(SidakKind::Rambu));
        assert_eq!(s.restore_draft(SidakKind::Rambu), WizardDraft::initial());
    }

    #[test]
    fn corrupt_file_is_no_draft() {
        let s = store("corrupt");
        fs::create_dir_all(&s.dir).unwrap();
        fs::write(s.path_for(SidakKind::Loto), "{not json").unwrap();
        assert!(!s.has_draft(SidakKind::Loto));
        assert!(s.get_saved_draft(SidakKind::Loto).is_none());
    }

    #[test]
    fn timestamp_formatting() {
        assert_eq!(
            format_draft_timestamp(Some("2026-10-17T14:05:09+08:00")),
            "17 Okt 2026 14:05"
        );
        assert_eq!(
            format_draft_timestamp(Some("2026-03-07T06:09:00+08:00")),
            "07 Mar 2026 06:09"
        );
        assert_eq!(format_draft_timestamp(Some("yesterday")), "");
        assert_eq!(format_draft_timestamp(None), "");
    }

    #[test]
    fn debounce_coalesces_changes() {
        let s = store("debounce");
        let mut d = DebouncedDraft::new(&s, SidakKind::Apd, 1000, ManualClock::default());

        d.update(with_header());
        d.clock().advance(600);
        assert!(!d.tick().unwrap());

        let mut second = with_header();
        second.step = 2;
        d.update(second.clone());
        d.clock().advance(600);
        assert!(!d.tick().unwrap());
        assert!(!s.has_draft(SidakKind::Apd));

        d.clock().advance(400);
        assert!(d.tick().unwrap());
        assert_eq!(s.get_saved_draft(SidakKind::Apd), Some(second));
        assert!(!d.has_pending());
    }

    #[test]
    fn flush_writes_immediately() {
        let s = store("flush");
        let mut d = DebouncedDraft::new(&s, SidakKind::Jarak, 1000, ManualClock::default());
        d.update(with_header());
        assert!(d.flush().unwrap());
        assert!(s.has_draft(SidakKind::Jarak));
        assert!(!d.flush().unwrap());
    }
}
