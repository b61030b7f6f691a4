//! The SIDAK wizard: header, records, observers, finish.
//!
//! Every step is its own persisted mutation and mirrors its progress into
//! the kind's draft so an interrupted run can be resumed.

use crate::config::Config;
use crate::core::draft::{DebouncedDraft, DraftStore, SystemClock, WizardDraft};
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::sidak as queries;
use crate::errors::{AppError, AppResult};
use crate::models::sidak::{
    ObserverInput, RecordInput, Session, SessionDetail, SessionHeader, SessionSummary,
};
use crate::models::sidak_kind::SidakKind;
use crate::utils::path::{extension_lower, stored_file_name};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SPEED_LIMIT_KPH: f64 = 40.0;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Decode a signature (data URL or bare base64) and check it is a PNG.
pub fn decode_signature(raw: &str) -> AppResult<Vec<u8>> {
    let trimmed = raw.trim();
    let b64 = match trimmed.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:image/png") => data,
        Some((prefix, _)) => {
            return Err(AppError::Validation(format!(
                "signature must be a PNG image, got '{}'",
                prefix.trim_start_matches("data:")
            )));
        }
        None => trimmed,
    };

    let bytes = STANDARD
        .decode(b64.trim())
        .map_err(|e| AppError::Validation(format!("signature is not valid base64: {e}")))?;

    if !bytes.starts_with(PNG_MAGIC) {
        return Err(AppError::Validation("signature is not a PNG image".into()));
    }
    Ok(bytes)
}

/// Per-file outcome of [`SidakLogic::attach_photos`].
#[derive(Debug)]
pub struct PhotoOutcome {
    pub source: PathBuf,
    pub result: AppResult<i64>,
}

/// A saved draft whose session is still open and can be continued.
#[derive(Debug)]
pub struct PendingDraft {
    pub session_id: i64,
    /// RFC 3339, see [`format_draft_timestamp`](crate::core::draft::format_draft_timestamp).
    pub saved_at: Option<String>,
    pub draft: WizardDraft,
}

pub struct SidakLogic;

impl SidakLogic {
    fn drafts(cfg: &Config) -> DraftStore {
        DraftStore::new(cfg.drafts_dir())
    }

    /// Apply `change` to the kind's draft and save it through the debouncer,
    /// flushing before the command returns. Draft problems never fail a step.
    fn touch_draft<F: FnOnce(&mut WizardDraft)>(cfg: &Config, kind: SidakKind, session_id: i64, change: F) {
        let store = Self::drafts(cfg);
        let mut draft = store.restore_draft(kind);
        if draft.session_id != Some(session_id) {
            draft = WizardDraft {
                session_id: Some(session_id),
                ..WizardDraft::initial()
            };
        }
        change(&mut draft);

        let mut debounced = DebouncedDraft::new(&store, kind, cfg.draft_debounce_ms, SystemClock::default());
        debounced.update(draft);
        if let Err(e) = debounced.flush() {
            crate::ui::messages::warning(format!("Draft not saved: {}", e));
        }
    }

    /// The kind's resumable draft. A draft whose session was finished or
    /// deleted is stale and gets removed.
    pub fn pending_draft(pool: &DbPool, cfg: &Config, kind: SidakKind) -> AppResult<Option<PendingDraft>> {
        let store = Self::drafts(cfg);
        let Some(draft) = store.get_saved_draft(kind) else {
            return Ok(None);
        };

        let open = match draft.session_id {
            Some(id) => queries::find_session(&pool.conn, id)?
                .filter(|s| !s.is_finished() && s.kind == kind)
                .map(|_| id),
            None => None,
        };

        match open {
            Some(session_id) => Ok(Some(PendingDraft {
                session_id,
                saved_at: store.draft_timestamp(kind),
                draft,
            })),
            None => {
                store.ignore_draft(kind)?;
                Ok(None)
            }
        }
    }

    /// Drop the kind's draft so a new session may be started.
    pub fn discard_draft(cfg: &Config, kind: SidakKind) -> AppResult<()> {
        Self::drafts(cfg).ignore_draft(kind)
    }

    fn validate_header(kind: SidakKind, header: &mut SessionHeader) -> AppResult<()> {
        if header.location.trim().is_empty() {
            return Err(AppError::Validation("location is required".into()));
        }

        match kind {
            SidakKind::Kecepatan => {
                let limit = *header.speed_limit_kph.get_or_insert(DEFAULT_SPEED_LIMIT_KPH);
                if limit <= 0.0 {
                    return Err(AppError::Validation("speed limit must be greater than 0".into()));
                }
            }
            SidakKind::Workshop => {
                let name = header.workshop_name.as_deref().map(str::trim).unwrap_or("");
                if name.is_empty() {
                    return Err(AppError::Validation("workshop name is required".into()));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn open_session(pool: &DbPool, session_id: i64) -> AppResult<Session> {
        let session = queries::get_session(&pool.conn, session_id)?;
        if session.is_finished() {
            return Err(AppError::SessionFinished(session_id));
        }
        Ok(session)
    }

    /// Step 1: validate and store the header. Returns the new session id.
    pub fn start_session(
        pool: &mut DbPool,
        cfg: &Config,
        kind: SidakKind,
        mut header: SessionHeader,
        created_by: Option<&str>,
    ) -> AppResult<i64> {
        Self::validate_header(kind, &mut header)?;

        if let Some(p) = Self::pending_draft(pool, cfg, kind)? {
            return Err(AppError::DraftPending {
                kind: kind.to_string(),
                session_id: p.session_id,
            });
        }

        let id = queries::insert_session(&pool.conn, kind, &header, created_by)?;
        ttlog_quiet(
            &pool.conn,
            "sidak_start",
            &format!("{} #{}", kind, id),
            &format!("{} {} @ {}", header.date, header.shift, header.location),
        );

        Self::touch_draft(cfg, kind, id, |d| {
            d.step = 2;
            d.header = Some(header);
        });

        Ok(id)
    }

    /// Step 2: append one inspected item. Returns its ordinal.
    pub fn add_record(pool: &mut DbPool, cfg: &Config, session_id: i64, record: RecordInput) -> AppResult<i64> {
        let session = Self::open_session(pool, session_id)?;
        let kind = session.kind;

        if record.name.trim().is_empty() {
            let what = if kind.records_are_equipment() { "description" } else { "name" };
            return Err(AppError::Validation(format!("{what} is required")));
        }
        if record.checklist.kind() != kind {
            return Err(AppError::Validation(format!(
                "{} checklist cannot be added to a {} session",
                record.checklist.kind(),
                kind
            )));
        }

        let current = queries::count_records(&pool.conn, session_id)? as usize;
        if current >= kind.max_records() {
            return Err(AppError::LimitReached(format!(
                "{} sessions accept at most {} records",
                kind,
                kind.max_records()
            )));
        }

        let (_, ordinal) = queries::insert_record(&pool.conn, session_id, &record)?;
        ttlog_quiet(
            &pool.conn,
            "sidak_record",
            &format!("{} #{}", kind, session_id),
            &format!("Record {}: {}", ordinal, record.name),
        );

        Self::touch_draft(cfg, kind, session_id, |d| {
            d.step = 2;
            d.header.get_or_insert(session.header.clone());
            d.records.push(record);
        });

        Ok(ordinal)
    }

    /// Step 3: attach an observer sign-off. Returns its ordinal.
    pub fn add_observer(pool: &mut DbPool, cfg: &Config, session_id: i64, observer: ObserverInput) -> AppResult<i64> {
        let session = Self::open_session(pool, session_id)?;
        let kind = session.kind;

        if observer.name.trim().is_empty() {
            return Err(AppError::Validation("observer name is required".into()));
        }

        if let Some(max) = kind.max_observers() {
            let current = queries::count_observers(&pool.conn, session_id)? as usize;
            if current >= max {
                return Err(AppError::LimitReached(format!(
                    "{} sessions accept at most {} observers",
                    kind, max
                )));
            }
        }

        decode_signature(&observer.signature)?;

        let (_, ordinal) = queries::insert_observer(&pool.conn, session_id, &observer)?;
        ttlog_quiet(
            &pool.conn,
            "sidak_observer",
            &format!("{} #{}", kind, session_id),
            &format!("Observer {}: {}", ordinal, observer.name),
        );

        Self::touch_draft(cfg, kind, session_id, |d| {
            d.step = 3;
            d.header.get_or_insert(session.header.clone());
            d.observers.push(observer);
        });

        Ok(ordinal)
    }

    /// Close the session: at least one record and one observer are required.
    pub fn finish_session(pool: &mut DbPool, cfg: &Config, session_id: i64) -> AppResult<SessionDetail> {
        let session = Self::open_session(pool, session_id)?;

        let records = queries::count_records(&pool.conn, session_id)?;
        if records == 0 {
            return Err(AppError::Validation("add at least one record before finishing".into()));
        }
        if queries::count_observers(&pool.conn, session_id)? == 0 {
            return Err(AppError::Validation("add at least one observer before finishing".into()));
        }

        queries::mark_finished(&pool.conn, session_id, records)?;
        ttlog_quiet(
            &pool.conn,
            "sidak_finish",
            &format!("{} #{}", session.kind, session_id),
            &format!("{} samples", records),
        );

        let store = Self::drafts(cfg);
        if store.get_saved_draft(session.kind).and_then(|d| d.session_id) == Some(session_id) {
            store.clear_draft(session.kind)?;
        }

        Self::detail(pool, session_id)
    }

    pub fn detail(pool: &DbPool, session_id: i64) -> AppResult<SessionDetail> {
        Ok(SessionDetail {
            session: queries::get_session(&pool.conn, session_id)?,
            records: queries::load_records(&pool.conn, session_id)?,
            observers: queries::load_observers(&pool.conn, session_id)?,
            photos: queries::load_photos(&pool.conn, session_id)?,
        })
    }

    pub fn list(
        pool: &DbPool,
        kind: Option<SidakKind>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<SessionSummary>> {
        queries::list_summaries(&pool.conn, kind, from, to)
    }

    /// Full sessions in a period, for exports and dashboards.
    pub fn details_between(
        pool: &DbPool,
        kind: Option<SidakKind>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<SessionDetail>> {
        queries::list_sessions(&pool.conn, kind, from, to)?
            .into_iter()
            .map(|s| Self::detail(pool, s.id))
            .collect()
    }

    /// Delete a session with its records, observers and photo files.
    pub fn delete(pool: &mut DbPool, session_id: i64) -> AppResult<()> {
        let session = queries::get_session(&pool.conn, session_id)?;
        let photos = queries::delete_session(&pool.conn, session_id)?;
        for p in photos {
            if let Err(e) = fs::remove_file(&p) {
                crate::ui::messages::warning(format!("Could not remove {}: {}", p, e));
            }
        }
        ttlog_quiet(
            &pool.conn,
            "del",
            &format!("{} #{}", session.kind, session_id),
            "SIDAK session deleted",
        );
        Ok(())
    }

    /// Copy activity photos into the data directory, one file at a time.
    /// A failing file does not stop the others.
    pub fn attach_photos(pool: &mut DbPool, cfg: &Config, session_id: i64, files: &[PathBuf]) -> AppResult<Vec<PhotoOutcome>> {
        queries::get_session(&pool.conn, session_id)?;
        let dir = cfg.photos_dir().join(session_id.to_string());

        let outcomes = files
            .iter()
            .map(|src| PhotoOutcome {
                source: src.clone(),
                result: Self::attach_one(pool, &dir, session_id, src),
            })
            .collect::<Vec<_>>();

        let ok = outcomes.iter().filter(|o| o.result.is_ok()).count();
        ttlog_quiet(
            &pool.conn,
            "sidak_photo",
            &format!("session #{}", session_id),
            &format!("{} of {} photos attached", ok, outcomes.len()),
        );
        Ok(outcomes)
    }

    fn attach_one(pool: &DbPool, dir: &Path, session_id: i64, src: &Path) -> AppResult<i64> {
        if !src.is_file() {
            return Err(AppError::InvalidFile(format!("{} does not exist", src.display())));
        }
        match extension_lower(src) {
            Some(ext) if PHOTO_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => {
                return Err(AppError::InvalidFile(format!(
                    "{}: only {} images are accepted",
                    src.display(),
                    PHOTO_EXTENSIONS.join("/")
                )));
            }
        }

        fs::create_dir_all(dir)?;
        let dest = dir.join(stored_file_name(&format!("sidak{}", session_id), src));
        fs::copy(src, &dest)?;

        let file_name = src
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        queries::insert_photo(&pool.conn, session_id, &file_name, &dest.to_string_lossy())
    }

    /// How often each finding occurs across the session's records.
    pub fn findings_summary(detail: &SessionDetail) -> BTreeMap<String, usize> {
        let ctx = detail.session.header.judge_context();
        let mut out = BTreeMap::new();
        for r in &detail.records {
            for f in r.input.checklist.findings(ctx) {
                *out.entry(f).or_insert(0) += 1;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::test_pool;
    use crate::models::checklist::Checklist;
    use crate::models::shift::Shift;
    use chrono::NaiveTime;

    // 1x1 transparent PNG
    const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    fn cfg(name: &str) -> Config {
        let dir = std::env::temp_dir().join(format!("rhse_sidak_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        Config::with_database(dir.join("t.sqlite"))
    }

    fn header() -> SessionHeader {
        SessionHeader {
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            time: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
            shift: Shift::One,
            location: "Pit Barat".into(),
            department: "HSE".into(),
            company: "GECL".into(),
            sub_location: None,
            speed_limit_kph: None,
            workshop_name: None,
            area_pic: None,
            end_time: None,
        }
    }

    fn apd_record(name: &str, pairs: &[(&str, &str)]) -> RecordInput {
        let pairs: Vec<(String, String)> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        RecordInput {
            name: name.into(),
            nik: None,
            company: None,
            checklist: Checklist::from_pairs(SidakKind::Apd, &pairs).unwrap(),
            remarks: None,
        }
    }

    fn observer(name: &str) -> ObserverInput {
        ObserverInput {
            name: name.into(),
            nik: None,
            company: None,
            position: Some("Safety Officer".into()),
            signature: format!("data:image/png;base64,{PNG_B64}"),
        }
    }

    #[test]
    fn signature_must_be_png() {
        assert!(decode_signature(PNG_B64).is_ok());
        assert!(decode_signature(&format!("data:image/png;base64,{PNG_B64}")).is_ok());
        assert!(decode_signature("data:image/jpeg;base64,AAAA").is_err());
        assert!(decode_signature("aGVsbG8=").is_err());
        assert!(decode_signature("!!!").is_err());
    }

    #[test]
    fn full_wizard_flow() {
        let cfg = cfg("flow");
        let mut pool = test_pool();

        let id = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Apd, header(), Some("hse01")).unwrap();
        let store = DraftStore::new(cfg.drafts_dir());
        assert_eq!(store.get_saved_draft(SidakKind::Apd).unwrap().step, 2);

        assert_eq!(SidakLogic::add_record(&mut pool, &cfg, id, apd_record("Budi", &[])).unwrap(), 1);
        assert_eq!(
            SidakLogic::add_record(&mut pool, &cfg, id, apd_record("Sari", &[("helmet", "tidak")])).unwrap(),
            2
        );

        let err = SidakLogic::finish_session(&mut pool, &cfg, id).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        SidakLogic::add_observer(&mut pool, &cfg, id, observer("Andi")).unwrap();
        let draft = store.get_saved_draft(SidakKind::Apd).unwrap();
        assert_eq!((draft.step, draft.records.len(), draft.observers.len()), (3, 2, 1));

        let detail = SidakLogic::finish_session(&mut pool, &cfg, id).unwrap();
        assert_eq!(detail.session.sample_count, 2);
        assert!(detail.session.is_finished());
        assert_eq!(detail.compliant_count(), 1);
        assert_eq!(SidakLogic::findings_summary(&detail).get("Helm"), Some(&1));
        assert!(!store.has_draft(SidakKind::Apd));

        let err = SidakLogic::add_record(&mut pool, &cfg, id, apd_record("Late", &[])).unwrap_err();
        assert!(matches!(err, AppError::SessionFinished(_)));
    }

    #[test]
    fn record_limit_and_kind_mismatch() {
        let cfg = cfg("limits");
        let mut pool = test_pool();
        let id = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Apd, header(), None).unwrap();

        for i in 0..SidakKind::Apd.max_records() {
            SidakLogic::add_record(&mut pool, &cfg, id, apd_record(&format!("P{i}"), &[])).unwrap();
        }
        let err = SidakLogic::add_record(&mut pool, &cfg, id, apd_record("extra", &[])).unwrap_err();
        assert!(matches!(err, AppError::LimitReached(_)));

        let loto = RecordInput {
            name: "Panel".into(),
            nik: None,
            company: None,
            checklist: Checklist::from_pairs(SidakKind::Loto, &[]).unwrap(),
            remarks: None,
        };
        SidakLogic::discard_draft(&cfg, SidakKind::Apd).unwrap();
        let id2 = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Apd, header(), None).unwrap();
        assert!(matches!(
            SidakLogic::add_record(&mut pool, &cfg, id2, loto),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn open_draft_blocks_a_second_start_of_the_same_kind() {
        let cfg = cfg("pending");
        let mut pool = test_pool();
        let first = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Apd, header(), None).unwrap();
        SidakLogic::add_record(&mut pool, &cfg, first, apd_record("Budi", &[])).unwrap();

        let err = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Apd, header(), None).unwrap_err();
        assert!(matches!(err, AppError::DraftPending { session_id, .. } if session_id == first));

        let pending = SidakLogic::pending_draft(&pool, &cfg, SidakKind::Apd).unwrap().unwrap();
        assert_eq!(pending.session_id, first);
        assert_eq!(pending.draft.records.len(), 1);
        assert!(pending.saved_at.is_some());

        // other kinds are independent
        SidakLogic::start_session(&mut pool, &cfg, SidakKind::Rambu, header(), None).unwrap();

        SidakLogic::discard_draft(&cfg, SidakKind::Apd).unwrap();
        let second = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Apd, header(), None).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn draft_of_a_deleted_session_is_stale() {
        let cfg = cfg("stale");
        let mut pool = test_pool();
        let id = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Loto, header(), None).unwrap();
        SidakLogic::delete(&mut pool, id).unwrap();

        assert!(SidakLogic::pending_draft(&pool, &cfg, SidakKind::Loto).unwrap().is_none());
        assert!(!DraftStore::new(cfg.drafts_dir()).has_draft(SidakKind::Loto));
        SidakLogic::start_session(&mut pool, &cfg, SidakKind::Loto, header(), None).unwrap();
    }

    #[test]
    fn header_rules_per_kind() {
        let cfg = cfg("header");
        let mut pool = test_pool();

        let id = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Kecepatan, header(), None).unwrap();
        let s = SidakLogic::detail(&pool, id).unwrap().session;
        assert_eq!(s.header.speed_limit_kph, Some(DEFAULT_SPEED_LIMIT_KPH));

        let mut h = header();
        h.speed_limit_kph = Some(0.0);
        assert!(SidakLogic::start_session(&mut pool, &cfg, SidakKind::Kecepatan, h, None).is_err());

        assert!(SidakLogic::start_session(&mut pool, &cfg, SidakKind::Workshop, header(), None).is_err());

        let mut h = header();
        h.location = "  ".into();
        assert!(SidakLogic::start_session(&mut pool, &cfg, SidakKind::Apd, h, None).is_err());
    }

    #[test]
    fn workshop_accepts_two_observers() {
        let cfg = cfg("workshop");
        let mut pool = test_pool();
        let mut h = header();
        h.workshop_name = Some("Workshop Plant".into());
        let id = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Workshop, h, None).unwrap();

        SidakLogic::add_observer(&mut pool, &cfg, id, observer("A")).unwrap();
        SidakLogic::add_observer(&mut pool, &cfg, id, observer("B")).unwrap();
        assert!(matches!(
            SidakLogic::add_observer(&mut pool, &cfg, id, observer("C")),
            Err(AppError::LimitReached(_))
        ));
    }

    #[test]
    fn photos_are_attached_independently() {
        let cfg = cfg("photos");
        let mut pool = test_pool();
        let id = SidakLogic::start_session(&mut pool, &cfg, SidakKind::Rambu, header(), None).unwrap();

        let src_dir = cfg.data_dir().join("src");
        fs::create_dir_all(&src_dir).unwrap();
        let good = src_dir.join("rambu 1.jpg");
        let bad = src_dir.join("notes.txt");
        fs::write(&good, b"jpeg").unwrap();
        fs::write(&bad, b"text").unwrap();

        let out = SidakLogic::attach_photos(&mut pool, &cfg, id, &[good, bad, src_dir.join("missing.png")]).unwrap();
        assert!(out[0].result.is_ok());
        assert!(matches!(out[1].result, Err(AppError::InvalidFile(_))));
        assert!(out[2].result.is_err());

        let detail = SidakLogic::detail(&pool, id).unwrap();
        assert_eq!(detail.photos.len(), 1);
        let stored = PathBuf::from(&detail.photos[0].stored_path);
        assert!(stored.exists());

        SidakLogic::delete(&mut pool, id).unwrap();
        assert!(!stored.exists());
        assert!(matches!(SidakLogic::detail(&pool, id), Err(AppError::NotFound(_))));
    }
}
