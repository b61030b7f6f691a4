use crate::cli::parser::{Commands, SidakCmd};
use crate::config::Config;
use crate::core::draft::format_draft_timestamp;
use crate::core::sidak::{PendingDraft, SidakLogic};
use crate::db::initialize::open_db;
use crate::errors::{AppError, AppResult};
use crate::export::ExportLogic;
use crate::export::range::parse_range;
use crate::models::checklist::{Checklist, FieldType, field_defs, parse_pairs};
use crate::models::shift::{Shift, determine_shift_by_time};
use crate::models::sidak::{ObserverInput, RecordInput, SessionDetail, SessionHeader};
use crate::models::sidak_kind::SidakKind;
use crate::ui::messages::{confirm, header, info, item_result, success, warning};
use crate::utils::colors::{RESET, color_for_rate};
use crate::utils::date::{date_or_today, format_date_id, month_bounds, today};
use crate::utils::formatting::{rate_id, truncate, yes_no};
use crate::utils::table::Table;
use crate::utils::time::{format_hhmm, require_time, time_or_now};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fs;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Sidak { action } = cmd else {
        return Ok(());
    };

    if let SidakCmd::Kinds { kind } = action {
        print_kinds(*kind);
        return Ok(());
    }

    let mut pool = open_db(&cfg.database)?;

    match action {
        SidakCmd::Kinds { .. } => {}
        SidakCmd::Start {
            kind,
            date,
            time,
            shift,
            location,
            department,
            company,
            sub_location,
            speed_limit,
            workshop,
            pic,
            end_time,
            created_by,
            discard_draft,
        } => {
            if let Some(pending) = SidakLogic::pending_draft(&pool, cfg, *kind)? {
                print_pending(*kind, &pending);
                if *discard_draft || confirm("Discard it and start a new session?")? {
                    SidakLogic::discard_draft(cfg, *kind)?;
                    info("Draft discarded.");
                } else {
                    print_resume_hint(&pending);
                    return Ok(());
                }
            }

            let time = time_or_now(time.as_ref())?;
            let shift = match shift {
                Some(s) => Shift::parse(s).ok_or_else(|| AppError::InvalidShift(s.clone()))?,
                None => determine_shift_by_time(time),
            };
            let end_time = match end_time {
                Some(t) => Some(require_time(t)?),
                None => None,
            };

            let header = SessionHeader {
                date: date_or_today(date.as_ref())?,
                time,
                shift,
                location: location.trim().to_string(),
                department: department.clone().unwrap_or_else(|| cfg.default_department.clone()),
                company: company.clone().unwrap_or_else(|| cfg.company_name.clone()),
                sub_location: sub_location.clone(),
                speed_limit_kph: *speed_limit,
                workshop_name: workshop.clone(),
                area_pic: pic.clone(),
                end_time,
            };

            let id = SidakLogic::start_session(&mut pool, cfg, *kind, header, created_by.as_deref())?;
            success(format!("{} started: session #{}.", kind.title(), id));
            info(format!(
                "Next: `rhse sidak record {id} --name ... -F key=value` (see `rhse sidak kinds {kind}`)."
            ));
        }
        SidakCmd::Record {
            session,
            name,
            nik,
            company,
            remarks,
            fields,
            json,
        } => {
            let detail = SidakLogic::detail(&pool, *session)?;
            let kind = detail.session.kind;
            let checklist = match json {
                Some(raw) => Checklist::from_json(kind, raw)?,
                None => Checklist::from_pairs(kind, &parse_pairs(fields)?)?,
            };
            let ctx = detail.session.header.judge_context();
            let findings = checklist.findings(ctx);

            let record = RecordInput {
                name: name.clone(),
                nik: nik.clone(),
                company: company.clone(),
                checklist,
                remarks: remarks.clone(),
            };
            let ordinal = SidakLogic::add_record(&mut pool, cfg, *session, record)?;

            success(format!(
                "Record {}/{} added to session #{}.",
                ordinal,
                kind.max_records(),
                session
            ));
            if findings.is_empty() {
                info("No findings.");
            } else {
                warning(format!("Findings: {}", findings.join(", ")));
            }
        }
        SidakCmd::Observer {
            session,
            name,
            nik,
            company,
            position,
            signature,
            signature_file,
        } => {
            let signature = match (signature, signature_file) {
                (Some(s), _) => s.clone(),
                (None, Some(path)) => STANDARD.encode(fs::read(path)?),
                (None, None) => {
                    return Err(AppError::Validation(
                        "a signature is required (--signature or --signature-file)".into(),
                    ));
                }
            };

            let observer = ObserverInput {
                name: name.clone(),
                nik: nik.clone(),
                company: company.clone(),
                position: position.clone(),
                signature,
            };
            let ordinal = SidakLogic::add_observer(&mut pool, cfg, *session, observer)?;
            success(format!("Observer {ordinal} signed session #{session}."));
        }
        SidakCmd::Finish { session } => {
            let detail = SidakLogic::finish_session(&mut pool, cfg, *session)?;
            success(format!(
                "Session #{} finished: {} record(s), {} compliant ({}%).",
                session,
                detail.records.len(),
                detail.compliant_count(),
                rate_id(detail.compliance_rate())
            ));
        }
        SidakCmd::Photos { session, files } => {
            let outcomes = SidakLogic::attach_photos(&mut pool, cfg, *session, files)?;
            for o in &outcomes {
                match &o.result {
                    Ok(id) => item_result(o.source.display(), Ok(format!("#{id}").as_str())),
                    Err(e) => item_result(o.source.display(), Err(e.to_string().as_str())),
                }
            }
            let ok = outcomes.iter().filter(|o| o.result.is_ok()).count();
            if ok == outcomes.len() {
                success(format!("{ok} photo(s) attached."));
            } else {
                warning(format!("{} of {} photo(s) attached.", ok, outcomes.len()));
            }
        }
        SidakCmd::List { kind, range } => {
            let (from, to) = match range {
                Some(r) => parse_range(r)?,
                None => month_bounds(today()),
            };
            let rows = SidakLogic::list(&pool, *kind, from, to)?;
            if rows.is_empty() {
                warning(format!("No SIDAK sessions between {from} and {to}."));
                return Ok(());
            }

            let mut table = Table::new(
                &["ID", "Jenis", "Tanggal", "Jam", "Shift", "Lokasi", "Sampel", "Pengamat", "Selesai"],
                cfg.separator(),
            );
            for s in &rows {
                table.add_row(vec![
                    s.id.to_string(),
                    s.kind.clone(),
                    s.date.clone(),
                    s.time.clone(),
                    s.shift.clone(),
                    truncate(&s.location, 24),
                    s.records.to_string(),
                    s.observers.to_string(),
                    yes_no(s.finished).to_string(),
                ]);
            }
            print!("{}", table.render());
            info(format!("{} session(s).", rows.len()));
        }
        SidakCmd::Show { session } => {
            let detail = SidakLogic::detail(&pool, *session)?;
            print_detail(&detail, cfg.separator());
        }
        SidakCmd::Report {
            session,
            file,
            force,
        } => {
            ExportLogic::session_report(&pool, cfg, *session, file, *force)?;
        }
        SidakCmd::Del { session } => {
            SidakLogic::delete(&mut pool, *session)?;
            success(format!("Session #{session} deleted."));
        }
    }

    Ok(())
}

fn print_kinds(kind: Option<SidakKind>) {
    let kinds: Vec<SidakKind> = match kind {
        Some(k) => vec![k],
        None => SidakKind::ALL.to_vec(),
    };

    for k in kinds {
        header(format!("{} ({})", k.title(), k.as_str()));
        let observers = k
            .max_observers()
            .map(|n| n.to_string())
            .unwrap_or_else(|| "no limit".into());
        println!(
            "  records: max {}, observers: {}",
            k.max_records(),
            observers
        );
        if kind.is_none() {
            continue;
        }
        for f in field_defs(k) {
            let ty = match f.ty {
                FieldType::Bool => "ya/tidak",
                FieldType::Text => "text",
                FieldType::Number => "number",
            };
            let note = match (f.optional, f.default) {
                (_, Some(d)) => format!("default {d}"),
                (true, None) => "optional".to_string(),
                (false, None) => "required".to_string(),
            };
            println!("  {:<22} {:<9} {:<16} {}", f.name, ty, note, f.label);
        }
    }
}

fn print_detail(detail: &SessionDetail, sep: char) {
    let s = &detail.session;
    let h = &s.header;
    let ctx = h.judge_context();

    header(format!("{} #{}", s.kind.title(), s.id));
    println!("Tanggal    : {} {}", format_date_id(h.date), format_hhmm(h.time));
    println!("Shift      : {}", h.shift);
    println!("Lokasi     : {}", h.location);
    if let Some(sub) = &h.sub_location {
        println!("Sub lokasi : {sub}");
    }
    println!("Departemen : {}", h.department);
    println!("Perusahaan : {}", h.company);
    if let Some(limit) = h.speed_limit_kph {
        println!("Batas      : {limit} km/h");
    }
    if let Some(ws) = &h.workshop_name {
        println!("Workshop   : {ws}");
    }
    if let Some(pic) = &h.area_pic {
        println!("PIC area   : {pic}");
    }
    println!(
        "Status     : {}",
        s.finished_at
            .as_deref()
            .map(|at| format!("selesai {at}"))
            .unwrap_or_else(|| "belum selesai".into())
    );

    if detail.records.is_empty() {
        warning("No records yet.");
    } else {
        println!();
        let mut headers: Vec<&str> = vec!["No", "Nama"];
        headers.extend(field_defs(s.kind).iter().map(|d| d.name));
        headers.push("Temuan");

        let mut table = Table::new(&headers, sep);
        for r in &detail.records {
            let mut row = vec![r.ordinal.to_string(), truncate(&r.input.name, 24)];
            row.extend(r.input.checklist.cells());
            let findings = r.input.checklist.findings(ctx);
            row.push(if findings.is_empty() { "-".into() } else { findings.join("; ") });
            table.add_row(row);
        }
        print!("{}", table.render());

        let rate = detail.compliance_rate();
        println!(
            "\nKepatuhan: {}/{} ({}{}%{})",
            detail.compliant_count(),
            detail.records.len(),
            color_for_rate(rate),
            rate_id(rate),
            RESET
        );

        let summary = SidakLogic::findings_summary(detail);
        for (finding, count) in &summary {
            println!("  {count:>3} x {finding}");
        }
    }

    println!();
    for o in &detail.observers {
        println!(
            "Pengamat {}: {} {} {}",
            o.ordinal,
            o.input.name,
            o.input.position.as_deref().unwrap_or(""),
            o.input.company.as_deref().map(|c| format!("({c})")).unwrap_or_default()
        );
    }
    for p in &detail.photos {
        println!("Foto: {} -> {}", p.file_name, p.stored_path);
    }
}

fn print_pending(kind: SidakKind, p: &PendingDraft) {
    let saved = format_draft_timestamp(p.saved_at.as_deref());
    warning(format!(
        "Unfinished {} draft{}: session #{}, step {}, {} record(s), {} observer(s).",
        kind.title(),
        if saved.is_empty() { String::new() } else { format!(" from {saved}") },
        p.session_id,
        p.draft.step,
        p.draft.records.len(),
        p.draft.observers.len()
    ));
}

fn print_resume_hint(p: &PendingDraft) {
    let id = p.session_id;
    info(format!("Resuming session #{id}. No new session was created."));
    if p.draft.step < 3 {
        info(format!("Next: `rhse sidak record {id} --name ...` or `rhse sidak observer {id} --name ...`."));
    } else {
        info(format!("Next: `rhse sidak observer {id} --name ...` or `rhse sidak finish {id}`."));
    }
}
