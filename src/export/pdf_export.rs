use crate::errors::{AppError, AppResult};
use crate::export::notify_export_success;
use crate::export::pdf::PdfManager;
use crate::models::checklist::field_defs;
use crate::models::sidak::SessionDetail;
use crate::ui::messages::info;
use crate::utils::date::format_date_id;
use crate::utils::formatting::rate_id;
use std::path::Path;

/// Single titled table.
pub(crate) fn export_pdf(
    title: &str,
    headers: &[&str],
    rows: &[Vec<String>],
    path: &Path,
) -> AppResult<()> {
    info(format!("Exporting to PDF: {}", path.display()));

    let mut pdf = PdfManager::new(title);
    pdf.write_table(headers, rows);
    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("PDF", path);
    Ok(())
}

/// Inspection report of one SIDAK session: header block, checklist table,
/// findings per record, observers with signature status, photo list.
pub(crate) fn export_session_report(
    detail: &SessionDetail,
    company_name: &str,
    path: &Path,
) -> AppResult<()> {
    info(format!("Writing SIDAK report: {}", path.display()));

    let session = &detail.session;
    let h = &session.header;
    let kind = session.kind;
    let ctx = h.judge_context();

    let mut pdf = PdfManager::new(&format!("{} #{}", kind.title(), session.id));

    let mut header: Vec<(&str, String)> = vec![
        ("Perusahaan", company_name.to_string()),
        ("Tanggal", format_date_id(h.date)),
        (
            "Jam",
            match h.end_time {
                Some(end) => format!("{} - {}", h.time.format("%H:%M"), end.format("%H:%M")),
                None => h.time.format("%H:%M").to_string(),
            },
        ),
        ("Shift", h.shift.as_str().to_string()),
        ("Lokasi", h.location.clone()),
        ("Departemen", h.department.clone()),
        ("Kontraktor", h.company.clone()),
    ];
    if let Some(sub) = &h.sub_location {
        header.push(("Sub lokasi", sub.clone()));
    }
    if let Some(limit) = h.speed_limit_kph {
        header.push(("Batas kecepatan", format!("{limit} km/h")));
    }
    if let Some(ws) = &h.workshop_name {
        header.push(("Workshop", ws.clone()));
    }
    if let Some(pic) = &h.area_pic {
        header.push(("PIC area", pic.clone()));
    }
    header.push((
        "Status",
        match &session.finished_at {
            Some(at) => format!("Selesai ({at})"),
            None => "Belum selesai".to_string(),
        },
    ));
    header.push((
        "Kepatuhan",
        format!(
            "{}/{} ({}%)",
            detail.compliant_count(),
            detail.records.len(),
            rate_id(detail.compliance_rate())
        ),
    ));
    pdf.key_values(&header);

    pdf.heading("Hasil pemeriksaan");
    let defs = field_defs(kind);
    let mut headers: Vec<&str> = vec!["No", "Nama"];
    headers.extend(defs.iter().map(|d| d.label));
    headers.push("OK");

    let rows: Vec<Vec<String>> = detail
        .records
        .iter()
        .map(|r| {
            let mut row = vec![r.ordinal.to_string(), r.input.name.clone()];
            row.extend(r.input.checklist.cells());
            row.push(if r.input.checklist.is_compliant(ctx) { "Y" } else { "N" }.to_string());
            row
        })
        .collect();
    pdf.table(&headers, &rows);

    let findings: Vec<String> = detail
        .records
        .iter()
        .filter_map(|r| {
            let f = r.input.checklist.findings(ctx);
            (!f.is_empty()).then(|| format!("{}. {}: {}", r.ordinal, r.input.name, f.join(", ")))
        })
        .collect();
    pdf.heading("Temuan");
    if findings.is_empty() {
        pdf.line("Tidak ada temuan.");
    } else {
        for f in &findings {
            pdf.line(f);
        }
    }

    let remarks: Vec<String> = detail
        .records
        .iter()
        .filter_map(|r| {
            r.input
                .remarks
                .as_ref()
                .map(|m| format!("{}. {}", r.ordinal, m))
        })
        .collect();
    if !remarks.is_empty() {
        pdf.heading("Keterangan");
        for r in &remarks {
            pdf.line(r);
        }
    }

    pdf.heading("Pengamat");
    let observer_rows: Vec<Vec<String>> = detail
        .observers
        .iter()
        .map(|o| {
            vec![
                o.ordinal.to_string(),
                o.input.name.clone(),
                o.input.nik.clone().unwrap_or_default(),
                o.input.position.clone().unwrap_or_default(),
                o.input.company.clone().unwrap_or_default(),
                if o.input.signature.is_empty() {
                    "-".to_string()
                } else {
                    "Ditandatangani".to_string()
                },
            ]
        })
        .collect();
    pdf.table(
        &["No", "Nama", "NIK", "Jabatan", "Perusahaan", "Tanda tangan"],
        &observer_rows,
    );

    if !detail.photos.is_empty() {
        pdf.heading("Foto kegiatan");
        for p in &detail.photos {
            pdf.line(&p.file_name);
        }
    }

    pdf.save(path)
        .map_err(|e| AppError::Export(format!("PDF export error: {e}")))?;

    notify_export_success("SIDAK report", path);
    Ok(())
}
