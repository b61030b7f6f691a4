use crate::errors::{AppError, AppResult};
use crate::export::excel_date::parse_to_excel_date;
use crate::export::notify_export_success;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// Styled worksheet: coloured frozen header, banded rows, native dates and
/// numbers, columns sized to their widest cell.
pub(crate) fn export_xlsx(
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
    path: &Path,
) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(to_app_error)?;

    if rows.is_empty() {
        worksheet
            .write(0, 0, "No data available")
            .map_err(to_app_error)?;
        workbook.save(path).map_err(to_app_error)?;
        notify_export_success("XLSX (empty dataset)", path);
        return Ok(());
    }

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &header_format)
            .map_err(to_app_error)?;
    }

    worksheet.set_freeze_panes(1, 0).ok();

    let mut col_widths: Vec<usize> = headers.iter().map(|h| UnicodeWidthStr::width(*h)).collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);

    for (row_index, values) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band_color = if row_index % 2 == 0 { band1 } else { band2 };

        for (col, value) in values.iter().enumerate().take(headers.len()) {
            write_cell(worksheet, row, col as u16, value, band_color)?;
            col_widths[col] = col_widths[col].max(UnicodeWidthStr::width(value.as_str()));
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, (*w).min(60) as f64 + 2.0)
            .map_err(to_app_error)?;
    }

    workbook.save(path).map_err(to_app_error)?;

    notify_export_success("XLSX", path);
    Ok(())
}

/// Identifiers such as NIKs, phone numbers and unit numbers keep their
/// leading zeros and digits, so only short plain numbers become numeric.
fn as_number(s: &str) -> Option<f64> {
    let digits = s.chars().filter(char::is_ascii_digit).count();
    let leading_zero = s.len() > 1 && s.starts_with('0') && !s.starts_with("0.");
    if leading_zero || digits > 9 {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, s: &str, bg: Color) -> AppResult<()> {
    let base = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    if let Some((num_format, serial)) = parse_to_excel_date(s) {
        worksheet
            .write_with_format(row, col, serial, &base.set_num_format(num_format))
            .map_err(to_app_error)?;
    } else if let Some(num) = as_number(s) {
        worksheet
            .write_with_format(row, col, num, &base.set_align(FormatAlign::Right))
            .map_err(to_app_error)?;
    } else {
        worksheet
            .write_with_format(row, col, s, &base)
            .map_err(to_app_error)?;
    }

    Ok(())
}

fn to_app_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
