use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Minimal A4 layout engine over `pdf-writer`: a vertical cursor that
/// flows headings, key/value blocks and tables across pages.
pub struct PdfManager {
    pdf: Pdf,
    catalog_id: Ref,
    pages_id: Ref,
    page_refs: Vec<Ref>,
    next_id: i32,
    font_id: Ref,
    bold_id: Ref,

    title: String,
    content: Content,
    content_id: Option<Ref>,
    y: f32,

    page_w: f32,
    page_h: f32,
    margin: f32,
    row_h: f32,

    font_size: f32,
    header_font_size: f32,
    title_font_size: f32,
}

const FONT: Name<'static> = Name(b"F1");
const FONT_BOLD: Name<'static> = Name(b"F2");

impl PdfManager {
    pub fn new(title: &str) -> Self {
        let mut pdf = Pdf::new();

        let catalog_id = Ref::new(1);
        let pages_id = Ref::new(2);
        let font_id = Ref::new(3);
        let bold_id = Ref::new(4);

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));
        pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));

        Self {
            pdf,
            catalog_id,
            pages_id,
            page_refs: Vec::new(),
            next_id: 5,
            font_id,
            bold_id,

            title: to_latin(title),
            content: Content::new(),
            content_id: None,
            y: 0.0,

            page_w: 595.0,
            page_h: 842.0,
            margin: 50.0,
            row_h: 20.0,

            font_size: 9.0,
            header_font_size: 10.0,
            title_font_size: 14.0,
        }
    }

    fn fresh_ref(&mut self) -> Ref {
        let id = self.next_id;
        self.next_id += 1;
        Ref::new(id)
    }

    fn usable_width(&self) -> f32 {
        self.page_w - 2.0 * self.margin
    }

    /// Close the current page (if any) and open a new one with the
    /// document title and page number.
    fn new_page(&mut self) {
        self.finish_page();

        let page_id = self.fresh_ref();
        let content_id = self.fresh_ref();
        self.page_refs.push(page_id);

        {
            let mut page = self.pdf.page(page_id);
            page.parent(self.pages_id)
                .media_box(Rect::new(0.0, 0.0, self.page_w, self.page_h))
                .contents(content_id);
            page.resources()
                .fonts()
                .pair(FONT, self.font_id)
                .pair(FONT_BOLD, self.bold_id);
        }

        self.content_id = Some(content_id);
        let page_no = format!("Page {}", self.page_refs.len());
        let (margin, page_w, page_h) = (self.margin, self.page_w, self.page_h);
        let (title_size, size) = (self.title_font_size, self.font_size);
        draw_text(
            &mut self.content,
            FONT_BOLD,
            margin,
            page_h - margin + 15.0,
            title_size,
            &self.title,
        );
        draw_text(
            &mut self.content,
            FONT,
            page_w - margin - 40.0,
            margin - 35.0,
            size,
            &page_no,
        );

        self.y = self.page_h - self.margin - 20.0;
    }

    fn finish_page(&mut self) {
        if let Some(id) = self.content_id.take() {
            let content = std::mem::replace(&mut self.content, Content::new());
            self.pdf.stream(id, &content.finish());
        }
    }

    /// Make sure `height` fits below the cursor, breaking the page if not.
    /// Returns true when a new page was started.
    fn reserve(&mut self, height: f32) -> bool {
        if self.content_id.is_none() || self.y - height < self.margin {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn content(&mut self) -> &mut Content {
        &mut self.content
    }

    /// Bold section heading.
    pub fn heading(&mut self, text: &str) {
        self.reserve(self.row_h * 2.0);
        self.y -= self.row_h;
        let (x, y, size) = (self.margin, self.y + 4.0, self.header_font_size + 1.0);
        let text = to_latin(text);
        draw_text(self.content(), FONT_BOLD, x, y, size, &text);
        self.y -= 4.0;
    }

    /// Plain paragraph line, cut to the page width.
    pub fn line(&mut self, text: &str) {
        self.reserve(self.row_h);
        self.y -= self.font_size + 5.0;
        let max_chars = (self.usable_width() / (self.font_size * 0.5)) as usize;
        let text = fit(&to_latin(text), max_chars);
        let (x, y, size) = (self.margin, self.y, self.font_size);
        draw_text(self.content(), FONT, x, y, size, &text);
    }

    /// Two-column `label: value` block.
    pub fn key_values(&mut self, pairs: &[(&str, String)]) {
        let label_w = 120.0;
        let max_chars = ((self.usable_width() - label_w) / (self.font_size * 0.5)) as usize;
        for (label, value) in pairs {
            self.reserve(self.font_size + 6.0);
            self.y -= self.font_size + 6.0;
            let (x, y, size) = (self.margin, self.y, self.font_size);
            let label = to_latin(label);
            let value = fit(&to_latin(value), max_chars);
            let c = self.content();
            draw_text(c, FONT_BOLD, x, y, size, &label);
            draw_text(c, FONT, x + label_w, y, size, &value);
        }
        self.y -= 6.0;
    }

    /// Table that continues over as many pages as needed, repeating the
    /// header row on each page and striping every other row.
    pub fn table(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        let col_widths = self.compute_col_widths(headers, rows);
        let header_row: Vec<String> = headers.iter().map(|h| to_latin(h)).collect();

        self.reserve(self.row_h * 2.0);
        self.table_header(&col_widths, &header_row);

        for (i, row) in rows.iter().enumerate() {
            if self.reserve(self.row_h) {
                self.table_header(&col_widths, &header_row);
            }
            self.y -= self.row_h;
            let (x, y, total, h) = (self.margin, self.y, col_widths.iter().sum::<f32>(), self.row_h);
            if i % 2 == 0 {
                fill_rect(self.content(), x, y, total, h, 0.96);
            }
            let size = self.font_size;
            draw_row(self.content(), x, y, h, &col_widths, row, size, FONT);
        }

        self.y -= 8.0;
    }

    fn table_header(&mut self, col_widths: &[f32], header_row: &[String]) {
        self.y -= self.row_h;
        let (x, y, total, h) = (self.margin, self.y, col_widths.iter().sum::<f32>(), self.row_h);
        let size = self.header_font_size;
        let c = self.content();
        fill_rect(c, x, y, total, h, 0.87);
        draw_row(c, x, y, h, col_widths, header_row, size, FONT_BOLD);
    }

    /// Column widths proportional to content, scaled down to the page.
    fn compute_col_widths(&self, headers: &[&str], rows: &[Vec<String>]) -> Vec<f32> {
        let mut widths: Vec<f32> = headers
            .iter()
            .map(|h| h.chars().count() as f32 * 6.5 + 8.0)
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                let w = (cell.chars().count().min(40) as f32 * 5.2 + 8.0).max(widths[i]);
                widths[i] = w;
            }
        }

        let total: f32 = widths.iter().sum();
        let max = self.usable_width();
        if total > max {
            let scale = max / total;
            for w in &mut widths {
                *w *= scale;
            }
        }

        widths
    }

    /// Convenience for list exports: a single titled table.
    pub fn write_table(&mut self, headers: &[&str], rows: &[Vec<String>]) {
        self.table(headers, rows);
    }

    pub fn save(mut self, path: &Path) -> std::io::Result<()> {
        if self.page_refs.is_empty() {
            self.new_page();
        }
        self.finish_page();

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        let count = self.page_refs.len() as i32;
        self.pdf
            .pages(self.pages_id)
            .count(count)
            .kids(self.page_refs.iter().copied());

        let bytes = self.pdf.finish();
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        Ok(())
    }
}

fn draw_text(content: &mut Content, font: Name<'_>, x: f32, y: f32, size: f32, text: &str) {
    content.begin_text();
    content.set_font(font, size);
    content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, y]);
    content.show(Str(text.as_bytes()));
    content.end_text();
}

fn fill_rect(content: &mut Content, x: f32, y: f32, w: f32, h: f32, grey: f32) {
    content.save_state();
    content.set_fill_gray(grey);
    content.rect(x, y, w, h);
    content.fill_nonzero();
    content.restore_state();
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    content: &mut Content,
    x_start: f32,
    y: f32,
    h: f32,
    col_widths: &[f32],
    row: &[String],
    font_size: f32,
    font: Name<'_>,
) {
    let mut x = x_start;
    for (i, w) in col_widths.iter().enumerate() {
        let cell = row.get(i).map(String::as_str).unwrap_or("");
        let max_chars = ((w - 6.0) / (font_size * 0.5)).max(1.0) as usize;
        let text = fit(&to_latin(cell), max_chars);
        draw_text(content, font, x + 3.0, y + 6.0, font_size, &text);

        content.save_state();
        content.set_stroke_rgb(0.65, 0.65, 0.65);
        content.rect(x, y, *w, h);
        content.stroke();
        content.restore_state();

        x += w;
    }
}

/// The standard Type 1 fonts are written with single-byte strings;
/// anything outside ASCII is replaced.
fn to_latin(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '✓' => 'Y',
            '✗' => 'N',
            '–' | '—' => '-',
            c if c.is_ascii() => c,
            _ => '?',
        })
        .collect()
}

fn fit(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let mut out: String = s.chars().take(max_chars - 3).collect();
        out.push_str("...");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_table_spans_pages() {
        let path = std::env::temp_dir().join("rhse_pdf_pages.pdf");
        let rows: Vec<Vec<String>> = (0..120)
            .map(|i| vec![i.to_string(), format!("Karyawan {i}")])
            .collect();

        let mut pdf = PdfManager::new("Daftar");
        pdf.write_table(&["no", "name"], &rows);
        assert!(pdf.page_refs.len() >= 3);
        pdf.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(to_latin("✓ ok — 🔴"), "Y ok - ?");
        assert_eq!(fit("abcdefghij", 6), "abc...");
    }
}
