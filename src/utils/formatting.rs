//! Formatting utilities used for CLI and export outputs.

use unicode_width::UnicodeWidthStr;

pub fn yes_no(v: bool) -> &'static str {
    if v { "Ya" } else { "Tidak" }
}

/// Cut `s` to at most `max` display columns, appending "…" when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }

    let mut out = String::new();
    let mut w = 0;
    for c in s.chars() {
        let cw = UnicodeWidthStr::width(c.to_string().as_str());
        if w + cw + 1 > max {
            break;
        }
        out.push(c);
        w += cw;
    }
    out.push('…');
    out
}

/// Format a rate with two decimals and a comma separator, as shown on the
/// statistics dashboard ("1,23").
pub fn rate_id(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("Helm", 10), "Helm");
        assert_eq!(truncate("Pemeriksaan Kesehatan", 8), "Pemerik…");
    }

    #[test]
    fn rate_uses_comma() {
        assert_eq!(rate_id(1.2345), "1,23");
        assert_eq!(rate_id(0.0), "0,00");
    }
}
