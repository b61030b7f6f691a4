/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Returns GREY when the field is empty (None, "" or "-"), RESET otherwise.
pub fn color_for_optional_field<T: AsRef<str>>(value: Option<T>) -> &'static str {
    match value {
        Some(v) if !v.as_ref().trim().is_empty() && v.as_ref() != "-" => RESET,
        _ => GREY,
    }
}

/// Compliance color:
/// 100% → green
/// \>= 80% → yellow
/// otherwise → red
pub fn color_for_rate(rate: f64) -> &'static str {
    if rate >= 100.0 {
        GREEN
    } else if rate >= 80.0 {
        YELLOW
    } else {
        RED
    }
}
