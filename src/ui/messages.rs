use std::fmt;
use std::io::{self, Write};

/// ANSI colors
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

const FG_BLUE: &str = "\x1b[34m";
const FG_GREEN: &str = "\x1b[32m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_RED: &str = "\x1b[31m";

/// Icons
const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_BLUE, BOLD, ICON_INFO, RESET, msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_GREEN, BOLD, ICON_OK, RESET, msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}{}{} {}{}", FG_YELLOW, BOLD, ICON_WARN, RESET, msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}{}{} {}{}", FG_RED, BOLD, ICON_ERR, RESET, msg);
}

/// Formatted section header
pub fn header<T: fmt::Display>(msg: T) {
    println!("{}{}====================== {}\n{}", FG_BLUE, BOLD, msg, RESET);
}

/// One line of a batch outcome (upload loop, WhatsApp blast, CSV import).
pub fn item_result<T: fmt::Display>(label: T, outcome: Result<&str, &str>) {
    match outcome {
        Ok(detail) => println!("  {}{}{} {} {}", FG_GREEN, ICON_OK, RESET, label, detail),
        Err(reason) => println!("  {}{}{} {} {}", FG_RED, ICON_ERR, RESET, label, reason),
    }
}

/// Ask a yes/no question on stdin. Only `y`/`yes`/`ya` confirms; a closed
/// stdin counts as no.
pub fn confirm<T: fmt::Display>(question: T) -> io::Result<bool> {
    print!("{} [y/N]: ", question);
    io::stdout().flush().ok();

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "ya")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" Ya "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
    }
}
