use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;

pub fn open(path: &Path, kind: &str) -> Result<File> {
    match File::open(path) {
        Err(e) => Err(anyhow!("Opening {} file `{}`: {}", kind, path.display(), e)),
        Ok(file) => Ok(file),
    }
}

/// Formats an ISO date (`2024-02-20`) the long way (`February 20, 2024`).
/// Input that isn't a date is returned unchanged.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_owned(),
    }
}

/// Shortens `s` to at most `max_chars` characters, ending in `...` when
/// anything was cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}
