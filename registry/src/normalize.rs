use chrono::NaiveDateTime;
use regex::Regex;

/// Strips stray characters and collapses whitespace in a registry field.
pub fn clean(input: &str) -> String {
    let strip = Regex::new(r"[^A-Za-z0-9&',./()#\- ]").unwrap();
    let s = strip.replace_all(input, "").into_owned();

    let collapse = Regex::new(r" +").unwrap();
    collapse.replace_all(s.trim(), " ").into_owned()
}

/// License numbers compare case-insensitively everywhere, so store them
/// upper-cased once.
pub fn license_number(input: &str) -> String {
    clean(input).to_uppercase()
}

/// Reduces an open-data floating timestamp ("2024-01-05T00:00:00.000") to
/// its ISO date. Anything unparseable passes through cleaned, not dropped.
pub fn date(input: &str) -> String {
    let trimmed = input.trim();

    match NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => dt.date().format("%Y-%m-%d").to_string(),
        Err(_) => clean(trimmed),
    }
}
