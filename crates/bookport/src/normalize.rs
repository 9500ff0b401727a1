//! Helpers that turn text scraped from a catalog page into clean values.

/// Collapse every run of whitespace into a single space and trim both ends.
///
/// Non-breaking spaces count as whitespace, so `"[美]\u{a0}\u{a0}丹·布朗"` becomes
/// `"[美] 丹·布朗"`.
#[must_use]
pub fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split a `/` separated list of names, e.g. `"A / B"` into `["A", "B"]`.
#[must_use]
pub fn split_names(raw: &str) -> Vec<String> {
    raw.split('/')
        .map(collapse_spaces)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Keep only the ASCII digits of `raw`, `"338页"` becomes `"338"`.
#[must_use]
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Convert a free-form publish date into `YYYY-MM-DD`.
///
/// Only the year is required; a missing or unreadable month becomes January. The day of the
/// month is never trusted and is always `01`, so `"2018-8-15"` converts to `"2018-08-01"`.
///
/// Returns [`None`] when there is no leading integer year.
#[must_use]
pub fn convert_pubdate(raw: Option<&str>) -> Option<String> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;

    let mut parts = raw.split('-');

    let year: i32 = parts.next()?.trim().parse().ok()?;

    let month = parts
        .next()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .clamp(1, 12);

    Some(format!("{year:04}-{month:02}-01"))
}
