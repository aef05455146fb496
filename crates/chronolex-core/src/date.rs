//! Date normalisation and the chronological sort key.
//!
//! Converts heterogeneous date expressions ("11th of March, 1921",
//! "Sept. 5, 1921", "3/11/1921") into canonical `"Month Day, Year"` strings,
//! and derives a sortable calendar value back from those strings so a single
//! global sort recovers chronological order across documents.
//!
//! # Parsing rules
//!
//! - Commas and periods are separators; ordinal suffixes (`11th`) and the
//!   word `of` are dropped.
//! - Month names resolve by prefix, so `Sept`, `Sep.`, and `September` all
//!   mean month 9.
//! - Numeric `a/b/c` (or dashed) dates try month-first, then day-first.
//! - Two-digit years expand with a 1970 pivot: `70..=99` → 19xx, else 20xx.
//!
//! Anything that does not yield a real calendar date parses to `None`;
//! [`sort_key`] maps those to [`SENTINEL`] so malformed or alternate-calendar
//! dates sort to the earliest position instead of failing the batch.

use chrono::{Datelike, NaiveDate};

/// Sort position for dates that cannot be parsed.
pub const SENTINEL: NaiveDate = NaiveDate::MIN;

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Render a date in the canonical "Month Day, Year" form.
pub fn canonical(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Parse a date expression into a calendar date, tolerating ordinals,
/// month abbreviations, and numeric separator forms.
pub fn parse_fuzzy(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.replace([',', '.'], " ");
    let tokens: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|t| !t.eq_ignore_ascii_case("of"))
        .collect();

    if tokens.is_empty() {
        return None;
    }

    if tokens.len() == 1 && tokens[0].contains(['/', '-']) {
        return parse_numeric(tokens[0]);
    }

    let mut month: Option<u32> = None;
    let mut day: Option<u32> = None;
    let mut year: Option<i32> = None;

    for token in &tokens {
        if let Some(m) = match_month(token) {
            if month.is_none() {
                month = Some(m);
            }
            continue;
        }
        let digits = strip_ordinal(token);
        if let Ok(n) = digits.parse::<u32>() {
            if n >= 1000 && year.is_none() {
                year = Some(n as i32);
            } else if (1..=31).contains(&n) && day.is_none() {
                day = Some(n);
            }
        }
    }

    NaiveDate::from_ymd_opt(year?, month?, day?)
}

/// Derive the chronological sort position for a canonical date string.
///
/// Unparseable strings (including tagged alternate-calendar dates) map to
/// [`SENTINEL`] and therefore sort first.
pub fn sort_key(date_str: &str) -> NaiveDate {
    parse_fuzzy(date_str).unwrap_or(SENTINEL)
}

/// Round-trip invariant: a canonical string must parse back to the same
/// calendar day.
pub fn roundtrips(date: NaiveDate) -> bool {
    parse_fuzzy(&canonical(date))
        .is_some_and(|d| d.year() == date.year() && d.month() == date.month() && d.day() == date.day())
}

// ── helpers ──

/// Resolve a month name or abbreviation (3+ chars) to its number.
fn match_month(token: &str) -> Option<u32> {
    if token.len() < 3 || !token.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let lower = token.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|name| name.starts_with(&lower) || lower.starts_with(&name[..3]))
        .map(|i| i as u32 + 1)
}

/// Strip a trailing ordinal suffix from a day token ("11th" → "11").
fn strip_ordinal(token: &str) -> &str {
    if !token.is_ascii() {
        return token;
    }
    let is_ordinal = |s: &str| {
        token.len() > s.len()
            && token[..token.len() - s.len()].bytes().all(|b| b.is_ascii_digit())
            && token[token.len() - s.len()..].eq_ignore_ascii_case(s)
    };
    for suffix in ["st", "nd", "rd", "th"] {
        if is_ordinal(suffix) {
            return &token[..token.len() - suffix.len()];
        }
    }
    token
}

/// Parse `a/b/c` or `a-b-c` trying month-first, then day-first.
fn parse_numeric(token: &str) -> Option<NaiveDate> {
    let parts: Vec<u32> = token
        .split(['/', '-'])
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    if parts.len() != 3 {
        return None;
    }
    let (a, b, y) = (parts[0], parts[1], expand_year(parts[2]));
    NaiveDate::from_ymd_opt(y, a, b).or_else(|| NaiveDate::from_ymd_opt(y, b, a))
}

fn expand_year(y: u32) -> i32 {
    match y {
        0..=69 => 2000 + y as i32,
        70..=99 => 1900 + y as i32,
        _ => y as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Assert a list of date strings sorts strictly ascending by sort key.
    fn assert_chronological(inputs: &[&str]) {
        let keys: Vec<NaiveDate> = inputs.iter().map(|s| sort_key(s)).collect();
        for i in 1..keys.len() {
            assert!(
                keys[i - 1] < keys[i],
                "Expected {:?} ({}) < {:?} ({})",
                inputs[i - 1],
                keys[i - 1],
                inputs[i],
                keys[i],
            );
        }
    }

    #[test]
    fn canonical_form() {
        assert_eq!(canonical(date(1921, 3, 11)), "March 11, 1921");
        assert_eq!(canonical(date(1921, 3, 5)), "March 05, 1921");
    }

    #[test]
    fn canonical_roundtrips() {
        for d in [
            date(1921, 3, 11),
            date(1921, 3, 5),
            date(1800, 1, 1),
            date(2024, 12, 31),
        ] {
            assert!(roundtrips(d), "round trip failed for {d}");
        }
    }

    #[test]
    fn parses_month_first() {
        assert_eq!(parse_fuzzy("March 11, 1921"), Some(date(1921, 3, 11)));
        assert_eq!(parse_fuzzy("March 11 1921"), Some(date(1921, 3, 11)));
    }

    #[test]
    fn parses_day_first_with_ordinal_and_of() {
        assert_eq!(parse_fuzzy("11th of March, 1921"), Some(date(1921, 3, 11)));
        assert_eq!(parse_fuzzy("1st of January 1900"), Some(date(1900, 1, 1)));
        assert_eq!(parse_fuzzy("3rd May 1933"), Some(date(1933, 5, 3)));
    }

    #[test]
    fn parses_abbreviated_months() {
        assert_eq!(parse_fuzzy("Sept. 5, 1921"), Some(date(1921, 9, 5)));
        assert_eq!(parse_fuzzy("jan 2 1950"), Some(date(1950, 1, 2)));
        assert_eq!(parse_fuzzy("Dec 25, 1929"), Some(date(1929, 12, 25)));
    }

    #[test]
    fn parses_numeric_month_first() {
        assert_eq!(parse_fuzzy("3/11/1921"), Some(date(1921, 3, 11)));
        assert_eq!(parse_fuzzy("3-11-1921"), Some(date(1921, 3, 11)));
    }

    #[test]
    fn numeric_falls_back_to_day_first() {
        // 25 is not a valid month, so day-first wins.
        assert_eq!(parse_fuzzy("25/12/1921"), Some(date(1921, 12, 25)));
    }

    #[test]
    fn two_digit_years_expand_around_pivot() {
        assert_eq!(parse_fuzzy("3/11/21"), Some(date(2021, 3, 11)));
        assert_eq!(parse_fuzzy("3/11/71"), Some(date(1971, 3, 11)));
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(parse_fuzzy("13/32/2020"), None);
        assert_eq!(parse_fuzzy("February 30, 1921"), None);
        assert_eq!(parse_fuzzy("the lease deed"), None);
        assert_eq!(parse_fuzzy(""), None);
    }

    #[test]
    fn rejects_year_only() {
        assert_eq!(parse_fuzzy("1921"), None);
    }

    #[test]
    fn alternate_calendar_tags_hit_sentinel() {
        assert_eq!(sort_key("Bengali Calendar Date (Pous 1328 B.S.)"), SENTINEL);
        assert_eq!(sort_key("Unknown Date"), SENTINEL);
    }

    #[test]
    fn sentinel_sorts_before_everything() {
        assert_chronological(&[
            "Bengali Calendar Date (Asadh 1330 B.S.)",
            "January 01, 1800",
            "March 11, 1921",
            "January 15, 1929",
            "12/31/1999",
        ]);
    }
}
