//! Date detection over raw document text.
//!
//! An ordered list of case-insensitive grammars is applied to the whole
//! document; each hit is normalized through the canonical date parser.
//! When two grammars match at the same start offset, the earlier grammar
//! wins, so the pattern list order is a priority order.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use chronolex_core::config::ExtractionConfig;
use chronolex_core::date;

/// A normalized date and its position in source text.
///
/// Produced and consumed within a single document's pipeline run; start/end
/// are byte offsets into the document, unique per start offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateMatch {
    /// Canonical "Month Day, Year" string, or a tagged alternate-calendar
    /// form.
    pub date: String,
    pub start: usize,
    pub end: usize,
}

/// Day-first: "11th of March, 1921", "3 May 1933".
const DAY_FIRST: &str =
    r"\b\d{1,2}(?:st|nd|rd|th)?\s+(?:of\s+)?(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?,?\s+\d{4}\b";

/// Month-first: "March 11, 1921", "Sept. 5 1921".
const MONTH_FIRST: &str =
    r"\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+\d{4}\b";

/// Numeric: "3/11/1921", "3-11-21".
const NUMERIC: &str = r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b";

/// Bengali civil calendar: "Pous 1328 B.S.". Matches are tagged, not parsed.
const BENGALI: &str = r"\b(?:Pous|Asadh)\s+\d{4}\s+B\.S\.";

/// Finds date-like substrings and normalizes them to canonical form.
pub struct DateDetector {
    patterns: Vec<Regex>,
}

impl DateDetector {
    pub fn new(config: &ExtractionConfig) -> Self {
        let mut sources = vec![DAY_FIRST, MONTH_FIRST, NUMERIC];
        if config.date_patterns.include_bengali_calendar {
            sources.push(BENGALI);
        }
        Self::from_patterns(
            sources
                .into_iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .expect("date grammar compiles")
                })
                .collect(),
        )
    }

    fn from_patterns(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// Scan `text` for dates, returning at most one match per start offset,
    /// ordered by appearance position.
    ///
    /// Malformed candidates (matched by a grammar but not a real calendar
    /// date) are silently dropped. Never fails on arbitrary input text.
    pub fn find_dates(&self, text: &str) -> Vec<DateMatch> {
        let mut by_start: BTreeMap<usize, DateMatch> = BTreeMap::new();
        for pattern in &self.patterns {
            for m in pattern.find_iter(text) {
                let Some(normalized) = normalize(m.as_str()) else {
                    debug!(raw = m.as_str(), "dropping unparseable date candidate");
                    continue;
                };
                by_start.entry(m.start()).or_insert(DateMatch {
                    date: normalized,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        by_start.into_values().collect()
    }
}

/// Normalize a raw date expression to its canonical string, or tag it as an
/// alternate-calendar date.
fn normalize(raw: &str) -> Option<String> {
    if raw.to_ascii_uppercase().contains("B.S.") {
        return Some(format!("Bengali Calendar Date ({})", raw.trim()));
    }
    date::parse_fuzzy(raw).map(date::canonical)
}
