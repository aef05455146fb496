//! Keyword-lexicon event classification over date context windows.
//!
//! Each candidate event type carries a set of keyword rules; a context
//! window is scored by counting which rules hit, and the type with the
//! strictly highest count wins. Ties break to the earliest type in the
//! configured `extraction.event_types` order: the declared order is the
//! tie-break policy, not an accident of iteration.

use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use chronolex_core::config::ExtractionConfig;
use chronolex_core::event::{EntityMap, GENERAL_EVENT_TYPE};

use crate::dates::DateMatch;
use crate::entities::EntityAnnotator;

const BASE_CONFIDENCE: f32 = 0.5;
const SPECIFIC_TYPE_BONUS: f32 = 0.2;
const LONG_CONTEXT_BONUS: f32 = 0.1;
const LONG_CONTEXT_CHARS: usize = 200;
const LEGAL_REGISTER_BONUS: f32 = 0.15;
const MIN_DESCRIPTION_CHARS: usize = 20;

/// Terms of the legal register whose presence raises confidence.
const LEGAL_REGISTER_TERMS: [&str; 5] =
    ["plaintiff", "defendant", "decree", "suit", "hereinafter"];

/// Classification result for a single context window.
#[derive(Debug, Clone)]
pub struct Classification {
    pub event_type: String,
    /// Heuristic confidence in [0, 1]; additive bonuses over a 0.5 base.
    pub confidence: f32,
    pub description: String,
    pub entities: EntityMap,
}

/// Classifies date context windows into legal event types.
pub struct EventClassifier {
    /// (event type, compiled keyword rules), in configured priority order.
    rules: Vec<(String, Vec<Regex>)>,
    annotator: Option<Arc<dyn EntityAnnotator>>,
}

impl EventClassifier {
    /// Build a classifier for the configured event types.
    ///
    /// Types without a built-in keyword lexicon entry get no rules and can
    /// only be produced by the escalation service.
    pub fn new(config: &ExtractionConfig, annotator: Option<Arc<dyn EntityAnnotator>>) -> Self {
        let rules = config
            .event_types
            .iter()
            .map(|event_type| {
                let compiled = builtin_rules(event_type)
                    .iter()
                    .map(|p| {
                        RegexBuilder::new(p)
                            .case_insensitive(true)
                            .build()
                            .expect("keyword rule compiles")
                    })
                    .collect();
                (event_type.clone(), compiled)
            })
            .collect();
        Self { rules, annotator }
    }

    /// Classify a context window: event type, confidence, description,
    /// entities.
    pub fn classify(&self, context: &str) -> Classification {
        let event_type = self.score_event_type(context);
        let confidence = confidence_score(&event_type, context);
        let description = describe(context);
        let entities = self
            .annotator
            .as_deref()
            .map(|a| a.annotate(context))
            .unwrap_or_default();

        Classification {
            event_type,
            confidence,
            description,
            entities,
        }
    }

    /// Count rule hits per type; strictly-highest wins, ties break to the
    /// earliest configured type. Zero hits everywhere yields the fallback.
    fn score_event_type(&self, context: &str) -> String {
        let mut best: Option<(&str, usize)> = None;
        for (event_type, rules) in &self.rules {
            let hits = rules.iter().filter(|r| r.is_match(context)).count();
            if hits > 0 && best.is_none_or(|(_, max)| hits > max) {
                best = Some((event_type, hits));
            }
        }
        best.map(|(t, _)| t.to_string())
            .unwrap_or_else(|| GENERAL_EVENT_TYPE.to_string())
    }
}

/// Extract the classification window around a date match: `half_width`
/// characters each side, clamped to document bounds.
///
/// Offsets are clamped to UTF-8 character boundaries so the slice is always
/// valid.
pub fn context_window<'a>(text: &'a str, m: &DateMatch, half_width: usize) -> &'a str {
    let lo = floor_char_boundary(text, m.start.saturating_sub(half_width));
    let hi = ceil_char_boundary(text, m.end.saturating_add(half_width));
    &text[lo..hi]
}

/// Built-in keyword rules per event type. A rule counts one hit when it
/// matches anywhere in the window, regardless of occurrence count.
fn builtin_rules(event_type: &str) -> &'static [&'static str] {
    match event_type {
        "Lease Agreement" => &[r"\b(?:lease|leased|lessor|lessee|patta)\b"],
        "Court Filing" => &[r"\b(?:filed|suit|petition|appeal|case no)\b"],
        "Decree/Judgment" => &[r"\b(?:judgment|decree|order|ruling|court held)\b"],
        "Contract Execution" => &[r"\b(?:executed|signed|agreement|deed|contract)\b"],
        "Property Sale" => &[r"\b(?:sold|sale|purchase|bought|deed of sale)\b"],
        "Compromise/Settlement" => &[r"\b(?:compromise|settlement|settled|rafanama)\b"],
        "Registration" => &[r"\b(?:registered|registration|sub-registrar)\b"],
        _ => &[],
    }
}

// ── scoring ──

/// Additive confidence: base 0.5; +0.2 specific type; +0.1 long context;
/// +0.15 legal-register term. Clamped to 1.0.
fn confidence_score(event_type: &str, context: &str) -> f32 {
    let mut score = BASE_CONFIDENCE;
    if event_type != GENERAL_EVENT_TYPE {
        score += SPECIFIC_TYPE_BONUS;
    }
    if context.chars().count() > LONG_CONTEXT_CHARS {
        score += LONG_CONTEXT_BONUS;
    }
    let lowered = context.to_lowercase();
    if LEGAL_REGISTER_TERMS.iter().any(|term| lowered.contains(term)) {
        score += LEGAL_REGISTER_BONUS;
    }
    score.min(1.0)
}

/// Pick the first sentence longer than the substance threshold; fall back
/// to the first sentence, copying text rather than fabricating it.
fn describe(context: &str) -> String {
    let flat = context.replace('\n', " ");
    let sentences = split_sentences(&flat);
    let Some(first) = sentences.first() else {
        return "No description available.".to_string();
    };
    sentences
        .iter()
        .find(|s| s.chars().count() > MIN_DESCRIPTION_CHARS)
        .unwrap_or(first)
        .trim()
        .to_string()
}

/// Split after sentence-ending punctuation followed by whitespace.
fn split_sentences(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?')
            && bytes.get(i + 1).is_some_and(|b| b.is_ascii_whitespace())
        {
            pieces.push(&text[start..=i]);
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }
    if start < bytes.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_char_boundary(s: &str, mut i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}
