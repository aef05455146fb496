//! Timeline event records shared between local extraction, escalation, and
//! output rendering.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Catch-all event type assigned when no keyword rule matches.
pub const GENERAL_EVENT_TYPE: &str = "General Legal Event";

/// Named-entity categories recognised at the annotation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Organization,
    Place,
    Money,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Place => "place",
            Self::Money => "money",
        }
    }
}

/// Entity surface strings grouped by kind.
///
/// Sets are deduplicated and order-insensitive; BTree containers keep
/// serialised output deterministic.
pub type EntityMap = BTreeMap<EntityKind, BTreeSet<String>>;

/// Which pass produced an event: the local keyword classifier or the
/// whole-document escalation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOrigin {
    Local,
    Escalated,
}

/// A single dated legal event extracted from a document.
///
/// Created once by the classifier or the escalation extractor and never
/// mutated afterwards; downstream code only aggregates, sorts, and
/// serialises these records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Canonical "Month Day, Year" string, or a tagged alternate-calendar
    /// form such as "Bengali Calendar Date (Pous 1328 B.S.)".
    pub date: String,
    pub event_type: String,
    pub description: String,
    /// The text window the event was derived from; escalated events carry
    /// the full document text.
    pub context: String,
    /// Heuristic confidence in [0, 1].
    pub confidence_score: f32,
    pub source_file: String,
    pub entities: EntityMap,
    pub origin: EventOrigin,
}
