//! Local extraction pass: regex date detection and keyword-lexicon event
//! classification, with the entity-annotation boundary.

mod classify;
mod dates;
mod entities;

pub use classify::{Classification, EventClassifier, context_window};
pub use dates::{DateDetector, DateMatch};
pub use entities::{EntityAnnotator, StaticAnnotator};
