//! Linguistic-annotation boundary for named-entity extraction.
//!
//! Entity extraction is an external capability (a model server, an NER
//! sidecar). The pipeline degrades to an empty mapping when no annotator is
//! wired in; absence of the capability is never an error.

use chronolex_core::event::EntityMap;

/// External annotation capability producing named entities grouped by kind.
///
/// Implementations must tolerate concurrent calls from parallel document
/// workers.
pub trait EntityAnnotator: Send + Sync {
    /// Extract named entities from a text span.
    fn annotate(&self, text: &str) -> EntityMap;
}

/// Annotator returning a fixed mapping regardless of input.
///
/// Stands in for a real model in tests and smoke runs.
pub struct StaticAnnotator {
    entities: EntityMap,
}

impl StaticAnnotator {
    pub fn new(entities: EntityMap) -> Self {
        Self { entities }
    }
}

impl EntityAnnotator for StaticAnnotator {
    fn annotate(&self, _text: &str) -> EntityMap {
        self.entities.clone()
    }
}
