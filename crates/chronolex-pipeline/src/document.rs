//! The per-document hybrid decision pipeline.
//!
//! A document flows through a local scan first: detect dates, classify the
//! window around each one in offset order. Every match must clear the
//! confidence threshold for the local results to stand; a single weak
//! signal is treated as evidence the whole document is ambiguous, so the
//! scan aborts immediately and the full text goes to the escalation
//! service instead. Whatever escalation returns, including nothing,
//! replaces the abandoned local partials.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use chronolex_core::Config;
use chronolex_core::event::{EventOrigin, TimelineEvent};
use chronolex_extract::{DateDetector, EntityAnnotator, EventClassifier, context_window};
use chronolex_llm::{EscalationBackend, EscalationExtractor};

use crate::input::DocumentSource;

/// Verdict of the local scan.
enum ScanOutcome {
    /// Every match cleared the threshold; these are the document's events.
    Accepted(Vec<TimelineEvent>),
    /// No date anchor, or a below-threshold match: escalate the document.
    NeedsEscalation,
}

/// Runs one document through detection, classification, and, when local
/// confidence is insufficient, whole-document escalation.
pub struct DocumentPipeline {
    detector: DateDetector,
    classifier: EventClassifier,
    escalation: EscalationExtractor,
    confidence_threshold: f32,
    context_half_width: usize,
}

impl DocumentPipeline {
    pub fn new(
        config: &Config,
        backend: Arc<dyn EscalationBackend>,
        annotator: Option<Arc<dyn EntityAnnotator>>,
    ) -> Self {
        Self {
            detector: DateDetector::new(&config.extraction),
            classifier: EventClassifier::new(&config.extraction, annotator),
            escalation: EscalationExtractor::new(backend, config.extraction.event_types.clone()),
            confidence_threshold: config.processing.llm_fallback_threshold,
            context_half_width: config.processing.context_window,
        }
    }

    /// Process one document's text into its final event list.
    ///
    /// Never fails for a valid document: collaborator errors degrade to an
    /// empty result inside the escalation extractor, and blank input yields
    /// zero events without touching the service.
    pub async fn process_text(&self, text: &str, source_file: &str) -> Vec<TimelineEvent> {
        if text.trim().is_empty() {
            debug!(source_file, "blank document, no events");
            return Vec::new();
        }

        match self.local_scan(text, source_file) {
            ScanOutcome::Accepted(events) => {
                info!(source_file, count = events.len(), "accepted local extraction");
                events
            }
            ScanOutcome::NeedsEscalation => {
                info!(source_file, "escalating document");
                self.escalation.extract(text, source_file).await
            }
        }
    }

    /// Read a file through the input adapter and process its text.
    pub async fn process_file(&self, source: &DocumentSource, path: &Path) -> Vec<TimelineEvent> {
        let text = source.read_content(path);
        let source_file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.process_text(&text, &source_file).await
    }

    /// Detect and classify in offset order, short-circuiting on the first
    /// below-threshold match.
    fn local_scan(&self, text: &str, source_file: &str) -> ScanOutcome {
        let matches = self.detector.find_dates(text);
        if matches.is_empty() {
            debug!(source_file, "no date anchors found");
            return ScanOutcome::NeedsEscalation;
        }

        let mut events = Vec::with_capacity(matches.len());
        for m in &matches {
            let window = context_window(text, m, self.context_half_width);
            let result = self.classifier.classify(window);

            if result.confidence < self.confidence_threshold {
                debug!(
                    source_file,
                    date = %m.date,
                    confidence = result.confidence,
                    threshold = self.confidence_threshold,
                    "below threshold, abandoning local results"
                );
                return ScanOutcome::NeedsEscalation;
            }

            events.push(TimelineEvent {
                date: m.date.clone(),
                event_type: result.event_type,
                description: result.description,
                context: window.to_string(),
                confidence_score: result.confidence,
                source_file: source_file.to_string(),
                entities: result.entities,
                origin: EventOrigin::Local,
            });
        }
        ScanOutcome::Accepted(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronolex_llm::MockBackend;

    const ESCALATED_PAYLOAD: &str = r#"[
        {"date": "June 02, 1931", "event_type": "Court Filing",
         "description": "A suit was filed over unpaid royalties."}
    ]"#;

    /// A sentence that clears the 0.8 threshold inside a small window:
    /// 0.5 base + 0.2 specific type + 0.15 legal register = 0.85.
    const STRONG: &str = "The plaintiff leased the property on March 11, 1921 here.";

    fn pipeline_with(backend: Arc<MockBackend>, config: &Config) -> DocumentPipeline {
        DocumentPipeline::new(config, backend, None)
    }

    fn pipeline(backend: Arc<MockBackend>) -> DocumentPipeline {
        pipeline_with(backend, &Config::default())
    }

    #[tokio::test]
    async fn blank_document_yields_nothing_without_escalation() {
        let backend = Arc::new(MockBackend::with_reply("[]"));
        let events = pipeline(backend.clone()).process_text("  \n\t ", "blank.txt").await;
        assert!(events.is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn dateless_document_always_escalates() {
        let backend = Arc::new(MockBackend::with_reply(ESCALATED_PAYLOAD));
        let events = pipeline(backend.clone())
            .process_text("no dates anywhere in this deed", "deed.txt")
            .await;

        assert_eq!(backend.call_count(), 1);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].origin, EventOrigin::Escalated);
        assert_eq!(events[0].source_file, "deed.txt");
    }

    #[tokio::test]
    async fn confident_document_accepted_locally() {
        let backend = Arc::new(MockBackend::with_reply("[]"));
        let events = pipeline(backend.clone()).process_text(STRONG, "deed.txt").await;

        assert_eq!(backend.call_count(), 0, "local acceptance must not call the service");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, "March 11, 1921");
        assert_eq!(events[0].event_type, "Lease Agreement");
        assert_eq!(events[0].origin, EventOrigin::Local);
        assert!(events[0].confidence_score >= 0.8);
        assert!(!events[0].description.is_empty());
    }

    #[tokio::test]
    async fn weak_match_short_circuits_to_escalation() {
        // Three dates; narrow windows keep their contexts independent. The
        // second window has no keywords and scores 0.5.
        let mut config = Config::default();
        config.processing.context_window = 25;
        let filler = "x ".repeat(40);
        let text = format!(
            "The plaintiff leased it on March 11, 1921 here. {filler} \
             something happened on April 02, 1922 there {filler} \
             the plaintiff leased more on May 03, 1923 too."
        );

        let backend = Arc::new(MockBackend::with_reply(ESCALATED_PAYLOAD));
        let events = pipeline_with(backend.clone(), &config)
            .process_text(&text, "deed.txt")
            .await;

        assert_eq!(backend.call_count(), 1);
        // The result is escalation output only, no mix with the accepted
        // first local event.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date, "June 02, 1931");
        assert!(events.iter().all(|e| e.origin == EventOrigin::Escalated));
        // Escalation sees the whole document, not a window.
        assert!(backend.prompts()[0].contains("May 03, 1923"));
    }

    #[tokio::test]
    async fn escalation_output_replaces_partials_even_when_empty() {
        let mut config = Config::default();
        config.processing.context_window = 25;
        let text = "The plaintiff leased it on March 11, 1921 here. \
                    Later, April 02, 1922 passed without anything notable at all.";

        let backend = Arc::new(MockBackend::with_reply("[]"));
        let events = pipeline_with(backend.clone(), &config)
            .process_text(text, "deed.txt")
            .await;

        assert_eq!(backend.call_count(), 1);
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn escalation_failure_degrades_to_empty() {
        let backend = Arc::new(MockBackend::failing("boom"));
        let events = pipeline(backend.clone())
            .process_text("nothing dated here", "deed.txt")
            .await;
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn borderline_lease_sentence_escalates_at_default_threshold() {
        // One specific-type hit but no legal register and a short window:
        // 0.7 < 0.8, so the document goes to the service.
        let backend = Arc::new(MockBackend::with_reply("[]"));
        let text = "The lease was executed on March 11, 1921 between A and B.";
        pipeline(backend.clone()).process_text(text, "deed.txt").await;
        assert_eq!(backend.call_count(), 1);
    }
}
