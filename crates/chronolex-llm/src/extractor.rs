//! Whole-document escalation: prompt construction and payload parsing.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use chronolex_core::event::{EntityMap, EventOrigin, GENERAL_EVENT_TYPE, TimelineEvent};

use crate::backend::EscalationBackend;

/// Fixed confidence assigned to escalated events; the explicit origin tag,
/// not this value, marks an event as escalated.
const ESCALATED_CONFIDENCE: f32 = 0.95;

/// One event triple from the service payload. Missing fields degrade to
/// placeholders instead of rejecting the whole payload.
#[derive(Deserialize)]
struct RawEvent {
    #[serde(default = "unknown_date")]
    date: String,
    #[serde(default = "general_type")]
    event_type: String,
    #[serde(default = "no_description")]
    description: String,
}

fn unknown_date() -> String {
    "Unknown Date".to_string()
}

fn general_type() -> String {
    GENERAL_EVENT_TYPE.to_string()
}

fn no_description() -> String {
    "No description provided.".to_string()
}

/// Extracts a document's full timeline through the escalation service.
pub struct EscalationExtractor {
    backend: Arc<dyn EscalationBackend>,
    event_types: Vec<String>,
}

impl EscalationExtractor {
    pub fn new(backend: Arc<dyn EscalationBackend>, event_types: Vec<String>) -> Self {
        Self {
            backend,
            event_types,
        }
    }

    /// Ask the service for a structured timeline of `text`.
    ///
    /// Escalation failure is never fatal: any service error or malformed
    /// payload is logged and yields an empty list, so the document simply
    /// contributes zero events to the batch.
    pub async fn extract(&self, text: &str, source_file: &str) -> Vec<TimelineEvent> {
        let prompt = self.build_prompt(text);

        let reply = match self.backend.complete(&prompt).await {
            Ok(reply) => reply,
            Err(error) => {
                warn!(
                    source_file,
                    backend = self.backend.name(),
                    %error,
                    "escalation call failed"
                );
                return Vec::new();
            }
        };

        let raw: Vec<RawEvent> = match serde_json::from_str(strip_code_fences(&reply)) {
            Ok(raw) => raw,
            Err(error) => {
                warn!(source_file, %error, "escalation payload unparseable");
                return Vec::new();
            }
        };

        info!(source_file, count = raw.len(), "escalation produced events");
        raw.into_iter()
            .map(|item| TimelineEvent {
                date: item.date,
                event_type: item.event_type,
                description: item.description,
                context: text.to_string(),
                confidence_score: ESCALATED_CONFIDENCE,
                source_file: source_file.to_string(),
                entities: EntityMap::new(),
                origin: EventOrigin::Escalated,
            })
            .collect()
    }

    fn build_prompt(&self, text: &str) -> String {
        format!(
            "Analyze the following legal document text. Act as a meticulous legal \
             analyst and extract a chronological timeline of all significant events.\n\
             \n\
             Instructions:\n\
             1. Identify every event that has a specific date associated with it.\n\
             2. For each event provide exactly three fields:\n\
             - \"date\": the full, normalized date (e.g., \"March 11, 1921\").\n\
             - \"event_type\": one of these exact types: {}.\n\
             - \"description\": a concise, neutral, one-sentence summary.\n\
             3. Return a single valid JSON array of objects, one per event.\n\
             4. Do not include any text outside the JSON array.\n\
             \n\
             Example output:\n\
             [\n\
               {{\"date\": \"March 11, 1921\", \"event_type\": \"Lease Agreement\", \
             \"description\": \"A lease deed was executed between the parties.\"}}\n\
             ]\n\
             \n\
             Document text:\n\
             ---\n\
             {}",
            self.event_types.join(", "),
            text
        )
    }
}

/// Drop incidental Markdown code-fence markers around a JSON payload.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}
