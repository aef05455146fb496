//! Escalation boundary for low-confidence documents.
//!
//! When the local pass cannot commit to a document, the whole text is sent
//! to an external reasoning service which returns a structured JSON array of
//! dated events. The [`EscalationBackend`] trait is the provider seam; the
//! [`EscalationExtractor`] owns prompt construction and payload parsing.

mod backend;
mod error;
mod extractor;
mod gemini;

pub use backend::{EscalationBackend, MockBackend, MockReply, with_retry};
pub use error::{LlmError, Result};
pub use extractor::EscalationExtractor;
pub use gemini::{GeminiBackend, GeminiConfig};
