//! Document orchestration: the per-document hybrid decision pipeline, the
//! bounded concurrent batch coordinator, and the thin file input adapter.

mod batch;
mod document;
mod input;

pub use batch::{BatchCoordinator, BatchOutcome};
pub use document::DocumentPipeline;
pub use input::{DocumentSource, InputError};
