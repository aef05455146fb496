//! Escalation backend trait, retry policy, and the scripted test backend.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{LlmError, Result};

/// A reasoning service that turns a prompt into a raw text reply.
///
/// Implementations must tolerate concurrent calls from parallel document
/// workers; there is no client-side serialisation beyond provider rate
/// limits, which surface as retryable [`LlmError::RateLimit`] values.
#[async_trait]
pub trait EscalationBackend: Send + Sync {
    /// Send a prompt and return the service's raw text reply.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Provider name used in logs.
    fn name(&self) -> &str;
}

/// Run `f` with exponential backoff on retryable errors.
pub async fn with_retry<F, Fut, T>(
    max_retries: u32,
    initial_backoff: Duration,
    backend_name: &str,
    mut f: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut backoff = initial_backoff;
    let mut last_error = None;

    for attempt in 0..=max_retries {
        match f().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                if !error.is_retryable() {
                    return Err(error);
                }
                last_error = Some(error);
                if attempt < max_retries {
                    tracing::warn!(
                        backend = backend_name,
                        attempt = attempt + 1,
                        max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        "request failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| LlmError::Network("retry loop exhausted".into())))
}

/// Scripted reply for [`MockBackend`].
pub enum MockReply {
    Text(String),
    Error(LlmError),
}

/// Backend returning canned replies in order, logging every prompt.
///
/// Intended for pipeline and extractor tests; no network involved.
pub struct MockBackend {
    script: Mutex<Vec<MockReply>>,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(script: Vec<MockReply>) -> Self {
        Self {
            script: Mutex::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A backend whose next reply is the given text.
    pub fn with_reply(text: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Text(text.into())])
    }

    /// A backend whose next call fails with a service error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Error(LlmError::Server {
            status: 500,
            body: message.into(),
        })])
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl EscalationBackend for MockBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut script = self.script.lock().unwrap();
        if script.is_empty() {
            return Err(LlmError::Payload("mock script exhausted".into()));
        }
        match script.remove(0) {
            MockReply::Text(text) => Ok(text),
            MockReply::Error(error) => Err(error),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
