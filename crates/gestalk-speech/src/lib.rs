//! Gestalk Speech crate - speech synthesis backends and the speech queue.
//!
//! Provides the `SpeechEngine` trait, a logging engine, a silent engine, an
//! engine that runs an external text-to-speech command, a mock engine for
//! tests, and the `SpeechDispatcher` that feeds one engine from a bounded
//! FIFO queue on a dedicated worker task.

pub mod command;
pub mod dispatcher;

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gestalk_core::error::GestalkError;

pub use command::CommandSpeechEngine;
pub use dispatcher::{SpeechDispatcher, SpeechStats};

// =============================================================================
// Traits
// =============================================================================

/// Backend that turns text into audible speech.
///
/// `speak` resolves once the utterance has finished, so a single worker
/// calling it in a loop speaks words strictly in order.
pub trait SpeechEngine: Send + Sync {
    fn speak(&self, text: &str) -> impl Future<Output = Result<(), GestalkError>> + Send;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

// =============================================================================
// Engines
// =============================================================================

/// Writes each utterance to the log instead of producing audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSpeechEngine;

impl SpeechEngine for LogSpeechEngine {
    async fn speak(&self, text: &str) -> Result<(), GestalkError> {
        tracing::info!(text, "Speak");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Discards every utterance.
#[derive(Debug, Clone, Copy, Default)]
pub struct MuteSpeechEngine;

impl SpeechEngine for MuteSpeechEngine {
    async fn speak(&self, _text: &str) -> Result<(), GestalkError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mute"
    }
}

/// Mock speech engine for testing.
///
/// Records every utterance in order. Clones share the record, so a test can
/// keep one handle while the dispatcher owns another.
#[derive(Debug, Clone, Default)]
pub struct MockSpeechEngine {
    spoken: Arc<Mutex<Vec<String>>>,
    delay: Duration,
    fail_on: Option<String>,
}

impl MockSpeechEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `delay` to speak each utterance.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail whenever asked to speak exactly `text`.
    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }

    /// Utterances spoken so far, oldest first.
    pub fn spoken(&self) -> Vec<String> {
        match self.spoken.lock() {
            Ok(spoken) => spoken.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SpeechEngine for MockSpeechEngine {
    async fn speak(&self, text: &str) -> Result<(), GestalkError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_on.as_deref() == Some(text) {
            return Err(GestalkError::Speech(format!("mock failure on {text:?}")));
        }
        self.spoken
            .lock()
            .map_err(|e| GestalkError::Speech(format!("Lock poisoned: {e}")))?
            .push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
