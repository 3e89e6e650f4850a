//! Bounded speech queue drained by a single worker task.
//!
//! The frame loop hands words over by value and only waits when the queue is
//! full. One worker speaks them in FIFO order. A failed utterance is logged
//! and skipped; it never reaches the frame loop.

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use gestalk_core::error::GestalkError;

use crate::SpeechEngine;

/// Counters reported by the worker when the queue is shut down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeechStats {
    pub spoken: u64,
    pub failed: u64,
}

/// Sending side of the speech queue plus the worker that drains it.
#[derive(Debug)]
pub struct SpeechDispatcher {
    tx: mpsc::Sender<String>,
    worker: JoinHandle<SpeechStats>,
}

impl SpeechDispatcher {
    /// Start a worker speaking through `engine` with room for `capacity` queued words.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<E>(engine: E, capacity: usize) -> Self
    where
        E: SpeechEngine + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tracing::info!(engine = engine.name(), capacity, "Speech worker started");
        let worker = tokio::spawn(speech_worker(engine, rx));
        Self { tx, worker }
    }

    /// Queue `text` for speaking.
    ///
    /// Returns immediately unless the queue is full, in which case it waits
    /// for room so that no word is dropped and order is kept.
    pub async fn dispatch(&self, text: impl Into<String>) -> Result<(), GestalkError> {
        match self.tx.try_send(text.into()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(text)) => {
                tracing::warn!(text = %text, "Speech queue full, waiting for the worker");
                self.tx
                    .send(text)
                    .await
                    .map_err(|_| GestalkError::Speech("speech worker has stopped".to_string()))
            }
            Err(TrySendError::Closed(_)) => {
                Err(GestalkError::Speech("speech worker has stopped".to_string()))
            }
        }
    }

    /// Words currently waiting in the queue.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Close the queue, let the worker finish every queued word, and return its counters.
    pub async fn shutdown(self) -> Result<SpeechStats, GestalkError> {
        drop(self.tx);
        let stats = self
            .worker
            .await
            .map_err(|e| GestalkError::Speech(format!("speech worker aborted: {e}")))?;
        tracing::info!(spoken = stats.spoken, failed = stats.failed, "Speech worker stopped");
        Ok(stats)
    }
}

async fn speech_worker<E: SpeechEngine>(engine: E, mut rx: mpsc::Receiver<String>) -> SpeechStats {
    let mut stats = SpeechStats::default();
    while let Some(text) = rx.recv().await {
        match engine.speak(&text).await {
            Ok(()) => {
                stats.spoken += 1;
                tracing::debug!(text = %text, "Spoken");
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(text = %text, error = %e, "Speech failed");
            }
        }
    }
    stats
}
