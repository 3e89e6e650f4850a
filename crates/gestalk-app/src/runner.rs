//! The frame loop.
//!
//! Pulls one frame at a time from a [`LandmarkProvider`], applies pending
//! keyboard commands, runs the [`Interpreter`], hands dispatched words to the
//! speech queue and renders the overlay. The loop ends on quit, end of
//! stream or capture failure; the speech queue is drained before
//! [`FrameLoop::run`] returns.

use std::fmt;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use uuid::Uuid;

use gestalk_capture::{CaptureSession, LandmarkProvider};
use gestalk_core::error::Result;
use gestalk_core::types::Gesture;
use gestalk_recognizer::Interpreter;
use gestalk_speech::{SpeechDispatcher, SpeechStats};

use crate::controls::{ControlEvent, Controls};
use crate::overlay::{Overlay, OverlayView};

/// Why the frame loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The user asked to quit.
    Quit,
    /// The provider ran out of frames.
    EndOfStream,
    /// Reading a frame failed; the message is the capture error.
    CaptureFailed(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Quit => write!(f, "quit"),
            StopReason::EndOfStream => write!(f, "end of stream"),
            StopReason::CaptureFailed(msg) => write!(f, "capture failed: {msg}"),
        }
    }
}

/// What happened during one run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub session_id: Uuid,
    pub capture_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub frames: u64,
    pub confirmations: u64,
    /// Words that reached the speech queue, in order.
    pub dispatched: Vec<Gesture>,
    /// Sentence as it stood when the loop ended.
    pub sentence: String,
    pub speech: SpeechStats,
    pub stop: StopReason,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self.dispatched.iter().map(|w| w.as_str()).collect();
        writeln!(f, "Session {} stopped: {}", self.session_id, self.stop)?;
        writeln!(
            f,
            "  frames: {}, confirmed: {}, spoken: {}, speech failures: {}",
            self.frames, self.confirmations, self.speech.spoken, self.speech.failed
        )?;
        writeln!(f, "  words: {}", words.join(" "))?;
        write!(f, "  sentence: {}", self.sentence.trim_end())
    }
}

/// One capture session's worth of wiring.
pub struct FrameLoop<P, O> {
    provider: P,
    interpreter: Interpreter,
    speech: SpeechDispatcher,
    overlay: O,
    controls: Controls,
}

impl<P: LandmarkProvider, O: Overlay> FrameLoop<P, O> {
    pub fn new(
        provider: P,
        interpreter: Interpreter,
        speech: SpeechDispatcher,
        overlay: O,
        controls: Controls,
    ) -> Self {
        Self {
            provider,
            interpreter,
            speech,
            overlay,
            controls,
        }
    }

    /// Run until quit, end of stream or capture failure.
    ///
    /// Frames without a recorded timestamp are stamped with the time elapsed
    /// since the loop started.
    pub async fn run(mut self) -> Result<RunSummary> {
        let mut capture = CaptureSession::start();
        let clock = Instant::now();
        tracing::info!(
            session_id = %self.interpreter.id(),
            capture_id = %capture.id(),
            "Frame loop started"
        );

        let stop = 'frames: loop {
            for event in self.controls.drain() {
                match event {
                    ControlEvent::Quit => {
                        tracing::info!("Quit requested");
                        break 'frames StopReason::Quit;
                    }
                    ControlEvent::Clear => self.interpreter.clear_sentence(),
                }
            }

            let frame = match self.provider.next_frame().await {
                Ok(Some(frame)) => frame,
                Ok(None) => break StopReason::EndOfStream,
                Err(e) => {
                    tracing::error!(error = %e, frames = capture.frames_captured(), "Capture failed");
                    break StopReason::CaptureFailed(e.to_string());
                }
            };
            capture.record_frame();

            let now = frame.timestamp().unwrap_or_else(|| clock.elapsed());
            let outcome = self.interpreter.process_frame(&frame.hands, now);

            if let Some(word) = outcome.dispatched {
                if let Err(e) = self.speech.dispatch(word.as_str()).await {
                    tracing::warn!(word = %word, error = %e, "Speech dispatch failed");
                }
            }

            let view = OverlayView {
                confirmed: outcome.confirmed,
                dispatched: outcome.dispatched,
                sentence: self.interpreter.sentence(),
            };
            if let Err(e) = self.overlay.render(&view) {
                tracing::warn!(error = %e, "Overlay render failed");
            }
        };

        capture.stop();
        let speech = self.speech.shutdown().await?;

        let summary = RunSummary {
            session_id: self.interpreter.id(),
            capture_id: capture.id(),
            started_at: self.interpreter.started_at(),
            finished_at: Utc::now(),
            frames: capture.frames_captured(),
            confirmations: self.interpreter.confirmations(),
            dispatched: self
                .interpreter
                .transcript()
                .entries()
                .iter()
                .map(|entry| entry.word)
                .collect(),
            sentence: self.interpreter.sentence().to_string(),
            speech,
            stop,
        };
        tracing::info!(
            session_id = %summary.session_id,
            frames = summary.frames,
            confirmations = summary.confirmations,
            dispatched = summary.dispatched.len(),
            stop = %summary.stop,
            "Frame loop finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(stop: StopReason) -> RunSummary {
        RunSummary {
            session_id: Uuid::nil(),
            capture_id: Uuid::nil(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            frames: 90,
            confirmations: 3,
            dispatched: vec![Gesture::Hello, Gesture::Ok],
            sentence: "Hello OK ".to_string(),
            speech: SpeechStats {
                spoken: 2,
                failed: 0,
            },
            stop,
        }
    }

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::Quit.to_string(), "quit");
        assert_eq!(StopReason::EndOfStream.to_string(), "end of stream");
        assert_eq!(
            StopReason::CaptureFailed("Capture error: eof".to_string()).to_string(),
            "capture failed: Capture error: eof"
        );
    }

    #[test]
    fn test_summary_display() {
        let text = summary(StopReason::EndOfStream).to_string();
        assert!(text.contains("stopped: end of stream"));
        assert!(text.contains("frames: 90, confirmed: 3, spoken: 2"));
        assert!(text.contains("words: Hello OK"));
        assert!(text.ends_with("sentence: Hello OK"));
    }
}
