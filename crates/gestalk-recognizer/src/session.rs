//! Interpreter session: the per-frame recognition loop body.
//!
//! The `Interpreter` owns every piece of mutable recognition state (motion
//! history, dwell timers, repeat filter and transcript) and is driven one
//! frame at a time through [`Interpreter::process_frame`]. Nothing is global,
//! so independent sessions can run side by side in tests with synthetic clocks.

use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use gestalk_core::config::RecognizerConfig;
use gestalk_core::error::Result;
use gestalk_core::types::{Gesture, Hand};

use crate::classifier::classify_static;
use crate::finger::extract_fingers;
use crate::motion::MotionBuffer;
use crate::stabilizer::Stabilizer;

/// Result of processing one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Candidate of the last hand inspected on this frame.
    pub candidate: Option<Gesture>,
    /// Word whose dwell requirement was met on this frame.
    pub confirmed: Option<Gesture>,
    /// Confirmed word that also passed the repeat filter and should be spoken.
    pub dispatched: Option<Gesture>,
}

/// Session-level repeat filter.
///
/// A word passes when it differs from the previously dispatched word, or when
/// the cooldown has elapsed since the previous dispatch.
#[derive(Debug, Clone)]
pub struct DispatchGate {
    cooldown: Duration,
    prev_word: Option<Gesture>,
    last_dispatch: Option<Duration>,
}

impl DispatchGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            prev_word: None,
            last_dispatch: None,
        }
    }

    /// Decide whether `word` confirmed at `now` goes downstream, recording it if so.
    pub fn admit(&mut self, word: Gesture, now: Duration) -> bool {
        let changed = self.prev_word != Some(word);
        let cooled = self
            .last_dispatch
            .map_or(true, |last| now.saturating_sub(last) >= self.cooldown);

        if changed || cooled {
            self.prev_word = Some(word);
            self.last_dispatch = Some(now);
            true
        } else {
            tracing::debug!(word = %word, "Repeat suppressed within cooldown");
            false
        }
    }

    pub fn prev_word(&self) -> Option<Gesture> {
        self.prev_word
    }

    pub fn last_dispatch(&self) -> Option<Duration> {
        self.last_dispatch
    }
}

/// One dispatched word with its wall-clock time.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub word: Gesture,
    pub at: DateTime<Utc>,
}

/// Running sentence shown on the banner, plus the history of dispatched words.
///
/// Clearing empties the sentence only; the history lasts for the session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    sentence: String,
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `word` followed by a single space.
    pub fn push(&mut self, word: Gesture) {
        self.sentence.push_str(word.as_str());
        self.sentence.push(' ');
        self.entries.push(TranscriptEntry {
            word,
            at: Utc::now(),
        });
    }

    pub fn clear(&mut self) {
        self.sentence.clear();
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }
}

/// Gesture interpreter for one capture session.
#[derive(Debug, Clone)]
pub struct Interpreter {
    id: Uuid,
    started_at: DateTime<Utc>,
    split_gap: f32,
    motion: MotionBuffer,
    stabilizer: Stabilizer,
    gate: DispatchGate,
    transcript: Transcript,
    frames: u64,
    confirmations: u64,
}

impl Interpreter {
    /// Create an interpreter with validated thresholds.
    pub fn new(config: &RecognizerConfig) -> Result<Self> {
        config.validate()?;
        let dwell = config.dwell()?;
        let cooldown = config.cooldown()?;

        let interpreter = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            split_gap: config.split_gap,
            motion: MotionBuffer::new(config.motion_capacity, config.motion_min_each),
            stabilizer: Stabilizer::new(dwell),
            gate: DispatchGate::new(cooldown),
            transcript: Transcript::new(),
            frames: 0,
            confirmations: 0,
        };
        tracing::info!(
            session_id = %interpreter.id,
            dwell_ms = dwell.as_millis() as u64,
            cooldown_ms = cooldown.as_millis() as u64,
            "Interpreter session started"
        );
        Ok(interpreter)
    }

    /// Process the hands detected on one frame captured at stream time `now`.
    ///
    /// Hands are inspected in detector order. Each one updates the shared
    /// motion history and the dwell timers; the first hand to confirm a word
    /// ends processing for the frame, and the confirmation clears both the
    /// motion history and every timer. A frame without hands resets the timers.
    pub fn process_frame(&mut self, hands: &[Hand], now: Duration) -> FrameOutcome {
        self.frames += 1;
        let mut outcome = FrameOutcome::default();

        if hands.is_empty() {
            self.stabilizer.reset();
            return outcome;
        }

        for hand in hands {
            let fingers = extract_fingers(hand);
            let static_word = classify_static(fingers, hand, self.split_gap);

            self.motion.record(fingers);
            let motion_word = self.motion.detect();

            let candidate = motion_word.or(static_word);
            tracing::trace!(
                handedness = %hand.handedness,
                fingers = %fingers,
                candidate = ?candidate,
                "Hand classified"
            );
            outcome.candidate = candidate;

            if let Some(word) = self.stabilizer.observe(candidate, now) {
                self.motion.clear();
                self.stabilizer.reset();
                self.confirmations += 1;
                outcome.confirmed = Some(word);
                tracing::info!(
                    session_id = %self.id,
                    word = %word,
                    handedness = %hand.handedness,
                    "Gesture confirmed"
                );
                break;
            }
        }

        if let Some(word) = outcome.confirmed {
            if self.gate.admit(word, now) {
                self.transcript.push(word);
                outcome.dispatched = Some(word);
                tracing::info!(
                    session_id = %self.id,
                    word = %word,
                    sentence = %self.transcript.sentence(),
                    "Gesture dispatched"
                );
            }
        }

        outcome
    }

    /// Reset the running sentence (user "clear" command).
    pub fn clear_sentence(&mut self) {
        tracing::info!(session_id = %self.id, "Sentence cleared");
        self.transcript.clear();
    }

    pub fn sentence(&self) -> &str {
        self.transcript.sentence()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    pub fn confirmations(&self) -> u64 {
        self.confirmations
    }

    pub fn motion(&self) -> &MotionBuffer {
        &self.motion
    }

    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }
}

// =============================================================================
// Tests
// =============================================================================
