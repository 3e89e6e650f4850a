//! Synthetic landmark sources.
//!
//! `ScriptedLandmarkProvider` plays a list of timed segments (a held pose, a
//! wave, an empty frame run) at a fixed frame rate, stamping each frame with
//! its stream time. It drives `--demo` and the end-to-end tests.
//! `MockLandmarkProvider` returns a fixed list of frames and can end in a
//! capture failure.

use std::collections::VecDeque;
use std::time::Duration;

use gestalk_core::error::GestalkError;
use gestalk_core::pose::synthesize_hand_with_gap;
use gestalk_core::pose::RELAXED_GAP;
use gestalk_core::types::{FingerState, Hand, Handedness, LandmarkFrame};

use crate::LandmarkProvider;

const OPEN: [u8; 5] = [1, 1, 1, 1, 1];
const FIST: [u8; 5] = [0, 0, 0, 0, 0];

#[derive(Debug, Clone, PartialEq)]
enum Motion {
    /// The same hands on every frame.
    Hold(Vec<Hand>),
    /// Alternate an open palm and a fist every `frames_per_phase` frames.
    Wave {
        handedness: Handedness,
        frames_per_phase: u32,
    },
}

/// A stretch of the script lasting `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptSegment {
    motion: Motion,
    duration: Duration,
}

impl ScriptSegment {
    /// Hold a right hand in the given finger pattern.
    pub fn pose(bits: [u8; 5], duration: Duration) -> Self {
        Self::pose_with(bits, Handedness::Right, RELAXED_GAP, duration)
    }

    /// Hold a hand with explicit handedness and middle/ring spread.
    pub fn pose_with(bits: [u8; 5], handedness: Handedness, gap: f32, duration: Duration) -> Self {
        let hand = synthesize_hand_with_gap(FingerState::from_bits(bits), handedness, gap);
        Self::hands(vec![hand], duration)
    }

    /// Hold an arbitrary set of hands.
    pub fn hands(hands: Vec<Hand>, duration: Duration) -> Self {
        Self {
            motion: Motion::Hold(hands),
            duration,
        }
    }

    /// Frames with no hand in view.
    pub fn empty(duration: Duration) -> Self {
        Self::hands(Vec::new(), duration)
    }

    /// Wave a right hand, switching between open and closed every `frames_per_phase` frames.
    pub fn wave(frames_per_phase: u32, duration: Duration) -> Self {
        Self {
            motion: Motion::Wave {
                handedness: Handedness::Right,
                frames_per_phase: frames_per_phase.max(1),
            },
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn hands_at(&self, frame: u64) -> Vec<Hand> {
        match &self.motion {
            Motion::Hold(hands) => hands.clone(),
            Motion::Wave {
                handedness,
                frames_per_phase,
            } => {
                let bits = if (frame / u64::from(*frames_per_phase)) % 2 == 0 {
                    OPEN
                } else {
                    FIST
                };
                vec![synthesize_hand_with_gap(
                    FingerState::from_bits(bits),
                    *handedness,
                    RELAXED_GAP,
                )]
            }
        }
    }
}

/// Plays script segments at a fixed frame rate.
#[derive(Debug, Clone)]
pub struct ScriptedLandmarkProvider {
    segments: VecDeque<ScriptSegment>,
    fps: f64,
    /// Frame index within the current segment.
    segment_frame: u64,
    /// Frame index since the start of the stream.
    stream_frame: u64,
}

impl ScriptedLandmarkProvider {
    /// Returns a capture error when `fps` is not a positive finite number.
    pub fn new(segments: Vec<ScriptSegment>, fps: f64) -> Result<Self, GestalkError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(GestalkError::Capture(format!(
                "scripted frame rate must be positive, got {fps}"
            )));
        }
        Ok(Self {
            segments: segments.into(),
            fps,
            segment_frame: 0,
            stream_frame: 0,
        })
    }

    /// The built-in demo: Hello, OK, Yes, Thanks, No and a wave (Bye),
    /// each separated by a short pause with no hands.
    pub fn demo(fps: f64) -> Result<Self, GestalkError> {
        Self::new(demo_script(), fps)
    }

    fn frames_in(&self, segment: &ScriptSegment) -> u64 {
        (segment.duration.as_secs_f64() * self.fps).round() as u64
    }

    pub fn remaining_segments(&self) -> usize {
        self.segments.len()
    }
}

impl LandmarkProvider for ScriptedLandmarkProvider {
    async fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, GestalkError> {
        loop {
            let Some(segment) = self.segments.front() else {
                return Ok(None);
            };
            if self.segment_frame >= self.frames_in(segment) {
                self.segments.pop_front();
                self.segment_frame = 0;
                continue;
            }

            let hands = segment.hands_at(self.segment_frame);
            let timestamp = Duration::from_secs_f64(self.stream_frame as f64 / self.fps);
            self.segment_frame += 1;
            self.stream_frame += 1;
            return Ok(Some(LandmarkFrame::at(timestamp, hands)));
        }
    }
}

/// The script played by `--demo`.
pub fn demo_script() -> Vec<ScriptSegment> {
    let hold = Duration::from_millis(2500);
    let pause = Duration::from_millis(500);
    vec![
        ScriptSegment::empty(pause),
        ScriptSegment::pose([0, 1, 1, 1, 1], hold),
        ScriptSegment::empty(pause),
        ScriptSegment::pose_with(OPEN, Handedness::Right, 0.09, hold),
        ScriptSegment::empty(pause),
        ScriptSegment::pose([1, 0, 0, 0, 0], hold),
        ScriptSegment::empty(pause),
        ScriptSegment::pose_with([1, 0, 0, 0, 1], Handedness::Left, RELAXED_GAP, hold),
        ScriptSegment::empty(pause),
        ScriptSegment::pose([0, 1, 0, 0, 0], hold),
        ScriptSegment::empty(pause),
        // Last: the motion history outlives the wave and would keep reporting Bye.
        ScriptSegment::wave(3, Duration::from_millis(3500)),
        ScriptSegment::empty(pause),
    ]
}

/// Mock provider returning queued frames, optionally ending with a failure.
#[derive(Debug, Default)]
pub struct MockLandmarkProvider {
    frames: VecDeque<LandmarkFrame>,
    failure: Option<String>,
}

impl MockLandmarkProvider {
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        Self {
            frames: frames.into(),
            failure: None,
        }
    }

    /// Fail with a capture error once the queued frames run out.
    pub fn fail_at_end(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }
}

impl LandmarkProvider for MockLandmarkProvider {
    async fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, GestalkError> {
        if let Some(frame) = self.frames.pop_front() {
            return Ok(Some(frame));
        }
        match self.failure.take() {
            Some(message) => Err(GestalkError::Capture(message)),
            None => Ok(None),
        }
    }
}
