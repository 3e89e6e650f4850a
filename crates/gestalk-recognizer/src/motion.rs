//! Wave detection over a short history of open/closed hand states.

use std::collections::VecDeque;

use gestalk_core::types::{FingerState, Gesture};

/// Coarse hand openness recorded once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionLabel {
    Open,
    Closed,
}

impl MotionLabel {
    /// Open when at least four fingers are up, closed when at least four are
    /// down, and `None` for the in-between poses so they never enter the buffer.
    pub fn from_fingers(fingers: FingerState) -> Option<Self> {
        if fingers.extended_count() >= 4 {
            Some(MotionLabel::Open)
        } else if fingers.folded_count() >= 4 {
            Some(MotionLabel::Closed)
        } else {
            None
        }
    }
}

/// Fixed-capacity history of [`MotionLabel`]s; the oldest entry is evicted first.
///
/// A wave ("Bye") is reported when both labels occur at least `min_each`
/// times in the window. The order of the samples is deliberately not
/// inspected, so a hand that stays open for a while and then stays closed
/// also counts.
#[derive(Debug, Clone)]
pub struct MotionBuffer {
    samples: VecDeque<MotionLabel>,
    capacity: usize,
    min_each: usize,
}

impl MotionBuffer {
    pub fn new(capacity: usize, min_each: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
            min_each,
        }
    }

    /// Record this frame's finger state. Ambiguous poses are skipped.
    pub fn record(&mut self, fingers: FingerState) {
        if let Some(label) = MotionLabel::from_fingers(fingers) {
            self.push(label);
        }
    }

    pub fn push(&mut self, label: MotionLabel) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(label);
    }

    pub fn detect(&self) -> Option<Gesture> {
        let opens = self.count(MotionLabel::Open);
        let closes = self.count(MotionLabel::Closed);
        (opens >= self.min_each && closes >= self.min_each).then_some(Gesture::Bye)
    }

    pub fn count(&self, label: MotionLabel) -> usize {
        self.samples.iter().filter(|s| **s == label).count()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
