use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// =============================================================================
// Landmarks
// =============================================================================

/// Number of landmarks the detector reports for every hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// `(tip, PIP joint)` of the four non-thumb fingers, in finger order.
pub const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// One tracked point on a hand in normalized image coordinates.
///
/// `x` and `y` lie in `[0, 1]` relative to the frame; `y` grows downward.
/// `z` is carried through from the detector but never read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Which hand the detector believes it is looking at.
///
/// Subject to the mirroring convention of the capture pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => write!(f, "Left"),
            Handedness::Right => write!(f, "Right"),
        }
    }
}

fn default_score() -> f32 {
    1.0
}

/// A single detected hand: handedness, detection score and 21 landmarks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub handedness: Handedness,
    /// Detector confidence in `[0, 1]`.
    #[serde(default = "default_score")]
    pub score: f32,
    pub landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(handedness: Handedness, landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self {
            handedness,
            score: 1.0,
            landmarks,
        }
    }

    /// Returns the landmark at `index` (see the index constants in this module).
    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }
}

/// Detector output for one video frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Seconds since the start of the stream, when the source records it.
    #[serde(rename = "t", default, skip_serializing_if = "Option::is_none")]
    pub timestamp_secs: Option<f64>,
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl LandmarkFrame {
    pub fn new(hands: Vec<Hand>) -> Self {
        Self {
            timestamp_secs: None,
            hands,
        }
    }

    pub fn at(timestamp: Duration, hands: Vec<Hand>) -> Self {
        Self {
            timestamp_secs: Some(timestamp.as_secs_f64()),
            hands,
        }
    }

    /// Recorded stream time, if present and representable as a `Duration`.
    ///
    /// Negative, non-finite and out-of-range values all read as `None`.
    pub fn timestamp(&self) -> Option<Duration> {
        self.timestamp_secs
            .and_then(|t| Duration::try_from_secs_f64(t).ok())
    }
}

// =============================================================================
// Finger state
// =============================================================================

/// Extended/folded state of the five fingers: thumb, index, middle, ring, pinky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    /// Build from a `0`/`1` vector, e.g. `[0, 1, 1, 1, 1]`.
    pub fn from_bits(bits: [u8; 5]) -> Self {
        Self(bits.map(|b| b != 0))
    }

    pub fn bits(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }

    pub fn thumb(&self) -> bool {
        self.0[0]
    }

    pub fn extended_count(&self) -> usize {
        self.0.iter().filter(|up| **up).count()
    }

    pub fn folded_count(&self) -> usize {
        self.0.len() - self.extended_count()
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e] = self.bits();
        write!(f, "[{},{},{},{},{}]", a, b, c, d, e)
    }
}

// =============================================================================
// Gestures
// =============================================================================

/// The fixed gesture vocabulary. "No gesture" is `Option::<Gesture>::None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gesture {
    Hello,
    Bye,
    Yes,
    No,
    Thanks,
    Wait,
    #[serde(rename = "OK")]
    Ok,
}

impl Gesture {
    pub const COUNT: usize = 7;

    pub const ALL: [Gesture; Gesture::COUNT] = [
        Gesture::Hello,
        Gesture::Bye,
        Gesture::Yes,
        Gesture::No,
        Gesture::Thanks,
        Gesture::Wait,
        Gesture::Ok,
    ];

    /// Dense index in `0..COUNT`, for per-gesture tables.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The spoken and displayed word.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Hello => "Hello",
            Gesture::Bye => "Bye",
            Gesture::Yes => "Yes",
            Gesture::No => "No",
            Gesture::Thanks => "Thanks",
            Gesture::Wait => "Wait",
            Gesture::Ok => "OK",
        }
    }

    /// Glyph drawn next to the word on the overlay.
    pub fn emoji(&self) -> &'static str {
        match self {
            Gesture::Hello => "\u{1F44B}",
            Gesture::Bye => "\u{1F590}\u{FE0F}",
            Gesture::Yes => "\u{1F44D}",
            Gesture::No => "\u{261D}\u{1F3FB}",
            Gesture::Thanks => "\u{1F919}\u{1F3FB}",
            Gesture::Wait => "\u{23F3}",
            Gesture::Ok => "\u{1F596}\u{1F3FB}",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gesture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gesture::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown gesture word: {}", s))
    }
}

/// Emoji lookup by word. Words outside the vocabulary have no glyph.
pub fn emoji_for(word: &str) -> Option<&'static str> {
    word.parse::<Gesture>().ok().map(|g| g.emoji())
}

// =============================================================================
// Capture status
// =============================================================================

/// Capture session operational status.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStatus {
    /// Frames are being read.
    Active,
    /// The source is exhausted or failed; no more frames.
    Stopped,
}
