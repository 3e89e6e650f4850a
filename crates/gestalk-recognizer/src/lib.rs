//! Gestalk Recognizer crate - turns per-frame hand landmarks into confirmed gesture words.
//!
//! The pipeline for each detected hand is:
//! finger extraction -> static pose classification + motion (wave) detection
//! -> dwell-time stabilization. Confirmed words then pass a session-level
//! repeat filter before they reach the transcript and the speech queue.

pub mod classifier;
pub mod finger;
pub mod motion;
pub mod session;
pub mod stabilizer;

pub use classifier::classify_static;
pub use finger::extract_fingers;
pub use motion::{MotionBuffer, MotionLabel};
pub use session::{DispatchGate, FrameOutcome, Interpreter, Transcript, TranscriptEntry};
pub use stabilizer::Stabilizer;
