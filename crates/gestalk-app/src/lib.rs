//! Gestalk application library - the pieces the `gestalk` binary wires together.
//!
//! - [`cli`]: command-line arguments and their resolution against the config file
//! - [`controls`]: quit/clear commands from the keyboard
//! - [`overlay`]: rendering of confirmed words and the running sentence
//! - [`runner`]: the frame loop connecting capture, recognition, speech and overlay

pub mod cli;
pub mod controls;
pub mod overlay;
pub mod runner;

pub use controls::{ControlEvent, ControlSender, Controls};
pub use overlay::{MockOverlay, Overlay, OverlayView, TerminalOverlay};
pub use runner::{FrameLoop, RunSummary, StopReason};
