//! Overlay: what the user sees for each processed frame.

use std::io::Write;
use std::sync::{Arc, Mutex};

use gestalk_core::config::DisplayConfig;
use gestalk_core::error::{GestalkError, Result};
use gestalk_core::types::Gesture;

/// State to show after one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayView<'a> {
    /// Word confirmed on this frame, spoken or not.
    pub confirmed: Option<Gesture>,
    /// Word that passed the repeat filter on this frame.
    pub dispatched: Option<Gesture>,
    pub sentence: &'a str,
}

pub trait Overlay: Send {
    fn render(&mut self, view: &OverlayView<'_>) -> Result<()>;
}

/// Line-oriented overlay for a terminal.
///
/// Prints `Detected: <word>` for every dispatched word, the emoji and label
/// of every confirmed word, and a `Sentence: ...` banner whenever the
/// sentence changes.
pub struct TerminalOverlay<W> {
    out: W,
    config: DisplayConfig,
    last_sentence: String,
}

impl TerminalOverlay<std::io::Stdout> {
    pub fn stdout(config: DisplayConfig) -> Self {
        Self::new(std::io::stdout(), config)
    }
}

impl<W: Write + Send> TerminalOverlay<W> {
    pub fn new(out: W, config: DisplayConfig) -> Self {
        Self {
            out,
            config,
            last_sentence: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Overlay for TerminalOverlay<W> {
    fn render(&mut self, view: &OverlayView<'_>) -> Result<()> {
        if let Some(word) = view.dispatched {
            writeln!(self.out, "Detected: {word}")?;
        }
        if let (true, Some(word)) = (self.config.show_emoji, view.confirmed) {
            writeln!(self.out, "{} {word}", word.emoji())?;
        }
        if self.config.show_sentence && view.sentence != self.last_sentence {
            writeln!(self.out, "Sentence: {}", view.sentence)?;
        }
        if view.sentence != self.last_sentence {
            self.last_sentence.clear();
            self.last_sentence.push_str(view.sentence);
        }
        self.out.flush()?;
        Ok(())
    }
}

/// One rendered frame as seen by [`MockOverlay`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub confirmed: Option<Gesture>,
    pub dispatched: Option<Gesture>,
    pub sentence: String,
}

/// Mock overlay for testing. Clones share the record of rendered frames.
#[derive(Debug, Clone, Default)]
pub struct MockOverlay {
    frames: Arc<Mutex<Vec<RenderedFrame>>>,
}

impl MockOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<RenderedFrame> {
        match self.frames.lock() {
            Ok(frames) => frames.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Overlay for MockOverlay {
    fn render(&mut self, view: &OverlayView<'_>) -> Result<()> {
        self.frames
            .lock()
            .map_err(|e| GestalkError::Io(std::io::Error::other(format!("Lock poisoned: {e}"))))?
            .push(RenderedFrame {
                confirmed: view.confirmed,
                dispatched: view.dispatched,
                sentence: view.sentence.to_string(),
            });
        Ok(())
    }
}
