//! Keyboard controls: `q` quits, `c` clears the sentence.
//!
//! Commands arrive on an unbounded channel and are drained by the frame loop
//! once per frame, so the loop never blocks on input.

use std::io::BufRead;

use tokio::sync::mpsc::{self, error::TryRecvError};

/// A user command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Quit,
    Clear,
}

impl ControlEvent {
    /// Map a key to its command. Unbound keys map to `None`.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'q' => Some(ControlEvent::Quit),
            'c' => Some(ControlEvent::Clear),
            _ => None,
        }
    }
}

/// Commands in the order they were typed on one input line.
pub fn parse_line(line: &str) -> Vec<ControlEvent> {
    line.chars().filter_map(ControlEvent::from_key).collect()
}

/// Sending half, handed to input sources.
#[derive(Debug, Clone)]
pub struct ControlSender {
    tx: mpsc::UnboundedSender<ControlEvent>,
}

impl ControlSender {
    /// Returns `false` once the frame loop has gone away.
    pub fn send(&self, event: ControlEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Receiving half, owned by the frame loop.
#[derive(Debug)]
pub struct Controls {
    rx: mpsc::UnboundedReceiver<ControlEvent>,
}

impl Controls {
    pub fn channel() -> (ControlSender, Controls) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ControlSender { tx }, Controls { rx })
    }

    /// Read commands from stdin on a background thread.
    ///
    /// The terminal is line-buffered: type `q` or `c` and press Enter.
    pub fn stdin() -> (ControlSender, Controls) {
        let (sender, controls) = Self::channel();
        let input = sender.clone();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                for event in parse_line(&line) {
                    if !input.send(event) {
                        return;
                    }
                }
            }
            tracing::debug!("Control input closed");
        });
        (sender, controls)
    }

    /// Every command received since the last call, oldest first.
    pub fn drain(&mut self) -> Vec<ControlEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}
