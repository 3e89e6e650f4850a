//! JSON-lines replay of recorded detector output.
//!
//! One frame per line:
//!
//! ```text
//! {"t": 0.033, "hands": [{"handedness": "Right", "score": 0.93, "landmarks": [{"x": 0.5, "y": 0.8}, ...]}]}
//! ```
//!
//! `t` is optional, but when present it must be a non-negative number of
//! seconds that fits a `Duration`. Blank lines are skipped; any other line
//! that fails to parse is reported as a capture failure, which ends the
//! session. Wrap the
//! provider in [`crate::PacedProvider`] to play a recording in real time.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

use gestalk_core::error::GestalkError;
use gestalk_core::types::LandmarkFrame;

use crate::LandmarkProvider;

/// Reads frames from a JSON-lines recording.
pub struct ReplayLandmarkProvider<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl ReplayLandmarkProvider<BufReader<File>> {
    /// Open a recording on disk.
    pub async fn open(path: &Path) -> Result<Self, GestalkError> {
        let file = File::open(path).await.map_err(|e| {
            GestalkError::Capture(format!("cannot open replay {}: {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), "Replay opened");
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin + Send> ReplayLandmarkProvider<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Lines consumed so far, blank ones included.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: AsyncBufRead + Unpin + Send> LandmarkProvider for ReplayLandmarkProvider<R> {
    async fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, GestalkError> {
        loop {
            let line = self.lines.next_line().await.map_err(|e| {
                GestalkError::Capture(format!("replay read failed after line {}: {e}", self.line_no))
            })?;
            let Some(line) = line else {
                tracing::debug!(lines = self.line_no, "Replay exhausted");
                return Ok(None);
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let frame = serde_json::from_str::<LandmarkFrame>(trimmed).map_err(|e| {
                GestalkError::Capture(format!("malformed replay line {}: {e}", self.line_no))
            })?;
            if let (Some(t), None) = (frame.timestamp_secs, frame.timestamp()) {
                return Err(GestalkError::Capture(format!(
                    "replay line {}: timestamp {t} out of range",
                    self.line_no
                )));
            }
            return Ok(Some(frame));
        }
    }
}
