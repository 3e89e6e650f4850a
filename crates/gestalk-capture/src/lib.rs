//! Gestalk Capture crate - landmark sources and capture session management.
//!
//! Provides the `LandmarkProvider` trait that the frame loop pulls from, a
//! scripted provider built from synthetic poses (demo mode and tests), a
//! JSON-lines replay provider for recorded detector output, wrappers that
//! apply the detector limits (hand count and confidence) and real-time
//! pacing, and a `CaptureSession` tracking the lifecycle of a stream.

pub mod replay;
pub mod scripted;

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use gestalk_core::config::CaptureConfig;
use gestalk_core::error::GestalkError;
use gestalk_core::types::{CaptureStatus, LandmarkFrame};

pub use replay::ReplayLandmarkProvider;
pub use scripted::{MockLandmarkProvider, ScriptSegment, ScriptedLandmarkProvider};

/// Source of per-frame hand landmarks.
///
/// `Ok(None)` marks the end of the stream. An error is a capture failure:
/// the frame loop stops rather than skipping the frame.
pub trait LandmarkProvider: Send {
    fn next_frame(
        &mut self,
    ) -> impl Future<Output = Result<Option<LandmarkFrame>, GestalkError>> + Send;
}

/// Applies the detector limits to another provider's frames.
///
/// Hands scored below `min_detection_confidence` are dropped first, then at
/// most `max_hands` are kept in detector order.
#[derive(Debug)]
pub struct LimitedProvider<P> {
    inner: P,
    max_hands: usize,
    min_confidence: f32,
}

impl<P: LandmarkProvider> LimitedProvider<P> {
    pub fn new(inner: P, config: &CaptureConfig) -> Self {
        Self {
            inner,
            max_hands: config.max_hands,
            min_confidence: config.min_detection_confidence,
        }
    }
}

impl<P: LandmarkProvider> LandmarkProvider for LimitedProvider<P> {
    async fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, GestalkError> {
        let Some(mut frame) = self.inner.next_frame().await? else {
            return Ok(None);
        };

        let detected = frame.hands.len();
        frame.hands.retain(|hand| hand.score >= self.min_confidence);
        frame.hands.truncate(self.max_hands);
        if frame.hands.len() != detected {
            tracing::trace!(
                detected,
                kept = frame.hands.len(),
                "Hands dropped by detector limits"
            );
        }
        Ok(Some(frame))
    }
}

/// Releases frames no faster than their recorded timestamps.
///
/// The first timestamped frame anchors stream time to the wall clock; later
/// frames wait until their offset from it has elapsed. Frames without a
/// timestamp pass straight through. With pacing disabled the wrapper is a
/// no-op, so sources can be replayed as fast as they decode.
#[derive(Debug)]
pub struct PacedProvider<P> {
    inner: P,
    enabled: bool,
    anchor: Option<(Instant, Duration)>,
}

impl<P: LandmarkProvider> PacedProvider<P> {
    pub fn new(inner: P, enabled: bool) -> Self {
        Self {
            inner,
            enabled,
            anchor: None,
        }
    }
}

impl<P: LandmarkProvider> LandmarkProvider for PacedProvider<P> {
    async fn next_frame(&mut self) -> Result<Option<LandmarkFrame>, GestalkError> {
        let frame = self.inner.next_frame().await?;
        if let (true, Some(timestamp)) = (self.enabled, frame.as_ref().and_then(|f| f.timestamp())) {
            let (start, origin) = *self
                .anchor
                .get_or_insert_with(|| (Instant::now(), timestamp));
            tokio::time::sleep_until(start + timestamp.saturating_sub(origin)).await;
        }
        Ok(frame)
    }
}

/// Manages the lifecycle of a capture stream.
///
/// The session does not own the frame loop; the caller records each frame
/// and stops the session when the source ends or fails.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    id: Uuid,
    status: CaptureStatus,
    frames_captured: u64,
}

impl CaptureSession {
    /// Create a new capture session in the Active state.
    pub fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: CaptureStatus::Active,
            frames_captured: 0,
        }
    }

    pub fn stop(&mut self) {
        self.status = CaptureStatus::Stopped;
    }

    pub fn record_frame(&mut self) {
        self.frames_captured += 1;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> &CaptureStatus {
        &self.status
    }

    pub fn frames_captured(&self) -> u64 {
        self.frames_captured
    }

    pub fn is_active(&self) -> bool {
        self.status == CaptureStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestalk_core::pose::synthesize_hand;
    use gestalk_core::types::{FingerState, Hand, Handedness};

    fn scored(score: f32, handedness: Handedness) -> Hand {
        let mut hand = synthesize_hand(FingerState::from_bits([0, 1, 1, 1, 1]), handedness);
        hand.score = score;
        hand
    }

    #[tokio::test]
    async fn test_limits_drop_low_confidence_hands() {
        let frame = LandmarkFrame::new(vec![
            scored(0.5, Handedness::Left),
            scored(0.9, Handedness::Right),
        ]);
        let mock = MockLandmarkProvider::new(vec![frame]);
        let mut provider = LimitedProvider::new(mock, &CaptureConfig::default());

        let frame = provider.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].handedness, Handedness::Right);
        assert!(provider.next_frame().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_limits_cap_hand_count_in_detector_order() {
        let frame = LandmarkFrame::new(vec![
            scored(0.95, Handedness::Right),
            scored(0.95, Handedness::Left),
            scored(0.95, Handedness::Right),
        ]);
        let config = CaptureConfig {
            max_hands: 2,
            ..CaptureConfig::default()
        };
        let mut provider = LimitedProvider::new(MockLandmarkProvider::new(vec![frame]), &config);

        let frame = provider.next_frame().await.unwrap().unwrap();
        assert_eq!(frame.hands.len(), 2);
        assert_eq!(frame.hands[1].handedness, Handedness::Left);
    }

    #[tokio::test]
    async fn test_limits_pass_errors_through() {
        let mock = MockLandmarkProvider::new(Vec::new()).fail_at_end("camera unplugged");
        let mut provider = LimitedProvider::new(mock, &CaptureConfig::default());
        let err = provider.next_frame().await.unwrap_err();
        assert!(matches!(err, GestalkError::Capture(_)));
    }

    fn timed(secs: u64) -> LandmarkFrame {
        LandmarkFrame::at(Duration::from_secs(secs), Vec::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_provider_follows_timestamps() {
        let mock = MockLandmarkProvider::new(vec![timed(10), timed(12), timed(15)]);
        let mut provider = PacedProvider::new(mock, true);

        let started = Instant::now();
        provider.next_frame().await.unwrap().unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
        provider.next_frame().await.unwrap().unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
        provider.next_frame().await.unwrap().unwrap();
        assert!(started.elapsed() >= Duration::from_secs(5));
        assert!(provider.next_frame().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_pacing_does_not_wait() {
        let mock = MockLandmarkProvider::new(vec![timed(0), timed(60)]);
        let mut provider = PacedProvider::new(mock, false);

        let started = Instant::now();
        provider.next_frame().await.unwrap().unwrap();
        provider.next_frame().await.unwrap().unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_capture_session_lifecycle() {
        let mut session = CaptureSession::start();
        assert!(session.is_active());
        assert_eq!(*session.status(), CaptureStatus::Active);

        session.record_frame();
        session.record_frame();
        assert_eq!(session.frames_captured(), 2);

        session.stop();
        assert!(!session.is_active());
        assert_eq!(*session.status(), CaptureStatus::Stopped);
    }

    #[test]
    fn test_capture_session_unique_id() {
        assert_ne!(CaptureSession::start().id(), CaptureSession::start().id());
    }
}
