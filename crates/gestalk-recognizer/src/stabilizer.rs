//! Dwell-time stabilizer.
//!
//! A candidate gesture is confirmed only after it has been observed on every
//! frame for at least the dwell time. Any frame without a candidate restarts
//! the clock for every gesture. Confirmation itself is reported once; the
//! caller clears the stabilizer afterwards so the next gesture starts fresh.

use std::time::Duration;

use gestalk_core::types::Gesture;

/// Per-gesture dwell timers.
///
/// Each slot holds the stream time at which continuous observation of that
/// gesture began, or `None` when the gesture is not being tracked.
#[derive(Debug, Clone)]
pub struct Stabilizer {
    dwell: Duration,
    started: [Option<Duration>; Gesture::COUNT],
}

impl Stabilizer {
    pub fn new(dwell: Duration) -> Self {
        Self {
            dwell,
            started: [None; Gesture::COUNT],
        }
    }

    /// Feed one hand's candidate for the frame at stream time `now`.
    ///
    /// Returns the gesture when its dwell requirement is met on this frame.
    pub fn observe(&mut self, candidate: Option<Gesture>, now: Duration) -> Option<Gesture> {
        let Some(gesture) = candidate else {
            self.reset();
            return None;
        };

        match self.started[gesture.index()] {
            None => {
                tracing::debug!(gesture = %gesture, "Candidate timer started");
                self.started[gesture.index()] = Some(now);
                None
            }
            Some(start) if now.saturating_sub(start) >= self.dwell => Some(gesture),
            Some(_) => None,
        }
    }

    /// Stop tracking every gesture.
    pub fn reset(&mut self) {
        if self.started.iter().any(Option::is_some) {
            tracing::trace!("Candidate timers reset");
        }
        self.started = [None; Gesture::COUNT];
    }

    /// When `gesture` started being tracked, if it is.
    pub fn started_at(&self, gesture: Gesture) -> Option<Duration> {
        self.started[gesture.index()]
    }

    pub fn is_tracking(&self) -> bool {
        self.started.iter().any(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_first_observation_only_starts_timer() {
        let mut st = Stabilizer::new(ms(2000));
        assert_eq!(st.observe(Some(Gesture::Hello), ms(0)), None);
        assert_eq!(st.started_at(Gesture::Hello), Some(ms(0)));
        assert!(st.is_tracking());
    }

    #[test]
    fn test_zero_timestamp_is_a_real_start() {
        let mut st = Stabilizer::new(ms(2000));
        st.observe(Some(Gesture::No), Duration::ZERO);
        // A second observation must not restart the timer at zero.
        st.observe(Some(Gesture::No), ms(1000));
        assert_eq!(st.started_at(Gesture::No), Some(Duration::ZERO));
        assert_eq!(st.observe(Some(Gesture::No), ms(2000)), Some(Gesture::No));
    }

    #[test]
    fn test_confirms_at_dwell_boundary() {
        let mut st = Stabilizer::new(ms(2000));
        st.observe(Some(Gesture::Wait), ms(10000));
        assert_eq!(st.observe(Some(Gesture::Wait), ms(11999)), None);
        assert_eq!(st.observe(Some(Gesture::Wait), ms(12000)), Some(Gesture::Wait));
    }

    #[test]
    fn test_empty_candidate_resets_all_timers() {
        let mut st = Stabilizer::new(ms(2000));
        st.observe(Some(Gesture::Hello), ms(0));
        st.observe(Some(Gesture::Yes), ms(500));
        assert!(st.started_at(Gesture::Yes).is_some());

        assert_eq!(st.observe(None, ms(1900)), None);
        assert!(!st.is_tracking());

        // Resumed candidate restarts from zero.
        assert_eq!(st.observe(Some(Gesture::Hello), ms(2000)), None);
        assert_eq!(st.observe(Some(Gesture::Hello), ms(3900)), None);
        assert_eq!(st.observe(Some(Gesture::Hello), ms(4000)), Some(Gesture::Hello));
    }

    #[test]
    fn test_other_candidate_does_not_reset_timer() {
        let mut st = Stabilizer::new(ms(2000));
        st.observe(Some(Gesture::Hello), ms(0));
        st.observe(Some(Gesture::No), ms(1000));
        assert_eq!(st.observe(Some(Gesture::Hello), ms(2000)), Some(Gesture::Hello));
    }

    #[test]
    fn test_reset_after_confirmation_restarts_dwell() {
        let mut st = Stabilizer::new(ms(2000));
        st.observe(Some(Gesture::Thanks), ms(0));
        assert_eq!(st.observe(Some(Gesture::Thanks), ms(2000)), Some(Gesture::Thanks));
        st.reset();
        assert_eq!(st.observe(Some(Gesture::Thanks), ms(2100)), None);
        assert_eq!(st.observe(Some(Gesture::Thanks), ms(4000)), None);
        assert_eq!(st.observe(Some(Gesture::Thanks), ms(4100)), Some(Gesture::Thanks));
    }

    #[test]
    fn test_clock_going_backwards_never_confirms() {
        let mut st = Stabilizer::new(ms(2000));
        st.observe(Some(Gesture::Ok), ms(5000));
        assert_eq!(st.observe(Some(Gesture::Ok), ms(1000)), None);
    }
}
