//! Static pose classification.
//!
//! A priority-ordered decision table over the finger-state vector. Two rows
//! also look at raw geometry: a lone thumb only means "Yes" when it points
//! up, and an open hand only means "OK" when the middle and ring fingertips
//! are split apart (the Vulcan salute). A plain open palm matches nothing.

use gestalk_core::types::{
    FingerState, Gesture, Hand, MIDDLE_TIP, RING_TIP, THUMB_IP, THUMB_TIP,
};

/// Classify a single hand pose. Returns `None` when no row matches.
pub fn classify_static(fingers: FingerState, hand: &Hand, split_gap: f32) -> Option<Gesture> {
    const UP: bool = true;
    const DOWN: bool = false;

    match fingers.0 {
        [DOWN, UP, UP, UP, UP] => Some(Gesture::Hello),
        [UP, DOWN, DOWN, DOWN, DOWN] if thumb_points_up(hand) => Some(Gesture::Yes),
        [DOWN, UP, DOWN, DOWN, DOWN] => Some(Gesture::No),
        [UP, DOWN, DOWN, DOWN, UP] => Some(Gesture::Thanks),
        [DOWN, DOWN, DOWN, DOWN, DOWN] => Some(Gesture::Wait),
        [UP, UP, UP, UP, UP] if middle_ring_gap(hand) > split_gap => Some(Gesture::Ok),
        _ => None,
    }
}

fn thumb_points_up(hand: &Hand) -> bool {
    hand.landmark(THUMB_TIP).y < hand.landmark(THUMB_IP).y
}

fn middle_ring_gap(hand: &Hand) -> f32 {
    (hand.landmark(MIDDLE_TIP).x - hand.landmark(RING_TIP).x).abs()
}
