//! Synthetic hand poses.
//!
//! Builds plausible 21-point hands from a finger-state vector so that the
//! recognizer can be driven without a camera (demo script, replay fixtures,
//! tests). The geometry is only as detailed as the recognizer needs: every
//! fingertip sits clearly above or below its PIP joint, and the thumb tip sits
//! clearly to one side of its IP joint.

use crate::types::{
    FingerState, Hand, Handedness, Landmark, FINGER_JOINTS, LANDMARK_COUNT, THUMB_IP, THUMB_TIP,
    WRIST,
};

/// Middle/ring fingertip spacing of a relaxed open palm.
pub const RELAXED_GAP: f32 = 0.03;

const PALM_Y: f32 = 0.55;
const JOINT_Y: f32 = 0.50;
const TIP_UP_Y: f32 = 0.35;
const TIP_DOWN_Y: f32 = 0.60;
const THUMB_IP_X: f32 = 0.40;

/// Hand with the given finger pattern and a relaxed middle/ring spacing.
pub fn synthesize_hand(fingers: FingerState, handedness: Handedness) -> Hand {
    synthesize_hand_with_gap(fingers, handedness, RELAXED_GAP)
}

/// Hand with the given finger pattern and middle/ring fingertip gap.
///
/// An extended thumb points upward (tip above the IP joint).
pub fn synthesize_hand_with_gap(fingers: FingerState, handedness: Handedness, gap: f32) -> Hand {
    let mut landmarks = [Landmark::new(0.5, PALM_Y); LANDMARK_COUNT];
    landmarks[WRIST] = Landmark::new(0.5, 0.8);

    // Thumb: lateral test, polarity flips with handedness.
    let outward = match handedness {
        Handedness::Right => 1.0,
        Handedness::Left => -1.0,
    };
    let ip_x = match handedness {
        Handedness::Right => THUMB_IP_X,
        Handedness::Left => 1.0 - THUMB_IP_X,
    };
    landmarks[THUMB_IP] = Landmark::new(ip_x, PALM_Y);
    landmarks[THUMB_TIP] = if fingers.thumb() {
        Landmark::new(ip_x + 0.08 * outward, PALM_Y - 0.06)
    } else {
        Landmark::new(ip_x - 0.04 * outward, PALM_Y + 0.02)
    };

    let middle_x = 0.48;
    let tip_xs = [0.42, middle_x, middle_x + gap, middle_x + gap + 0.06];

    for (finger, (&(tip, pip), &x)) in FINGER_JOINTS.iter().zip(tip_xs.iter()).enumerate() {
        let extended = fingers.0[finger + 1];
        landmarks[pip - 1] = Landmark::new(x, PALM_Y);
        landmarks[pip] = Landmark::new(x, JOINT_Y);
        let tip_y = if extended { TIP_UP_Y } else { TIP_DOWN_Y };
        landmarks[tip - 1] = Landmark::new(x, (JOINT_Y + tip_y) / 2.0);
        landmarks[tip] = Landmark::new(x, tip_y);
    }

    Hand::new(handedness, landmarks)
}
