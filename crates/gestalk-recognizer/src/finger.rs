//! Finger-state extraction.

use gestalk_core::types::{FingerState, Hand, Handedness, FINGER_JOINTS, THUMB_IP, THUMB_TIP};

/// Derive the extended/folded vector for one hand.
///
/// The thumb is tested sideways against its IP joint, with the direction
/// flipped for left hands because the capture view is mirrored. The other
/// four fingers are tested vertically: a finger is up when its tip is higher
/// on screen (smaller `y`) than its PIP joint.
pub fn extract_fingers(hand: &Hand) -> FingerState {
    let thumb_tip = hand.landmark(THUMB_TIP);
    let thumb_ip = hand.landmark(THUMB_IP);
    let thumb = match hand.handedness {
        Handedness::Right => thumb_tip.x > thumb_ip.x,
        Handedness::Left => thumb_tip.x < thumb_ip.x,
    };

    let mut state = [thumb, false, false, false, false];
    for (slot, &(tip, pip)) in state[1..].iter_mut().zip(FINGER_JOINTS.iter()) {
        *slot = hand.landmark(tip).y < hand.landmark(pip).y;
    }
    FingerState(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestalk_core::pose::synthesize_hand;
    use gestalk_core::types::{
        Landmark, INDEX_PIP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP,
        PINKY_TIP, RING_PIP, RING_TIP,
    };

    fn flat_hand(handedness: Handedness) -> Hand {
        Hand::new(handedness, [Landmark::new(0.5, 0.5); LANDMARK_COUNT])
    }

    #[test]
    fn test_synthesized_patterns_round_trip() {
        for bits in [
            [0, 1, 1, 1, 1],
            [1, 0, 0, 0, 0],
            [0, 1, 0, 0, 0],
            [1, 0, 0, 0, 1],
            [0, 0, 0, 0, 0],
            [1, 1, 1, 1, 1],
            [1, 1, 0, 1, 0],
        ] {
            for handedness in [Handedness::Left, Handedness::Right] {
                let hand = synthesize_hand(FingerState::from_bits(bits), handedness);
                assert_eq!(extract_fingers(&hand).bits(), bits, "{:?} {:?}", bits, handedness);
            }
        }
    }

    #[test]
    fn test_thumb_polarity_inverts_with_handedness() {
        let mut right = flat_hand(Handedness::Right);
        right.landmarks[THUMB_IP] = Landmark::new(0.40, 0.5);
        right.landmarks[THUMB_TIP] = Landmark::new(0.45, 0.5);

        let mut left = right.clone();
        left.handedness = Handedness::Left;

        assert!(extract_fingers(&right).thumb());
        assert!(!extract_fingers(&left).thumb());

        // Swap the x order and the answers swap too.
        right.landmarks[THUMB_TIP].x = 0.35;
        left.landmarks[THUMB_TIP].x = 0.35;
        assert!(!extract_fingers(&right).thumb());
        assert!(extract_fingers(&left).thumb());
    }

    #[test]
    fn test_equal_coordinates_count_as_folded() {
        // Strict comparisons: a tip level with its joint is not extended.
        let hand = flat_hand(Handedness::Right);
        assert_eq!(extract_fingers(&hand).bits(), [0, 0, 0, 0, 0]);
        let hand = flat_hand(Handedness::Left);
        assert_eq!(extract_fingers(&hand).bits(), [0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_vertical_test_uses_pip_joint() {
        let pips = [INDEX_PIP, MIDDLE_PIP, RING_PIP, PINKY_PIP];
        let tips = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
        for (finger, (&pip, &tip)) in pips.iter().zip(tips.iter()).enumerate() {
            let mut hand = flat_hand(Handedness::Right);
            // Tip above the DIP joint but below the PIP joint: still folded.
            hand.landmarks[pip] = Landmark::new(0.5, 0.30);
            hand.landmarks[tip - 1] = Landmark::new(0.5, 0.45);
            hand.landmarks[tip] = Landmark::new(0.5, 0.40);
            assert!(!extract_fingers(&hand).0[finger + 1], "finger {finger}");

            // Raising only the tip past the PIP extends that finger alone.
            hand.landmarks[tip] = Landmark::new(0.5, 0.25);
            let mut expected = [0u8; 5];
            expected[finger + 1] = 1;
            assert_eq!(extract_fingers(&hand).bits(), expected, "finger {finger}");
        }
    }
}
