//! Finger pose classification.
//!
//! For every tracked finger, the fingertip's vertical position is compared to
//! the PIP joint two landmarks below it: a tip above its joint (numerically
//! smaller Y) counts as "raised". This is a crude but serviceable heuristic
//! for an upright hand facing the camera.

use std::fmt;

use crate::hand::LandmarkIdx;
use crate::landmark::Landmarks;

/// The fingers a gesture can be formed from.
///
/// Thumb and pinky are not tracked; no gesture uses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Index,
    Middle,
    Ring,
}

impl Finger {
    fn bit(self) -> u8 {
        1 << self as u8
    }

    fn tip(self) -> LandmarkIdx {
        match self {
            Finger::Index => LandmarkIdx::IndexFingerTip,
            Finger::Middle => LandmarkIdx::MiddleFingerTip,
            Finger::Ring => LandmarkIdx::RingFingerTip,
        }
    }
}

const ALL_FINGERS: [Finger; 3] = [Finger::Index, Finger::Middle, Finger::Ring];

/// A set of raised fingers, recomputed every frame.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerSet(u8);

impl FingerSet {
    pub const EMPTY: Self = Self(0);

    pub fn of(fingers: &[Finger]) -> Self {
        let mut set = Self::EMPTY;
        for finger in fingers {
            set.insert(*finger);
        }
        set
    }

    pub fn insert(&mut self, finger: Finger) {
        self.0 |= finger.bit();
    }

    pub fn contains(&self, finger: Finger) -> bool {
        self.0 & finger.bit() != 0
    }

    /// Returns the number of raised fingers in this set.
    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }
}

impl fmt::Debug for FingerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(ALL_FINGERS.iter().filter(|finger| self.contains(**finger)))
            .finish()
    }
}

/// Classifies which of the tracked fingers are raised.
///
/// Pure and stateless; malformed landmark sets (fewer than 21 points) are a
/// programming error and panic.
pub fn raised_fingers(landmarks: &Landmarks) -> FingerSet {
    let mut set = FingerSet::EMPTY;
    for finger in ALL_FINGERS {
        let tip = finger.tip() as usize;
        let tip_y = landmarks.position(tip)[1];
        let pip_y = landmarks.position(tip - 2)[1];
        if tip_y < pip_y {
            set.insert(finger);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::NUM_LANDMARKS;

    /// Builds a landmark set with the given fingers extended upwards and all
    /// others curled (tip below the PIP joint).
    fn hand_with_raised(raised: &[Finger]) -> Landmarks {
        let mut landmarks = Landmarks::new(NUM_LANDMARKS);
        for pos in landmarks.positions_mut() {
            *pos = [100.0, 100.0, 0.0];
        }
        for finger in ALL_FINGERS {
            let tip = finger.tip() as usize;
            let tip_y = if raised.contains(&finger) { 50.0 } else { 150.0 };
            landmarks.positions_mut()[tip] = [100.0, tip_y, 0.0];
        }
        landmarks
    }

    #[test]
    fn no_fingers_raised() {
        assert_eq!(raised_fingers(&hand_with_raised(&[])), FingerSet::EMPTY);
    }

    #[test]
    fn single_finger() {
        let set = raised_fingers(&hand_with_raised(&[Finger::Index]));
        assert_eq!(set, FingerSet::of(&[Finger::Index]));
        assert!(set.contains(Finger::Index));
        assert!(!set.contains(Finger::Middle));
        assert_eq!(set.count(), 1);
    }

    #[test]
    fn all_fingers() {
        let set = raised_fingers(&hand_with_raised(&ALL_FINGERS));
        assert_eq!(set, FingerSet::of(&ALL_FINGERS));
        assert_eq!(set.count(), 3);
    }

    #[test]
    fn tip_level_with_joint_is_not_raised() {
        // All landmarks share the same Y coordinate, so no tip is above its joint.
        let landmarks = Landmarks::new(NUM_LANDMARKS);
        assert_eq!(raised_fingers(&landmarks), FingerSet::EMPTY);
    }

    #[test]
    fn thumb_and_pinky_are_ignored() {
        let mut landmarks = hand_with_raised(&[]);
        // Extend thumb and pinky far above their joints.
        landmarks.positions_mut()[LandmarkIdx::ThumbTip as usize] = [100.0, 0.0, 0.0];
        landmarks.positions_mut()[LandmarkIdx::PinkyTip as usize] = [100.0, 0.0, 0.0];
        assert_eq!(raised_fingers(&landmarks), FingerSet::EMPTY);
    }
}
