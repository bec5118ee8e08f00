//! Height and score tracking
//!
//! Height is the best altitude reached this run, in meters above the ground
//! surface. It only ratchets upward; falling, resetting, or camera motion
//! never lower it.

use serde::{Deserialize, Serialize};

use crate::height_meters;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HeightTracker {
    /// Best height reached, meters
    pub max_height: u32,
}

impl HeightTracker {
    /// Feed the player's current y. Returns the new record when one is set.
    pub fn observe(&mut self, y: f32) -> Option<u32> {
        let h = height_meters(y);
        if h > self.max_height {
            self.max_height = h;
            Some(h)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    const SURFACE: f32 = GROUND_LEVEL - GROUND_OFFSET;

    #[test]
    fn test_climbing_raises_height() {
        let mut tracker = HeightTracker::default();
        assert_eq!(tracker.observe(SURFACE - 100.0), Some(10));
        assert_eq!(tracker.observe(SURFACE - 250.0), Some(25));
        assert_eq!(tracker.max_height, 25);
    }

    #[test]
    fn test_falling_never_lowers_height() {
        let mut tracker = HeightTracker::default();
        tracker.observe(SURFACE - 500.0);
        assert_eq!(tracker.observe(SURFACE - 10.0), None);
        assert_eq!(tracker.observe(SURFACE + 300.0), None);
        assert_eq!(tracker.max_height, 50);
    }

    #[test]
    fn test_sub_meter_moves_do_not_report() {
        let mut tracker = HeightTracker::default();
        tracker.observe(SURFACE - 100.0);
        // Nine more pixels is still 10 m after flooring
        assert_eq!(tracker.observe(SURFACE - 109.0), None);
        assert_eq!(tracker.observe(SURFACE - 110.0), Some(11));
    }
}
