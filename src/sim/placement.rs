//! Placement validation against the append-only ledger
//!
//! Candidate platforms must keep horizontal and vertical clearance from every
//! previously placed rectangle near their altitude. The ledger survives
//! culling, so a regenerated region can never overlap geometry that used to
//! be there.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::PlacedRect;
use crate::consts::*;

/// Platform width for a given height in meters.
///
/// Full width below the mix zone, narrow above it, and a height-proportional
/// coin toss inside it. One toss covers one placement attempt, so retries of
/// the same logical platform keep the same width.
pub fn width_for_height(rng: &mut Pcg32, height_m: f32) -> f32 {
    let (mix_start, mix_end) = (MIX_START_HEIGHT as f32, MIX_END_HEIGHT as f32);
    if height_m < mix_start {
        PLATFORM_W
    } else if height_m >= mix_end {
        PLATFORM_NARROW_W
    } else {
        let narrow_chance = (height_m - mix_start) / (mix_end - mix_start);
        if rng.random::<f32>() < narrow_chance {
            PLATFORM_NARROW_W
        } else {
            PLATFORM_W
        }
    }
}

/// Whether a candidate rectangle keeps clearance from every ledger entry
/// within the vertical check range.
///
/// Overlap means BOTH a horizontal gap smaller than the summed half-widths
/// plus pad AND a vertical gap smaller than the platform body plus the
/// vertical pad. One axis clearing is enough to accept the pair.
pub fn can_place(placed: &[PlacedRect], x: f32, y: f32, width: f32) -> bool {
    for rect in placed {
        if (rect.y - y).abs() > PLACEMENT_CHECK_RANGE {
            continue;
        }
        let min_dx = width / 2.0 + rect.width / 2.0 + PAD_X;
        let dx = (rect.x - x).abs();
        let dy = (rect.y - y).abs();
        if dx < min_dx && dy < MIN_DY {
            return false;
        }
    }
    true
}
