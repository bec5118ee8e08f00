//! Prebuild and cull scheduling
//!
//! Geometry is generated well above the camera and deactivated well below
//! it, keeping the live set bounded no matter how high the run goes. The
//! placement ledger is untouched by culling.

use log::{debug, trace};

use super::rows::generate_row;
use super::state::GameState;
use crate::consts::*;

/// Hard cap on rows per frame so a teleporting player can't stall a tick
const MAX_ROWS_PER_PASS: u32 = 64;

/// Generate rows until the lattice reaches the prebuild window above the
/// player.
///
/// A row that places nothing still advances the cursor, so a fully blocked
/// band is climbed past rather than retried forever. Repeated empty rows are
/// reported once per pass.
pub fn ensure_prebuilt(state: &mut GameState) {
    let target_y = state.player.body.pos.y - PREBUILD_AHEAD;
    let mut rows = 0;
    let mut empty_rows = 0;
    while state.top_built_y > target_y && rows < MAX_ROWS_PER_PASS {
        if generate_row(state) == 0 {
            empty_rows += 1;
        }
        rows += 1;
    }
    if empty_rows > 0 {
        debug!("prebuild pass produced {empty_rows} empty row(s) of {rows}");
    }
}

/// Deactivate geometry far below the player and restore it when the player
/// comes back down.
///
/// Platforms mid-crumble-cycle are left alone; the crumble timers own their
/// collidable state and will settle it when they fire.
pub fn cull(state: &mut GameState) {
    let py = state.player.body.pos.y;
    let mut culled = 0;
    for platform in &mut state.platforms {
        if platform.permanent || state.crumbles.contains_key(&platform.id) {
            continue;
        }
        let depth = platform.pos.y - py;
        if platform.active && depth > CULL_BELOW {
            platform.active = false;
            platform.collidable = false;
            culled += 1;
        } else if !platform.active && depth < REACTIVATE_BELOW {
            platform.active = true;
            platform.collidable = true;
            platform.alpha = 1.0;
        }
    }
    for carrot in &mut state.carrots {
        if carrot.collected {
            continue;
        }
        let depth = carrot.pos.y - py;
        if carrot.active && depth > CULL_BELOW {
            carrot.active = false;
        } else if !carrot.active && depth < REACTIVATE_BELOW {
            carrot.active = true;
        }
    }
    if culled > 0 {
        trace!("culled {culled} platform(s) below y={:.0}", py + CULL_BELOW);
    }
}
