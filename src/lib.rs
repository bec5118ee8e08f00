//! Sky Jump - an endless vertical platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (row generation, physics, crumbling
//!   platforms, player motion, scoring)
//! - `settings`: Presentation preferences (sound, accessibility)
//!
//! Rendering, audio synthesis and the DOM scoreboard are host concerns; the
//! simulation notifies them through the event queue drained each tick.

pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the frame-scaled tuning)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen dimensions (world units = pixels)
    pub const GAME_WIDTH: f32 = 800.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// World horizontal extent; vertical extent is unbounded upward
    pub const WORLD_LEFT: f32 = -1200.0;
    pub const WORLD_RIGHT: f32 = 1200.0;
    /// Player center is kept this far inside the world edges
    pub const WALL_INSET: f32 = 40.0;

    /// Ground top reference; y grows downward, climbing decreases y
    pub const GROUND_LEVEL: f32 = 600.0;
    /// Offset so the ground surface reads as exactly 0 m
    pub const GROUND_OFFSET: f32 = 60.0;
    /// World pixels per height meter
    pub const PIXELS_PER_METER: f32 = 10.0;
    pub const GROUND_SEGMENT_W: f32 = 800.0;
    pub const GROUND_SEGMENT_H: f32 = 40.0;

    /// Platform geometry - two width tiers
    pub const PLATFORM_W: f32 = 120.0;
    pub const PLATFORM_NARROW_W: f32 = 70.0;
    pub const PLATFORM_H: f32 = 20.0;
    /// Height (m) at which narrow platforms start appearing
    pub const MIX_START_HEIGHT: u32 = 1800;
    /// Height (m) at which all platforms are narrow
    pub const MIX_END_HEIGHT: u32 = 2500;

    /// Placement validator padding
    pub const PAD_X: f32 = 24.0;
    /// Clear space required above a platform so jumps aren't blocked
    pub const HEADROOM: f32 = 70.0;
    /// Vertical pad beyond the platform body; the larger of the headroom
    /// and the platform body plus clearance (20 + 44)
    pub const PAD_Y: f32 = HEADROOM;
    /// Centers closer than this vertically conflict when their x spans meet
    pub const MIN_DY: f32 = PLATFORM_H + PAD_Y;
    /// Ledger entries farther than this vertically are skipped by the check
    pub const PLACEMENT_CHECK_RANGE: f32 = 1200.0;

    /// Lane anchors - each lane guarantees a climbable route
    pub const LANES: [f32; 3] = [-700.0, 0.0, 700.0];
    pub const LANE_JITTER: i32 = 160;
    pub const PATH_X_MIN: f32 = -1000.0;
    pub const PATH_X_MAX: f32 = 1000.0;

    /// Row vertical gap range; widens with height, capped under jump reach
    pub const ROW_DY_START: f32 = 90.0;
    pub const ROW_DY_END: f32 = 160.0;
    /// Vertical climb over which difficulty ramps from start to end gap
    pub const DIFFICULTY_SPAN: f32 = 15000.0;
    /// Discrete horizontal retry step for rejected placements
    pub const OFFSET_STEP: f32 = PLATFORM_W + 20.0;
    /// Seed position of the path cursor above the ground
    pub const FIRST_ROW_OFFSET: f32 = 120.0;

    /// Crumbling platform odds scale with height, capped
    pub const CRUMBLE_MAX_CHANCE: f32 = 0.6;
    pub const CRUMBLE_CHANCE_HEIGHT: f32 = 2000.0;
    pub const CRUMBLE_WARN_SECS: f64 = 0.5;
    pub const CRUMBLE_REGEN_SECS: f64 = 3.0;

    /// Bridge platforms between adjacent lanes
    pub const BRIDGE_JITTER_X: i32 = 80;
    pub const BRIDGE_JITTER_Y: i32 = 10;

    /// Collectibles
    pub const CARROT_CHANCE_LANE: f32 = 0.25;
    pub const CARROT_CHANCE_BRIDGE: f32 = 0.2;
    pub const CARROT_OFFSET_Y: f32 = 25.0;
    pub const CARROT_HALF_W: f32 = 12.0;
    pub const CARROT_HALF_H: f32 = 18.0;
    pub const CARROT_SCORE: u32 = 50;

    /// Prebuild window: geometry always exists this far above the player
    pub const PREBUILD_AHEAD: f32 = 6.0 * GAME_HEIGHT;
    /// Cull window: geometry this far below the player is deactivated
    pub const CULL_BELOW: f32 = 4.0 * GAME_HEIGHT;
    /// Culled geometry nearer than this comes back when the player descends
    pub const REACTIVATE_BELOW: f32 = 2.0 * GAME_HEIGHT;

    /// Player physics
    pub const GRAVITY: f32 = 800.0;
    pub const JUMP_VELOCITY: f32 = -600.0;
    pub const RUN_SPEED: f32 = 200.0;
    /// Per-step damping of upward velocity when jump is released
    pub const JUMP_DAMPING: f32 = 0.9;
    pub const COYOTE_TIME: f32 = 0.12;
    pub const JUMP_BUFFER: f32 = 0.12;
    pub const PLAYER_HALF_W: f32 = 14.0;
    pub const PLAYER_HALF_H: f32 = 15.0;
    pub const PLAYER_SPAWN_X: f32 = 400.0;
    pub const PLAYER_SPAWN_Y: f32 = GROUND_LEVEL - 80.0;
    /// Falling past this resets the player to the spawn point
    pub const FALL_RESET_Y: f32 = GROUND_LEVEL + 100.0;
    /// Vertical speed past which the airborne pose switches
    pub const POSE_VY_THRESHOLD: f32 = 20.0;

    /// Background blend bands (heights in meters)
    pub const NIGHT_BAND: (f32, f32) = (50.0, 100.0);
    pub const SPACE_BAND: (f32, f32) = (1400.0, 1900.0);
}

/// Linear ease from a to b by t clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Height in meters for a world y coordinate (ground surface = 0)
#[inline]
pub fn height_meters(y: f32) -> u32 {
    let h = (consts::GROUND_LEVEL - consts::GROUND_OFFSET - y) / consts::PIXELS_PER_METER;
    h.floor().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_clamps() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
    }

    #[test]
    fn test_height_at_ground_is_zero() {
        assert_eq!(height_meters(consts::GROUND_LEVEL - consts::GROUND_OFFSET), 0);
        // Below ground clamps to zero rather than going negative
        assert_eq!(height_meters(consts::GROUND_LEVEL + 500.0), 0);
    }

    #[test]
    fn test_height_scales_with_climb() {
        let y = consts::GROUND_LEVEL - consts::GROUND_OFFSET - 1000.0;
        assert_eq!(height_meters(y), 100);
    }
}
