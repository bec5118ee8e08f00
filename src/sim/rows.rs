//! Procedural row generation
//!
//! The generator advances a vertical path cursor and drops one platform per
//! lane, plus a few bridge platforms between adjacent lanes. Lanes are
//! visited in fixed order and every random draw goes through the state RNG,
//! so the lattice for a seed is identical across runs.

use log::trace;
use rand::Rng;

use super::placement::{can_place, width_for_height};
use super::state::GameState;
use crate::consts::*;
use crate::{height_meters, lerp};

/// Horizontal retry pattern: in place first, then alternating outward
const RETRY_OFFSETS: [f32; 7] = [0.0, -1.0, 1.0, -2.0, 2.0, -3.0, 3.0];
/// Vertical bumps tried after every horizontal offset is rejected
const VERTICAL_BUMPS: u32 = 2;
/// Bridges per row, drawn uniformly
const MAX_BRIDGES: u32 = 2;

/// Generate one row of platforms above the current path cursor.
///
/// Returns the number of platforms placed. Zero is possible when the
/// validator rejects every candidate in every lane, and callers use that to
/// detect a stalled prebuild.
pub fn generate_row(state: &mut GameState) -> usize {
    let difficulty = (GROUND_LEVEL - state.path_y) / DIFFICULTY_SPAN;
    let dy_max = lerp(ROW_DY_START, ROW_DY_END, difficulty).round() as i32;
    let dy = state.rng.random_range(ROW_DY_START as i32..=dy_max) as f32;
    let row_y = state.path_y - dy;
    state.path_y = row_y;
    state.top_built_y = state.top_built_y.min(row_y);

    let mut placed_count = 0;
    let mut lane_centers = [0.0f32; 3];

    for lane in 0..LANES.len() {
        let jitter = state.rng.random_range(-LANE_JITTER..=LANE_JITTER) as f32;
        let desired_x = (state.lane_x[lane] + jitter).clamp(PATH_X_MIN, PATH_X_MAX);
        lane_centers[lane] = desired_x;

        // One width draw covers the whole attempt so retries describe the
        // same platform at different spots
        let width = width_for_height(&mut state.rng, height_meters(row_y) as f32);

        match find_spot(state, desired_x, row_y, width) {
            Some((x, y)) => {
                place_lane_platform(state, x, y, width, CARROT_CHANCE_LANE, false);
                state.lane_x[lane] = x;
                lane_centers[lane] = x;
                placed_count += 1;
            }
            None => {
                trace!("row at y={row_y:.0}: lane {lane} skipped, no clear spot");
            }
        }
    }

    placed_count += generate_bridges(state, row_y, &lane_centers);

    trace!(
        "generated row y={row_y:.0} dy={dy:.0} platforms={placed_count} ledger={}",
        state.placed.len()
    );
    placed_count
}

/// Search for a validator-approved position near the desired one.
///
/// Horizontal offsets are tried nearest-first, then small vertical bumps at
/// the original x. `None` means the lane goes empty this row.
fn find_spot(state: &GameState, x: f32, y: f32, width: f32) -> Option<(f32, f32)> {
    for step in RETRY_OFFSETS {
        let cx = (x + step * OFFSET_STEP).clamp(PATH_X_MIN, PATH_X_MAX);
        if can_place(&state.placed, cx, y, width) {
            return Some((cx, y));
        }
    }
    for bump in 1..=VERTICAL_BUMPS {
        let cy = y - bump as f32 * HEADROOM;
        if can_place(&state.placed, x, cy, width) {
            return Some((x, cy));
        }
    }
    None
}

/// Bridge platforms at adjacent-lane midpoints make cross-lane moves
/// possible when the jitter has pushed lanes apart.
fn generate_bridges(state: &mut GameState, row_y: f32, lane_centers: &[f32; 3]) -> usize {
    let mut placed_count = 0;
    let bridges = state.rng.random_range(0..=MAX_BRIDGES);
    for _ in 0..bridges {
        let pair = state.rng.random_range(0..2usize);
        let mid = (lane_centers[pair] + lane_centers[pair + 1]) / 2.0;
        let jitter = state.rng.random_range(-BRIDGE_JITTER_X..=BRIDGE_JITTER_X) as f32;
        let x = (mid + jitter).clamp(PATH_X_MIN, PATH_X_MAX);
        let y = row_y + state.rng.random_range(-BRIDGE_JITTER_Y..=BRIDGE_JITTER_Y) as f32;
        let width = width_for_height(&mut state.rng, height_meters(y) as f32);
        if can_place(&state.placed, x, y, width) {
            place_lane_platform(state, x, y, width, CARROT_CHANCE_BRIDGE, true);
            placed_count += 1;
        }
    }
    placed_count
}

/// Create the platform, roll its crumble flag, and maybe hang a carrot
fn place_lane_platform(
    state: &mut GameState,
    x: f32,
    y: f32,
    width: f32,
    carrot_chance: f32,
    bridge: bool,
) {
    let mut chance = crumble_chance(height_meters(y) as f32);
    if bridge {
        // Bridges crumble half as often so lane crossings stay viable
        chance /= 2.0;
    }
    let crumbling = state.rng.random::<f32>() < chance;
    state.create_platform(x, y, width, crumbling);
    if state.rng.random::<f32>() < carrot_chance {
        state.spawn_carrot(x, y - PLATFORM_H / 2.0);
    }
}

/// Crumble odds ramp with altitude and cap out
fn crumble_chance(height_m: f32) -> f32 {
    (height_m / CRUMBLE_CHANCE_HEIGHT).min(CRUMBLE_MAX_CHANCE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_rows(seed: u64, rows: usize) -> GameState {
        let mut state = GameState::new(seed);
        for _ in 0..rows {
            generate_row(&mut state);
        }
        state
    }

    #[test]
    fn test_rows_climb_within_gap_bounds() {
        let mut state = GameState::new(42);
        let mut prev = state.path_y;
        for _ in 0..50 {
            generate_row(&mut state);
            let dy = prev - state.path_y;
            assert!(dy >= ROW_DY_START && dy <= ROW_DY_END, "dy {dy} out of range");
            prev = state.path_y;
        }
    }

    #[test]
    fn test_every_lane_places_on_fresh_rows() {
        // With lanes 1400 units apart and generous vertical gaps, the first
        // rows never need retries
        let state = build_rows(7, 3);
        let lane_platforms = state.platforms.iter().filter(|p| !p.permanent).count();
        assert!(lane_platforms >= 9, "expected full lanes, got {lane_platforms}");
    }

    #[test]
    fn test_fresh_row_fills_lanes_and_updates_anchors() {
        let mut state = GameState::new(13);
        let ground = state.platforms.len();
        generate_row(&mut state);

        // One platform per lane plus zero to two bridges
        let placed = state.platforms.len() - ground;
        assert!((3..=5).contains(&placed), "unexpected row size {placed}");

        // Lanes are placed first, in lane order, and each anchor moves to
        // the placed x
        for lane in 0..LANES.len() {
            let platform = &state.platforms[ground + lane];
            assert_eq!(state.lane_x[lane], platform.pos.x);
            assert!((state.lane_x[lane] - LANES[lane]).abs() <= LANE_JITTER as f32);
        }
    }

    #[test]
    fn test_placements_stay_in_path_bounds() {
        let state = build_rows(3, 100);
        for p in state.platforms.iter().filter(|p| !p.permanent) {
            assert!(p.pos.x >= PATH_X_MIN && p.pos.x <= PATH_X_MAX);
        }
    }

    #[test]
    fn test_bridges_stay_in_path_bounds_at_edge() {
        // Pin every anchor to the right edge so bridge midpoints sit at the
        // boundary; positive jitter must not push a bridge past it
        let mut state = GameState::new(29);
        state.lane_x = [PATH_X_MAX; 3];
        for _ in 0..60 {
            generate_row(&mut state);
        }
        for p in state.platforms.iter().filter(|p| !p.permanent) {
            assert!(
                p.pos.x >= PATH_X_MIN && p.pos.x <= PATH_X_MAX,
                "platform escaped path bounds at x={}",
                p.pos.x
            );
        }
    }

    #[test]
    fn test_no_padded_overlaps() {
        let state = build_rows(11, 120);
        let lattice: Vec<_> = state.platforms.iter().filter(|p| !p.permanent).collect();
        for (i, a) in lattice.iter().enumerate() {
            for b in &lattice[i + 1..] {
                let dx = (a.pos.x - b.pos.x).abs();
                let dy = (a.pos.y - b.pos.y).abs();
                let min_dx = a.width / 2.0 + b.width / 2.0 + PAD_X;
                assert!(
                    dx >= min_dx || dy >= MIN_DY,
                    "pads violated: dx={dx} dy={dy} between {:?} and {:?}",
                    a.pos,
                    b.pos
                );
            }
        }
    }

    #[test]
    fn test_same_seed_same_lattice() {
        let a = build_rows(99, 60);
        let b = build_rows(99, 60);
        assert_eq!(a.platforms.len(), b.platforms.len());
        for (pa, pb) in a.platforms.iter().zip(&b.platforms) {
            assert_eq!(pa.pos, pb.pos);
            assert_eq!(pa.width, pb.width);
            assert_eq!(pa.crumbling, pb.crumbling);
        }
        assert_eq!(a.carrots.len(), b.carrots.len());
    }

    #[test]
    fn test_crumble_odds_ramp_and_cap() {
        assert_eq!(crumble_chance(0.0), 0.0);
        assert!((crumble_chance(1000.0) - 0.5).abs() < 1e-6);
        assert_eq!(crumble_chance(2000.0), CRUMBLE_MAX_CHANCE);
        assert_eq!(crumble_chance(50_000.0), CRUMBLE_MAX_CHANCE);
    }

    #[test]
    fn test_carrots_hover_above_platform_tops() {
        let state = build_rows(21, 40);
        for c in &state.carrots {
            let over = state.platforms.iter().any(|p| {
                !p.permanent
                    && (p.pos.x - c.pos.x).abs() < 1.0
                    && (c.pos.y - (p.top() - CARROT_OFFSET_Y)).abs() < 1.0
            });
            assert!(over, "carrot at {:?} not above any platform top", c.pos);
        }
    }
}
