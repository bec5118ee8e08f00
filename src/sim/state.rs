//! Game state and core simulation types
//!
//! Everything the per-frame step mutates lives here. Platforms are never
//! destroyed during a run - only deactivated - so a platform's id doubles as
//! its slot index for the whole session.

use std::collections::HashMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::physics::Body;
use super::player::Player;
use super::score::HeightTracker;
use super::timers::TimerQueue;
use crate::consts::*;

/// Platform identity; equal to the platform's index in `GameState::platforms`
pub type PlatformId = u32;

/// A platform in the lattice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    /// Center position in world units
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Land from above, pass from below/sides
    pub one_way: bool,
    /// Eligible for the crumble lifecycle
    pub crumbling: bool,
    /// Ground segments never despawn
    pub permanent: bool,
    /// Visible / participating in the world (cull state)
    pub active: bool,
    /// Collision enabled (cull state and crumble state both gate this)
    pub collidable: bool,
    /// Render opacity; the crumble warning pulses this
    pub alpha: f32,
}

impl Platform {
    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }
}

/// A collectible carrot hovering above a platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Carrot {
    pub id: u32,
    pub pos: Vec2,
    pub active: bool,
    pub collected: bool,
}

/// Append-only ledger entry used by the placement validator.
///
/// Entries are never removed: culling affects render/physics state only, and
/// future placements near the same altitude must still see old geometry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlacedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

/// Where a crumbling platform is in its lifecycle.
///
/// Stable platforms have no record at all; record existence is what blocks
/// re-triggering and cull reactivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CrumblePhase {
    /// Landed on, pulsing, collapse timer running
    Warning { started_at: f64 },
    /// Collapsed and waiting on the regeneration timer
    Regenerating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrumbleRecord {
    pub phase: CrumblePhase,
    pub timer: super::timers::TimerHandle,
}

/// Notifications for the presentation layer, drained each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Play the jump sound
    Jumped,
    /// Play the collect sound
    CarrotCollected { carrot_score: u32 },
    /// Update the score display
    ScoreChanged { height: u32, total: u32 },
    /// Re-blend the parallax backgrounds
    BackgroundChanged { blend: BackgroundBlend },
}

/// Background cross-fade factors derived from height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BackgroundBlend {
    /// 0 = cityscape, 1 = night sky
    pub night: f32,
    /// 0 = night sky, 1 = deep space
    pub space: f32,
}

impl BackgroundBlend {
    /// Blend factors for a height in meters
    pub fn for_height(h: u32) -> Self {
        let ramp = |h: f32, band: (f32, f32)| -> f32 {
            if h <= band.0 {
                0.0
            } else if h >= band.1 {
                1.0
            } else {
                (h - band.0) / (band.1 - band.0)
            }
        };
        let h = h as f32;
        Self {
            night: ramp(h, NIGHT_BAND),
            space: ramp(h, SPACE_BAND),
        }
    }
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete game state (deterministic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; all randomness flows through here
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Simulation clock (seconds)
    pub time_secs: f64,
    pub tick_count: u64,

    /// World geometry, indexed by id
    pub platforms: Vec<Platform>,
    pub carrots: Vec<Carrot>,
    /// Append-only placement ledger
    pub placed: Vec<PlacedRect>,

    /// Current x anchor per lane
    pub lane_x: [f32; 3],
    /// Vertical cursor of the last generated row
    pub path_y: f32,
    /// Highest (smallest y) built row, drives the prebuild loop
    pub top_built_y: f32,

    /// Platforms currently mid-crumble-cycle
    pub crumbles: HashMap<PlatformId, CrumbleRecord>,
    pub timers: TimerQueue,

    pub player: Player,
    pub height: HeightTracker,
    pub carrot_score: u32,
    /// Last score figures pushed to the presentation layer
    pub last_score: (u32, u32),
    pub background: BackgroundBlend,

    /// Presentation notifications accumulated this frame
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh world: ground segments, seeded cursors, player at spawn.
    ///
    /// The first prebuild pass runs on the first `tick`, so tests can inspect
    /// the bare world before any rows exist.
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_secs: 0.0,
            tick_count: 0,
            platforms: Vec::new(),
            carrots: Vec::new(),
            placed: Vec::new(),
            lane_x: LANES,
            path_y: GROUND_LEVEL - FIRST_ROW_OFFSET,
            top_built_y: GROUND_LEVEL - FIRST_ROW_OFFSET,
            crumbles: HashMap::new(),
            timers: TimerQueue::new(),
            player: Player::new(Body::new(
                Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y),
                Vec2::new(PLAYER_HALF_W, PLAYER_HALF_H),
            )),
            height: HeightTracker::default(),
            carrot_score: 0,
            last_score: (0, 0),
            background: BackgroundBlend::default(),
            events: Vec::new(),
        };

        state.create_ground();
        state
    }

    /// Ground floor spanning the world width; fully collidable, permanent.
    fn create_ground(&mut self) {
        let world_w = WORLD_RIGHT - WORLD_LEFT;
        let segments = (world_w / GROUND_SEGMENT_W).ceil() as i32 + 1;
        let y = GROUND_LEVEL - GROUND_SEGMENT_H / 2.0;
        for i in 0..segments {
            let x = WORLD_LEFT + i as f32 * GROUND_SEGMENT_W;
            let id = self.platforms.len() as PlatformId;
            self.platforms.push(Platform {
                id,
                pos: Vec2::new(x, y),
                width: GROUND_SEGMENT_W,
                height: GROUND_SEGMENT_H,
                one_way: false,
                crumbling: false,
                permanent: true,
                active: true,
                collidable: true,
                alpha: 1.0,
            });
            self.placed.push(PlacedRect {
                x,
                y,
                width: GROUND_SEGMENT_W,
            });
        }
    }

    /// Append a gameplay platform and its ledger entry
    pub fn create_platform(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        crumbling: bool,
    ) -> PlatformId {
        let id = self.platforms.len() as PlatformId;
        self.platforms.push(Platform {
            id,
            pos: Vec2::new(x, y),
            width,
            height: PLATFORM_H,
            one_way: true,
            crumbling,
            permanent: false,
            active: true,
            collidable: true,
            alpha: 1.0,
        });
        self.placed.push(PlacedRect { x, y, width });
        id
    }

    /// Spawn a carrot hovering above a platform at (x, y)
    pub fn spawn_carrot(&mut self, x: f32, y: f32) {
        let id = self.carrots.len() as u32;
        self.carrots.push(Carrot {
            id,
            pos: Vec2::new(x, y - CARROT_OFFSET_Y),
            active: true,
            collected: false,
        });
    }

    /// Total score: best height plus collected carrots
    pub fn total_score(&self) -> u32 {
        self.height.max_height + self.carrot_score
    }

    /// Drain this frame's presentation events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Scene teardown: cancel every outstanding timer so no deferred work
    /// fires against a dead world.
    pub fn teardown(&mut self) {
        self.timers.cancel_all();
        self.events.clear();
    }
}
