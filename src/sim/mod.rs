//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (platform id == slot index)
//! - No rendering or platform dependencies

pub mod crumble;
pub mod physics;
pub mod placement;
pub mod player;
pub mod rows;
pub mod schedule;
pub mod score;
pub mod state;
pub mod tick;
pub mod timers;

pub use physics::Body;
pub use placement::{can_place, width_for_height};
pub use player::{Player, Pose};
pub use score::HeightTracker;
pub use state::{
    BackgroundBlend, Carrot, GameEvent, GameState, PlacedRect, Platform, PlatformId,
};
pub use tick::{TickInput, tick};
pub use timers::{TimerAction, TimerHandle, TimerQueue};
