//! Player motion controller
//!
//! Coyote time keeps a jump legal for a short window after walking off an
//! edge, and the jump buffer holds a slightly early press until the next
//! landing. Releasing the jump key damps upward velocity, so tap height and
//! hold height differ.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{Body, Contacts};
use super::tick::TickInput;
use crate::consts::*;

/// Animation pose derived from motion, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    Idle,
    Jump,
    Fall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub grounded: bool,
    pub pose: Pose,
    /// Facing direction, -1 or 1
    pub facing: f32,
    /// Seconds of jump eligibility left after leaving the ground
    pub coyote: f32,
    /// Seconds the pending jump press stays valid
    pub buffer: f32,
    jump_held: bool,
}

impl Player {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            grounded: false,
            pose: Pose::Idle,
            facing: 1.0,
            coyote: 0.0,
            buffer: 0.0,
            jump_held: false,
        }
    }

    /// Apply one substep of input before integration. Returns true when a
    /// jump fires this substep.
    pub fn apply_input(&mut self, input: &TickInput, dt: f32) -> bool {
        if input.left && !input.right {
            self.body.vel.x = -RUN_SPEED;
            self.facing = -1.0;
        } else if input.right && !input.left {
            self.body.vel.x = RUN_SPEED;
            self.facing = 1.0;
        } else {
            self.body.vel.x = 0.0;
        }

        if self.grounded {
            self.coyote = COYOTE_TIME;
        } else {
            self.coyote = (self.coyote - dt).max(0.0);
        }

        if input.jump && !self.jump_held {
            self.buffer = JUMP_BUFFER;
        } else if input.jump {
            self.buffer = (self.buffer - dt).max(0.0);
        } else {
            // Release forfeits the buffered press
            self.buffer = 0.0;
        }
        self.jump_held = input.jump;

        let mut jumped = false;
        if self.buffer > 0.0 && (self.grounded || self.coyote > 0.0) {
            self.body.vel.y = JUMP_VELOCITY;
            self.buffer = 0.0;
            self.coyote = 0.0;
            self.grounded = false;
            jumped = true;
        }

        // Short hop: damp upward speed while the key is up
        if !input.jump && self.body.vel.y < 0.0 {
            self.body.vel.y *= JUMP_DAMPING;
        }

        jumped
    }

    /// Fold the collision result back in and pick the pose
    pub fn settle(&mut self, contacts: &Contacts) {
        self.grounded = contacts.grounded;
        self.pose = if self.grounded {
            // No run pose, the sprite sheet only has idle/jump/fall
            Pose::Idle
        } else if self.body.vel.y < -POSE_VY_THRESHOLD {
            Pose::Jump
        } else if self.body.vel.y > POSE_VY_THRESHOLD {
            Pose::Fall
        } else {
            // Inside the deadband around the apex, hold the last pose
            self.pose
        };
    }

    /// Falling out of the world puts the player back on the spawn platform
    pub fn reset_to_spawn(&mut self) {
        self.body.pos = Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
        self.body.vel = Vec2::ZERO;
        self.grounded = false;
        self.coyote = 0.0;
        self.buffer = 0.0;
        self.pose = Pose::Fall;
    }
}
