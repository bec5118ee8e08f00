//! Body integration and platform collision
//!
//! Axis-aligned boxes with a crossing test for landings: a body lands when
//! its bottom edge was at or above a platform top last step and at or below
//! it now, while overlapping horizontally. The crossing test also catches
//! fast falls that would clear the platform's thickness within one substep.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Platform, PlatformId};
use crate::consts::*;

/// Tolerance on the previous-bottom check so resting contact re-lands every
/// substep
const LAND_EPS: f32 = 4.0;

/// A dynamic axis-aligned box
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Half extents
    pub half: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, half: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            half,
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.half.y
    }

    #[inline]
    fn overlaps_x(&self, p: &Platform) -> bool {
        (self.pos.x - p.pos.x).abs() < self.half.x + p.width / 2.0
    }
}

/// Support contacts found during a step
#[derive(Debug, Clone, Default)]
pub struct Contacts {
    /// Standing on something this substep
    pub grounded: bool,
    /// Every platform currently holding the body up, in id order
    pub supporting: Vec<PlatformId>,
}

/// Integrate gravity and velocity, then resolve against collidable
/// platforms. Platforms are visited in storage order so contact reporting is
/// deterministic.
pub fn step(body: &mut Body, platforms: &[Platform], dt: f32) -> Contacts {
    body.vel.y += GRAVITY * dt;

    let prev_bottom = body.bottom();
    let prev_top = body.top();
    body.pos += body.vel * dt;

    // Side walls stop the body dead
    let min_x = WORLD_LEFT + WALL_INSET;
    let max_x = WORLD_RIGHT - WALL_INSET;
    if body.pos.x < min_x {
        body.pos.x = min_x;
        body.vel.x = 0.0;
    } else if body.pos.x > max_x {
        body.pos.x = max_x;
        body.vel.x = 0.0;
    }

    let mut contacts = Contacts::default();
    for p in platforms {
        if !p.collidable || !body.overlaps_x(p) {
            continue;
        }

        let landing = body.vel.y >= 0.0
            && prev_bottom <= p.top() + LAND_EPS
            && body.bottom() >= p.top();
        if landing {
            body.pos.y = p.top() - body.half.y;
            body.vel.y = 0.0;
            contacts.grounded = true;
            contacts.supporting.push(p.id);
        } else if !p.one_way
            && body.vel.y < 0.0
            && prev_top >= p.bottom()
            && body.top() <= p.bottom()
        {
            // Head bump on a solid platform
            body.pos.y = p.bottom() + body.half.y;
            body.vel.y = 0.0;
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(id: PlatformId, x: f32, y: f32, one_way: bool) -> Platform {
        Platform {
            id,
            pos: Vec2::new(x, y),
            width: PLATFORM_W,
            height: PLATFORM_H,
            one_way,
            crumbling: false,
            permanent: !one_way,
            active: true,
            collidable: true,
            alpha: 1.0,
        }
    }

    fn body_above(p: &Platform, gap: f32) -> Body {
        Body::new(
            Vec2::new(p.pos.x, p.top() - PLAYER_HALF_H - gap),
            Vec2::new(PLAYER_HALF_W, PLAYER_HALF_H),
        )
    }

    #[test]
    fn test_falling_body_lands_on_top() {
        let p = platform(0, 0.0, 400.0, true);
        let mut body = body_above(&p, 2.0);
        let mut contacts = Contacts::default();
        for _ in 0..20 {
            contacts = step(&mut body, std::slice::from_ref(&p), SIM_DT);
            if contacts.grounded {
                break;
            }
        }
        assert!(contacts.grounded);
        assert_eq!(contacts.supporting, vec![0]);
        assert_eq!(body.bottom(), p.top());
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_fast_fall_does_not_tunnel() {
        let p = platform(0, 0.0, 400.0, true);
        let mut body = body_above(&p, 1.0);
        // Well past one platform thickness per substep
        body.vel.y = 2400.0;
        let contacts = step(&mut body, std::slice::from_ref(&p), SIM_DT);
        assert!(contacts.grounded);
        assert_eq!(body.bottom(), p.top());
    }

    #[test]
    fn test_rising_body_passes_one_way_from_below() {
        let p = platform(0, 0.0, 400.0, true);
        let mut body = Body::new(
            Vec2::new(0.0, p.bottom() + PLAYER_HALF_H + 5.0),
            Vec2::new(PLAYER_HALF_W, PLAYER_HALF_H),
        );
        body.vel.y = JUMP_VELOCITY;
        for _ in 0..10 {
            let contacts = step(&mut body, std::slice::from_ref(&p), SIM_DT);
            assert!(!contacts.grounded);
        }
        assert!(body.bottom() < p.top());
    }

    #[test]
    fn test_rising_body_bumps_solid_from_below() {
        let p = platform(0, 0.0, 400.0, false);
        let mut body = Body::new(
            Vec2::new(0.0, p.bottom() + PLAYER_HALF_H + 5.0),
            Vec2::new(PLAYER_HALF_W, PLAYER_HALF_H),
        );
        body.vel.y = JUMP_VELOCITY;
        step(&mut body, std::slice::from_ref(&p), SIM_DT);
        assert_eq!(body.top(), p.bottom());
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_non_collidable_platform_is_ignored() {
        let mut p = platform(0, 0.0, 400.0, true);
        p.collidable = false;
        let mut body = body_above(&p, 1.0);
        for _ in 0..30 {
            let contacts = step(&mut body, std::slice::from_ref(&p), SIM_DT);
            assert!(!contacts.grounded);
        }
        assert!(body.bottom() > p.top());
    }

    #[test]
    fn test_walls_clamp_and_zero_velocity() {
        let mut body = Body::new(
            Vec2::new(WORLD_RIGHT - WALL_INSET - 1.0, 0.0),
            Vec2::new(PLAYER_HALF_W, PLAYER_HALF_H),
        );
        body.vel.x = RUN_SPEED;
        step(&mut body, &[], SIM_DT);
        assert_eq!(body.pos.x, WORLD_RIGHT - WALL_INSET);
        assert_eq!(body.vel.x, 0.0);
    }

    #[test]
    fn test_misses_platform_when_beside_it() {
        let p = platform(0, 0.0, 400.0, true);
        let mut body = body_above(&p, 1.0);
        body.pos.x = p.right() + PLAYER_HALF_W + 1.0;
        for _ in 0..30 {
            let contacts = step(&mut body, std::slice::from_ref(&p), SIM_DT);
            assert!(!contacts.grounded);
        }
    }
}
