//! Crumbling platform lifecycle
//!
//! Landing on a crumbling platform starts a warning pulse, then the platform
//! collapses out from under the player and regenerates a few seconds later.
//! The record map is the single source of truth for "mid-cycle": its
//! presence blocks re-triggering and keeps the cull pass hands-off until the
//! cycle settles.

use log::trace;

use super::state::{CrumblePhase, CrumbleRecord, GameState, PlatformId};
use super::timers::TimerAction;
use crate::consts::*;

/// Pulse rate of the warning flash (radians per second)
const WARN_PULSE_RATE: f64 = 24.0;

/// Begin the warning phase for any crumbling platform the player just
/// landed on
pub fn on_landings(state: &mut GameState, supporting: &[PlatformId]) {
    for &id in supporting {
        let Some(platform) = state.platforms.get(id as usize) else {
            continue;
        };
        if !platform.crumbling || !platform.collidable || state.crumbles.contains_key(&id) {
            continue;
        }
        let timer = state
            .timers
            .schedule(state.time_secs + CRUMBLE_WARN_SECS, TimerAction::Collapse(id));
        state.crumbles.insert(
            id,
            CrumbleRecord {
                phase: CrumblePhase::Warning {
                    started_at: state.time_secs,
                },
                timer,
            },
        );
        trace!("platform {id} crumbling, collapse in {CRUMBLE_WARN_SECS}s");
    }
}

/// Apply a fired timer action
pub fn apply_action(state: &mut GameState, action: TimerAction) {
    match action {
        TimerAction::Collapse(id) => collapse(state, id),
        TimerAction::Regenerate(id) => regenerate(state, id),
    }
}

fn collapse(state: &mut GameState, id: PlatformId) {
    let Some(record) = state.crumbles.get_mut(&id) else {
        return;
    };
    let platform = &mut state.platforms[id as usize];
    platform.collidable = false;
    platform.alpha = 0.0;
    record.phase = CrumblePhase::Regenerating;
    record.timer = state
        .timers
        .schedule(state.time_secs + CRUMBLE_REGEN_SECS, TimerAction::Regenerate(id));
    trace!("platform {id} collapsed, back in {CRUMBLE_REGEN_SECS}s");
}

fn regenerate(state: &mut GameState, id: PlatformId) {
    if state.crumbles.remove(&id).is_none() {
        return;
    }
    // Restore fully; the next cull pass owns the far-below case again
    let platform = &mut state.platforms[id as usize];
    platform.active = true;
    platform.collidable = true;
    platform.alpha = 1.0;
    trace!("platform {id} regenerated");
}

/// Drive the warning flash from the simulation clock so replays pulse
/// identically
pub fn update_warning_pulse(state: &mut GameState) {
    for (&id, record) in &state.crumbles {
        if let CrumblePhase::Warning { started_at } = record.phase {
            let t = state.time_secs - started_at;
            let pulse = 0.55 + 0.45 * (t * WARN_PULSE_RATE).cos();
            state.platforms[id as usize].alpha = pulse as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::timers::TimerAction;

    fn state_with_crumbler() -> (GameState, PlatformId) {
        let mut state = GameState::new(1);
        let id = state.create_platform(0.0, 300.0, PLATFORM_W, true);
        (state, id)
    }

    fn fire_due(state: &mut GameState) {
        for action in state.timers.advance(state.time_secs) {
            apply_action(state, action);
        }
    }

    #[test]
    fn test_full_cycle() {
        let (mut state, id) = state_with_crumbler();

        on_landings(&mut state, &[id]);
        assert!(matches!(
            state.crumbles[&id].phase,
            CrumblePhase::Warning { .. }
        ));
        // Still solid through the warning
        assert!(state.platforms[id as usize].collidable);

        state.time_secs = CRUMBLE_WARN_SECS;
        fire_due(&mut state);
        assert!(!state.platforms[id as usize].collidable);
        assert_eq!(state.crumbles[&id].phase, CrumblePhase::Regenerating);

        state.time_secs = CRUMBLE_WARN_SECS + CRUMBLE_REGEN_SECS;
        fire_due(&mut state);
        let platform = &state.platforms[id as usize];
        assert!(platform.collidable && platform.active);
        assert_eq!(platform.alpha, 1.0);
        assert!(!state.crumbles.contains_key(&id));
    }

    #[test]
    fn test_landing_again_does_not_retrigger() {
        let (mut state, id) = state_with_crumbler();
        on_landings(&mut state, &[id]);
        let timers_before = state.timers.outstanding();
        // Bouncing on it during the warning changes nothing
        on_landings(&mut state, &[id]);
        assert_eq!(state.timers.outstanding(), timers_before);
    }

    #[test]
    fn test_stable_platform_is_ignored() {
        let mut state = GameState::new(1);
        let id = state.create_platform(0.0, 300.0, PLATFORM_W, false);
        on_landings(&mut state, &[id]);
        assert!(state.crumbles.is_empty());
        assert_eq!(state.timers.outstanding(), 0);
    }

    #[test]
    fn test_cycle_can_restart_after_regen() {
        let (mut state, id) = state_with_crumbler();
        on_landings(&mut state, &[id]);
        state.time_secs = CRUMBLE_WARN_SECS;
        fire_due(&mut state);
        state.time_secs = CRUMBLE_WARN_SECS + CRUMBLE_REGEN_SECS;
        fire_due(&mut state);

        on_landings(&mut state, &[id]);
        assert!(matches!(
            state.crumbles[&id].phase,
            CrumblePhase::Warning { .. }
        ));
    }

    #[test]
    fn test_stale_action_is_a_noop() {
        let (mut state, id) = state_with_crumbler();
        // No record exists, so a stray fire does nothing
        apply_action(&mut state, TimerAction::Collapse(id));
        assert!(state.platforms[id as usize].collidable);
    }

    #[test]
    fn test_warning_pulse_dims_alpha() {
        let (mut state, id) = state_with_crumbler();
        on_landings(&mut state, &[id]);
        state.time_secs = 0.13;
        update_warning_pulse(&mut state);
        let alpha = state.platforms[id as usize].alpha;
        assert!(alpha < 1.0 && alpha > 0.0);
    }
}
