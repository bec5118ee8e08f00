//! Fixed-timestep simulation step
//!
//! One call advances the world by exactly one substep. Phase order is fixed:
//! input, integration, crumble triggers, timer firing, prebuild, cull, then
//! derived state. Callers own the accumulator loop and clamp it with
//! `MAX_SUBSTEPS`.

use super::crumble;
use super::physics;
use super::schedule;
use super::state::{BackgroundBlend, GameEvent, GameState};
use crate::consts::*;

/// Edge-sampled input held for one substep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the simulation by one fixed substep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.tick_count += 1;
    state.time_secs += dt as f64;

    // Input and motion timers
    if state.player.apply_input(input, dt) {
        state.events.push(GameEvent::Jumped);
    }

    // Integration and contacts
    let contacts = {
        let GameState {
            player, platforms, ..
        } = state;
        physics::step(&mut player.body, platforms, dt)
    };
    state.player.settle(&contacts);

    if state.player.body.pos.y > FALL_RESET_Y {
        state.player.reset_to_spawn();
    }

    // Crumble transitions, then deferred work
    crumble::on_landings(state, &contacts.supporting);
    crumble::update_warning_pulse(state);
    for action in state.timers.advance(state.time_secs) {
        crumble::apply_action(state, action);
    }

    // World maintenance around the player's new position
    schedule::ensure_prebuilt(state);
    schedule::cull(state);

    collect_carrots(state);
    update_score(state);
    update_background(state);
}

fn collect_carrots(state: &mut GameState) {
    let body = state.player.body;
    for carrot in &mut state.carrots {
        if !carrot.active || carrot.collected {
            continue;
        }
        let dx = (body.pos.x - carrot.pos.x).abs();
        let dy = (body.pos.y - carrot.pos.y).abs();
        if dx < body.half.x + CARROT_HALF_W && dy < body.half.y + CARROT_HALF_H {
            carrot.collected = true;
            carrot.active = false;
            state.carrot_score += CARROT_SCORE;
            state.events.push(GameEvent::CarrotCollected {
                carrot_score: state.carrot_score,
            });
        }
    }
}

fn update_score(state: &mut GameState) {
    state.height.observe(state.player.body.pos.y);
    let score = (state.height.max_height, state.total_score());
    if score != state.last_score {
        state.last_score = score;
        state.events.push(GameEvent::ScoreChanged {
            height: score.0,
            total: score.1,
        });
    }
}

fn update_background(state: &mut GameState) {
    // Follows the player's current altitude, not the best height, so the
    // cityscape comes back on the way down
    let blend = BackgroundBlend::for_height(crate::height_meters(state.player.body.pos.y));
    if blend != state.background {
        state.background = blend;
        state.events.push(GameEvent::BackgroundChanged { blend });
    }
}
