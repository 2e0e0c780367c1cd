//! Frame-driven simulation tick
//!
//! Core game loop that advances the simulation deterministically. Each call
//! samples the clock once, then runs every component in a fixed order.

use serde::{Deserialize, Serialize};

use super::collision::{collect_pickups, resolve_collisions, update_particles};
use super::effects::EffectKind;
use super::level::{advance_transition, check_level_goal};
use super::physics::{clamp_to_bounds, flap, integrate, next_pipe, steer_toward};
use super::pickups::{ensure_population, update_pickups};
use super::scoring::AUTOPILOT_TRICKLE;
use super::spawner::{scroll_pipes, update_spawner};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Idle bot flaps once it sinks this far below its target (px)
const IDLE_DEADBAND: f32 = 10.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Flap (click/tap/space)
    pub flap: bool,
    /// Idle/demo mode - a bot flaps instead of the player
    pub idle_mode: bool,
}

/// Sanitize a raw frame delta: non-finite or negative becomes 0, long gaps
/// are capped at `MAX_FRAME_MS`
pub fn clamp_frame_ms(elapsed_ms: f64) -> f64 {
    if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
        0.0
    } else {
        elapsed_ms.min(MAX_FRAME_MS)
    }
}

/// Vertical target for steering: the next gap, or mid-field without one
fn steering_target(state: &GameState, now: f64) -> f32 {
    next_pipe(&state.pipes, state.bird.pos.x)
        .map(|p| p.gap_center(now))
        .unwrap_or(state.playfield.height / 2.0)
}

fn idle_wants_flap(state: &GameState, now: f64) -> bool {
    match state.phase {
        GamePhase::Ready => true,
        GamePhase::Playing => {
            let target = steering_target(state, now);
            state.bird.pos.y > target + IDLE_DEADBAND && state.bird.vel_y > 0.0
        }
        _ => false,
    }
}

/// Advance the game state by one frame of `elapsed_ms` wall time
pub fn tick(state: &mut GameState, input: &TickInput, elapsed_ms: f64) {
    state.events.clear();
    let frame_ms = clamp_frame_ms(elapsed_ms);
    state.clock_ms += frame_ms;
    let now = state.clock_ms;

    let mut input = *input;
    if input.idle_mode {
        input.flap = idle_wants_flap(state, now);
    }

    let dt_ms = if state.effects.is_active(EffectKind::SlowMotion, now) {
        frame_ms * SLOW_MOTION_SCALE
    } else {
        frame_ms
    };
    let dt = (dt_ms / 1000.0) as f32;

    match state.phase {
        GamePhase::GameOver => return,
        GamePhase::Ready => {
            if !input.flap {
                return;
            }
            state.phase = GamePhase::Playing;
            state.level.start_ms = now;
            log::info!("Run started (seed {}, {})", state.seed, state.difficulty);
            state.emit(GameEvent::RunStarted);
        }
        GamePhase::Transitioning { .. } => {
            advance_transition(state, now);
            update_particles(state, dt, now);
            return;
        }
        GamePhase::Playing => {}
    }

    let config = state.config();
    let mods = state.level.mods;

    // Bird
    if input.flap {
        flap(&mut state.bird, config.flap_impulse);
        state.emit(GameEvent::Flap);
    }
    if state.effects.is_active(EffectKind::Autopilot, now) {
        let target = steering_target(state, now);
        steer_toward(&mut state.bird, target);
        state.add_score(AUTOPILOT_TRICKLE);
    }
    integrate(&mut state.bird, mods.gravity, dt);
    let ground_y = state.playfield.ground_y();
    let contact = clamp_to_bounds(&mut state.bird, ground_y);

    // World
    update_spawner(state, dt_ms);
    scroll_pipes(state, dt);
    ensure_population(state, dt_ms, now);
    update_pickups(state, dt, now);

    // Contacts; knockback can push the bird back out of bounds
    resolve_collisions(state, contact, now);
    clamp_to_bounds(&mut state.bird, ground_y);
    if !state.is_game_over() {
        collect_pickups(state, now);
    }
    update_particles(state, dt, now);

    check_level_goal(state, now);
}
