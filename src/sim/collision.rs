//! Collision detection and damage response
//!
//! Everything here is axis-aligned except pickups, which use circle overlap.
//! A step samples invulnerability against the step's clock value; because a
//! hit stamps `last_hit_ms` with that same value, at most one hit can land
//! per step.

use glam::Vec2;
use rand::Rng;

use super::physics::BoundsContact;
use super::pickups::apply_effect;
use super::scoring::{next_combo, pass_award};
use super::state::{Bird, GameEvent, GamePhase, GameState, HitCause, Particle, Pipe};
use crate::circles_overlap;
use crate::consts::*;

/// Particles per hit burst
pub const BURST_PARTICLES: usize = 24;
const BURST_MIN_SPEED: f32 = 120.0;
const BURST_MAX_SPEED: f32 = 360.0;
/// Burst drifts left with the scrolling world
const BURST_X_BIAS: f32 = -80.0;
const PARTICLE_GRAVITY: f32 = 400.0;
const PARTICLE_LIFE_MS: f64 = 600.0;

/// Bird edges strictly inside the pipe's gap
pub fn within_gap(bird: &Bird, pipe: &Pipe, now: f64) -> bool {
    let gap_top = pipe.gap_top(now);
    bird.top() > gap_top && bird.bottom() < gap_top + pipe.gap_height
}

/// Horizontal span overlap
pub fn overlaps_horizontally(bird: &Bird, pipe: &Pipe) -> bool {
    bird.right() > pipe.x && bird.left() < pipe.right()
}

/// Bird touches either barrier of the pipe
pub fn hits_pipe(bird: &Bird, pipe: &Pipe, now: f64) -> bool {
    overlaps_horizontally(bird, pipe) && !within_gap(bird, pipe, now)
}

/// Bird center between gap top and gap bottom (used for pass scoring)
pub fn center_in_gap(bird: &Bird, pipe: &Pipe, now: f64) -> bool {
    let gap_top = pipe.gap_top(now);
    (gap_top..=gap_top + pipe.gap_height).contains(&bird.pos.y)
}

/// Resolve bounds and pipe contacts, then mark passes
pub fn resolve_collisions(state: &mut GameState, contact: BoundsContact, now: f64) {
    if contact.any() && !state.is_invulnerable(now) {
        let cause = if contact.ground {
            HitCause::Ground
        } else {
            HitCause::Ceiling
        };
        register_hit(state, cause, now);
    }

    for i in 0..state.pipes.len() {
        let pipe = &state.pipes[i];
        let touching = hits_pipe(&state.bird, pipe, now);
        let crossed = !pipe.passed && pipe.right() < state.bird.left();
        let centered = center_in_gap(&state.bird, pipe, now);

        if touching && !state.is_invulnerable(now) {
            register_hit(state, HitCause::Pipe, now);
        }

        if crossed {
            state.pipes[i].passed = true;
            if centered {
                state.combo = next_combo(state.combo);
                let award = pass_award(state.config().pipe_score, state.combo);
                state.add_score(award);
                state.level.pipes_passed += 1;
                let combo = state.combo;
                state.emit(GameEvent::PipePassed { combo, award });
            } else {
                state.combo = 0;
                state.emit(GameEvent::PipeMissed);
            }
        }
    }
}

/// Apply one hit: damage, knockback, combo reset and a feedback burst.
///
/// Reaching zero health moves the run to `GameOver` and raises the event once.
pub fn register_hit(state: &mut GameState, cause: HitCause, now: f64) {
    state.health = state.health.saturating_sub(1);
    state.last_hit_ms = now;
    state.bird.vel_y = state.bird.vel_y.min(HIT_KNOCKBACK);
    state.combo = 0;
    spawn_burst(state, now);

    let health = state.health;
    log::info!("Hit by {:?}, health {}", cause, health);
    state.emit(GameEvent::Hit { cause, health });

    if health == 0 && state.phase != GamePhase::GameOver {
        state.phase = GamePhase::GameOver;
        let score = state.score;
        log::info!(
            "Game over: score {:.0}, level {}",
            score,
            state.level.index + 1
        );
        state.emit(GameEvent::GameOver { score });
    }
}

/// Collect every pickup the bird overlaps
pub fn collect_pickups(state: &mut GameState, now: f64) {
    let bird_pos = state.bird.pos;
    let bird_radius = state.bird.radius;

    let mut collected = Vec::new();
    state.pickups.retain(|p| {
        if circles_overlap(bird_pos, bird_radius, p.pos, p.radius) {
            collected.push(p.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        apply_effect(state, kind, now);
    }
}

/// Radial burst at the bird
pub fn spawn_burst(state: &mut GameState, now: f64) {
    let origin = state.bird.pos;
    for _ in 0..BURST_PARTICLES {
        let angle = state.fx_rng.random_range(0.0..std::f32::consts::TAU);
        let speed = state.fx_rng.random_range(BURST_MIN_SPEED..BURST_MAX_SPEED);
        state.particles.push(Particle {
            pos: origin,
            vel: Vec2::new(angle.cos() * speed + BURST_X_BIAS, angle.sin() * speed),
            born_ms: now,
            life_ms: PARTICLE_LIFE_MS,
        });
    }

    let excess = state.particles.len().saturating_sub(MAX_PARTICLES);
    if excess > 0 {
        state.particles.drain(..excess);
    }
}

/// Move particles under gravity and drop expired ones
pub fn update_particles(state: &mut GameState, dt: f32, now: f64) {
    for p in &mut state.particles {
        p.vel.y += PARTICLE_GRAVITY * dt;
        p.pos += p.vel * dt;
    }
    state.particles.retain(|p| now - p.born_ms < p.life_ms);
}
