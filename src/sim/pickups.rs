//! Pickup lifecycle: population control, hover/fall motion, culling and
//! effect application.
//!
//! A pickup enters from the right in **hover** mode, bobbing on a sine wave
//! around its spawn baseline while horizontal drag slows it. It drops into
//! **fall** mode once it is close to the bird or has used 60% of its TTL.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::effects::EffectKind;
use super::scoring::pickup_award;
use super::state::{GameEvent, GameState};
use crate::consts::MAX_HEALTH;

/// Pickup collision radius
pub const PICKUP_RADIUS: f32 = 14.0;
/// Time-to-live before the grace period starts (ms)
pub const PICKUP_TTL_MS: f64 = 14_000.0;
/// Extra lifetime after TTL before forced removal (ms)
pub const PICKUP_GRACE_MS: f64 = 2_500.0;
/// Fraction of TTL after which hovering ends
pub const HOVER_TTL_FRACTION: f64 = 0.6;
/// Horizontal distance ahead of the bird that triggers a fall
pub const NEAR_TRIGGER_X: f32 = 50.0;
/// Fall acceleration and terminal speed (px/s², px/s)
pub const FALL_GRAVITY: f32 = 120.0;
pub const FALL_TERMINAL_SPEED: f32 = 280.0;
/// Horizontal drag while hovering (fraction per second)
pub const HOVER_DRAG: f32 = 0.12;
/// Pickups enter this far past the right edge
pub const SPAWN_OFFSET_X: f32 = 30.0;
/// Force-spawn cooldown (ms)
pub const FORCE_SPAWN_COOLDOWN_MS: f64 = 900.0;
/// Probabilistic spawn rate per ms at displayed level 0
pub const SPAWN_RATE_PER_MS: f64 = 0.0009;

/// Population always topped up to this many
pub const MIN_PICKUPS: usize = 4;

/// Upper bound on the probabilistic population for a level
pub fn max_pickups(level_index: u32) -> usize {
    (3 + level_index as usize / 2).min(8)
}

/// Pickup variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Heart,
    DiamondBlue,
    DiamondGreen,
    DiamondRed,
    Angel,
    Disc,
    Tortoise,
}

/// What collecting a pickup does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickupEffect {
    Heal(u8),
    Score(u32),
    Timed { kind: EffectKind, duration_ms: f64 },
}

impl PickupKind {
    pub const ALL: [PickupKind; 7] = [
        PickupKind::Heart,
        PickupKind::DiamondBlue,
        PickupKind::DiamondGreen,
        PickupKind::DiamondRed,
        PickupKind::Angel,
        PickupKind::Disc,
        PickupKind::Tortoise,
    ];

    /// First displayed level (1-based) this kind can appear on
    pub fn unlock_level(&self) -> u32 {
        match self {
            PickupKind::Heart | PickupKind::DiamondBlue => 1,
            PickupKind::DiamondGreen => 2,
            PickupKind::DiamondRed => 3,
            PickupKind::Angel => 4,
            PickupKind::Disc => 5,
            PickupKind::Tortoise => 6,
        }
    }

    pub fn effect(&self) -> PickupEffect {
        match self {
            PickupKind::Heart => PickupEffect::Heal(1),
            PickupKind::DiamondBlue => PickupEffect::Score(25),
            PickupKind::DiamondGreen => PickupEffect::Score(50),
            PickupKind::DiamondRed => PickupEffect::Score(100),
            PickupKind::Angel => PickupEffect::Timed {
                kind: EffectKind::Immunity,
                duration_ms: 6000.0,
            },
            PickupKind::Disc => PickupEffect::Timed {
                kind: EffectKind::Autopilot,
                duration_ms: 5000.0,
            },
            PickupKind::Tortoise => PickupEffect::Timed {
                kind: EffectKind::SlowMotion,
                duration_ms: 5000.0,
            },
        }
    }

    /// Sprite sheet frame count
    pub fn frames(&self) -> u32 {
        match self {
            PickupKind::Heart
            | PickupKind::DiamondBlue
            | PickupKind::DiamondGreen
            | PickupKind::DiamondRed => 6,
            PickupKind::Angel | PickupKind::Disc | PickupKind::Tortoise => 8,
        }
    }

    /// Animation rate (frames per second)
    pub fn fps(&self) -> f64 {
        match self {
            PickupKind::Heart => 10.0,
            PickupKind::Angel => 8.0,
            PickupKind::Disc => 16.0,
            PickupKind::DiamondBlue
            | PickupKind::DiamondGreen
            | PickupKind::DiamondRed
            | PickupKind::Tortoise => 12.0,
        }
    }
}

/// Kinds unlocked on a level (0-based index)
pub fn pool_for_level(level_index: u32) -> Vec<PickupKind> {
    let displayed = level_index + 1;
    PickupKind::ALL
        .into_iter()
        .filter(|k| k.unlock_level() <= displayed)
        .collect()
}

/// Motion phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickupMotion {
    /// Sinusoidal bob around `base_y`
    Hover {
        base_y: f32,
        amplitude: f32,
        omega: f32,
        phase: f32,
    },
    /// Falling under `FALL_GRAVITY`
    Fall,
}

/// A pickup entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub motion: PickupMotion,
    pub born_ms: f64,
    pub ttl_ms: f64,
    /// Current animation frame
    pub frame: u32,
    pub last_frame_ms: f64,
}

impl Pickup {
    pub fn age(&self, now: f64) -> f64 {
        now - self.born_ms
    }

    pub fn is_hovering(&self) -> bool {
        matches!(self.motion, PickupMotion::Hover { .. })
    }

    fn advance_animation(&mut self, now: f64) {
        if now - self.last_frame_ms > 1000.0 / self.kind.fps() {
            self.frame = (self.frame + 1) % self.kind.frames();
            self.last_frame_ms = now;
        }
    }
}

/// Draw a kind from the level's unlocked pool
pub fn choose_kind(state: &mut GameState) -> PickupKind {
    let pool = pool_for_level(state.level.index);
    pool[state.rng.random_range(0..pool.len())]
}

/// Spawn a pickup of `kind` at the right edge
pub fn spawn_pickup(state: &mut GameState, kind: PickupKind, now: f64) {
    let rng = &mut state.rng;
    let omega = 2.0 + rng.random::<f32>() * 2.0;
    let amplitude = 6.0 + rng.random::<f32>() * 8.0;
    let base_y = 70.0 + rng.random::<f32>() * (state.playfield.height - 200.0);
    let vx = -(90.0 + rng.random::<f32>() * 80.0);
    let phase = rng.random::<f32>() * std::f32::consts::TAU;

    let id = state.next_entity_id();
    state.pickups.push(Pickup {
        id,
        kind,
        pos: Vec2::new(state.playfield.width + SPAWN_OFFSET_X, base_y),
        vel: Vec2::new(vx, 0.0),
        radius: PICKUP_RADIUS,
        motion: PickupMotion::Hover {
            base_y,
            amplitude,
            omega,
            phase,
        },
        born_ms: now,
        ttl_ms: PICKUP_TTL_MS,
        frame: 0,
        last_frame_ms: now,
    });
}

/// Keep the population within its level-dependent bounds.
///
/// Below the minimum a pickup is forced in whenever the cooldown allows; below
/// the maximum another may appear with probability proportional to `dt_ms`.
pub fn ensure_population(state: &mut GameState, dt_ms: f64, now: f64) {
    state.pickup_cooldown_ms = (state.pickup_cooldown_ms - dt_ms).max(0.0);

    if state.pickups.len() < MIN_PICKUPS && state.pickup_cooldown_ms <= 0.0 {
        let kind = choose_kind(state);
        spawn_pickup(state, kind, now);
        state.pickup_cooldown_ms = FORCE_SPAWN_COOLDOWN_MS;
    }

    if state.pickups.len() < max_pickups(state.level.index) {
        let displayed = (state.level.index + 1) as f64;
        let chance = SPAWN_RATE_PER_MS * (1.0 + 0.25 * displayed) * dt_ms;
        if state.rng.random::<f64>() < chance {
            let kind = choose_kind(state);
            spawn_pickup(state, kind, now);
        }
    }
}

/// Move, animate and cull pickups
pub fn update_pickups(state: &mut GameState, dt: f32, now: f64) {
    let bird_x = state.bird.pos.x;
    for pickup in &mut state.pickups {
        pickup.pos.x += pickup.vel.x * dt;
        let age = pickup.age(now);

        match pickup.motion {
            PickupMotion::Hover {
                base_y,
                amplitude,
                omega,
                phase,
            } => {
                let near_bird = pickup.pos.x - bird_x < NEAR_TRIGGER_X;
                let t = (age / 1000.0) as f32;
                pickup.pos.y = base_y + amplitude * (phase + t * omega).sin();
                pickup.vel.x *= 1.0 - HOVER_DRAG * dt;
                if near_bird || age > pickup.ttl_ms * HOVER_TTL_FRACTION {
                    pickup.motion = PickupMotion::Fall;
                }
            }
            PickupMotion::Fall => {
                pickup.vel.y = (pickup.vel.y + FALL_GRAVITY * dt).min(FALL_TERMINAL_SPEED);
                pickup.pos.y += pickup.vel.y * dt;
            }
        }

        pickup.advance_animation(now);
    }

    let floor = state.playfield.height + 40.0;
    state.pickups.retain(|p| {
        let offscreen = p.pos.x < -60.0 || p.pos.y > floor;
        let expired = p.age(now) > p.ttl_ms + PICKUP_GRACE_MS;
        !(offscreen || expired)
    });
}

/// Apply a collected pickup's effect
pub fn apply_effect(state: &mut GameState, kind: PickupKind, now: f64) {
    match kind.effect() {
        PickupEffect::Heal(amount) => {
            state.health = state.health.saturating_add(amount).min(MAX_HEALTH);
        }
        PickupEffect::Score(_) => state.add_score(pickup_award(kind)),
        PickupEffect::Timed {
            kind: effect,
            duration_ms,
        } => {
            state.effects.apply(effect, now, duration_ms);
            let until_ms = state.effects.expiry(effect);
            state.emit(GameEvent::EffectGranted {
                kind: effect,
                until_ms,
            });
        }
    }
    state.emit(GameEvent::PickupCollected { kind });
}
