//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One clock sample per tick, clamped frame deltas
//! - Seeded RNG only (cosmetic particles draw from their own stream)
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod level;
pub mod physics;
pub mod pickups;
pub mod scoring;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use effects::{EffectClock, EffectKind};
pub use level::{LevelMode, LevelState};
pub use pickups::{Pickup, PickupEffect, PickupKind, PickupMotion};
pub use snapshot::{GoalProgress, Hud, Snapshot};
pub use state::{
    Bird, GameEvent, GamePhase, GameState, HitCause, Particle, Pipe, Playfield, TransitionStage,
};
pub use tick::{TickInput, clamp_frame_ms, tick};
