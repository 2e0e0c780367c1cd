//! Score rules: combo-scaled pass awards, autopilot trickle, level-clear bonus

use super::pickups::{PickupEffect, PickupKind};
use crate::consts::COMBO_MAX;

/// Score added every step while autopilot is active
pub const AUTOPILOT_TRICKLE: f64 = 0.05;
/// Fixed part of the level-clear bonus
pub const LEVEL_CLEAR_BASE: f64 = 10.0;

/// Combo after one more clean pass
pub fn next_combo(combo: u32) -> u32 {
    (combo + 1).min(COMBO_MAX)
}

/// `base * (1 + (combo - 1) * 0.5)`, with `combo` already incremented
pub fn pass_award(base_score: f64, combo: u32) -> f64 {
    let combo = combo.clamp(1, COMBO_MAX);
    base_score * (1.0 + (combo - 1) as f64 * 0.5)
}

/// Flat score for collecting a pickup (0 for non-score kinds)
pub fn pickup_award(kind: PickupKind) -> f64 {
    match kind.effect() {
        PickupEffect::Score(points) => points as f64,
        _ => 0.0,
    }
}

/// Bonus for clearing level `level_index` after `pipes_passed` clean passes
pub fn level_clear_bonus(pipes_passed: u32, level_index: u32) -> f64 {
    LEVEL_CLEAR_BASE + pipes_passed as f64 * 1.5 + level_index as f64 * 5.0
}
