//! Timed status effects granted by pickups
//!
//! Each effect is a single absolute expiry on the simulation clock. Extending
//! an effect takes the later of the current expiry and `now + duration`, so
//! picking up a second copy refreshes the window instead of stacking it.

use serde::{Deserialize, Serialize};

/// Effect kinds tracked by the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Damage suppression, same as the post-hit window
    Immunity,
    /// Vertical steering toward the next gap
    Autopilot,
    /// Halves the simulation delta
    SlowMotion,
}

/// Expiry timestamps (ms on the simulation clock)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectClock {
    pub immunity_until: f64,
    pub autopilot_until: f64,
    pub slow_motion_until: f64,
}

impl EffectClock {
    fn slot(&mut self, kind: EffectKind) -> &mut f64 {
        match kind {
            EffectKind::Immunity => &mut self.immunity_until,
            EffectKind::Autopilot => &mut self.autopilot_until,
            EffectKind::SlowMotion => &mut self.slow_motion_until,
        }
    }

    pub fn expiry(&self, kind: EffectKind) -> f64 {
        match kind {
            EffectKind::Immunity => self.immunity_until,
            EffectKind::Autopilot => self.autopilot_until,
            EffectKind::SlowMotion => self.slow_motion_until,
        }
    }

    /// Grant or extend an effect
    pub fn apply(&mut self, kind: EffectKind, now: f64, duration_ms: f64) {
        let slot = self.slot(kind);
        *slot = slot.max(now + duration_ms);
    }

    pub fn is_active(&self, kind: EffectKind, now: f64) -> bool {
        now < self.expiry(kind)
    }

    /// Milliseconds left on an effect (0 when inactive)
    pub fn remaining(&self, kind: EffectKind, now: f64) -> f64 {
        (self.expiry(kind) - now).max(0.0)
    }
}
