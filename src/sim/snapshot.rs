//! Read-only view of the simulation for renderers and HUDs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::EffectKind;
use super::level::LevelMode;
use super::pickups::PickupKind;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirdView {
    pub pos: Vec2,
    pub radius: f32,
    /// Hidden on this frame of the post-hit blink
    pub blinking: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeView {
    pub id: u32,
    pub x: f32,
    pub width: f32,
    /// Gap top with oscillation applied
    pub gap_top: f32,
    pub gap_height: f32,
    pub oscillation_phase: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupView {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub frame: u32,
}

/// Progress toward the current level's goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GoalProgress {
    Pipes {
        passed: u32,
        goal: u32,
    },
    Time {
        elapsed_secs: f64,
        goal_secs: f64,
        passed: u32,
        pipe_floor: u32,
    },
}

impl GoalProgress {
    /// Completion in `[0, 1]` for a progress bar
    pub fn fraction(&self) -> f64 {
        let f = match *self {
            GoalProgress::Pipes { passed, goal } => passed as f64 / goal.max(1) as f64,
            GoalProgress::Time {
                elapsed_secs,
                goal_secs,
                ..
            } => elapsed_secs / goal_secs.max(1.0),
        };
        f.clamp(0.0, 1.0)
    }
}

/// Remaining time on each effect (ms, 0 when inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTimers {
    pub immunity_ms: f64,
    pub autopilot_ms: f64,
    pub slow_motion_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    /// Floor of the accumulated score
    pub score: u64,
    pub combo: u32,
    pub health: u8,
    /// 1-based level number
    pub level: u32,
    pub goal: GoalProgress,
    pub effects: EffectTimers,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub clock_ms: f64,
    pub phase: GamePhase,
    pub bird: BirdView,
    pub pipes: Vec<PipeView>,
    pub pickups: Vec<PickupView>,
    pub particles: Vec<Vec2>,
    pub hud: Hud,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.clock_ms;
        let level = &state.level;

        let goal = match level.mode() {
            LevelMode::Pipes { goal } => GoalProgress::Pipes {
                passed: level.pipes_passed,
                goal,
            },
            LevelMode::Time {
                goal_secs,
                pipe_floor,
            } => {
                // The level clock only runs once play has begun
                let elapsed_secs = if state.phase == GamePhase::Ready {
                    0.0
                } else {
                    level.elapsed_secs(now)
                };
                GoalProgress::Time {
                    elapsed_secs,
                    goal_secs,
                    passed: level.pipes_passed,
                    pipe_floor,
                }
            }
        };

        Self {
            clock_ms: now,
            phase: state.phase,
            bird: BirdView {
                pos: state.bird.pos,
                radius: state.bird.radius,
                blinking: state.bird_blinking(now),
            },
            pipes: state
                .pipes
                .iter()
                .map(|p| PipeView {
                    id: p.id,
                    x: p.x,
                    width: p.width,
                    gap_top: p.gap_top(now),
                    gap_height: p.gap_height,
                    oscillation_phase: p.oscillation.map(|o| o.phase),
                })
                .collect(),
            pickups: state
                .pickups
                .iter()
                .map(|p| PickupView {
                    id: p.id,
                    kind: p.kind,
                    pos: p.pos,
                    frame: p.frame,
                })
                .collect(),
            particles: state.particles.iter().map(|p| p.pos).collect(),
            hud: Hud {
                score: state.score.max(0.0).floor() as u64,
                combo: state.combo,
                health: state.health,
                level: level.index + 1,
                goal,
                effects: EffectTimers {
                    immunity_ms: state.effects.remaining(EffectKind::Immunity, now),
                    autopilot_ms: state.effects.remaining(EffectKind::Autopilot, now),
                    slow_motion_ms: state.effects.remaining(EffectKind::SlowMotion, now),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::spawn_burst;
    use crate::sim::spawner::spawn_pipe;
    use crate::tuning::Difficulty;

    #[test]
    fn test_fresh_run_hud() {
        let state = GameState::new(1, Difficulty::Normal);
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.phase, GamePhase::Ready);
        assert_eq!(snap.hud.level, 1);
        assert_eq!(snap.hud.health, 5);
        assert_eq!(snap.hud.goal, GoalProgress::Pipes { passed: 0, goal: 10 });
        assert_eq!(snap.hud.effects, EffectTimers::default());
        assert!(snap.pipes.is_empty());
        assert!(!snap.bird.blinking);
    }

    #[test]
    fn test_score_is_floored() {
        let mut state = GameState::new(1, Difficulty::Normal);
        state.score = 41.95;
        assert_eq!(Snapshot::capture(&state).hud.score, 41);
    }

    #[test]
    fn test_pipes_and_particles_listed_in_order() {
        let mut state = GameState::new(2, Difficulty::Hard);
        state.clock_ms = 1500.0;
        spawn_pipe(&mut state);
        spawn_pipe(&mut state);
        spawn_burst(&mut state, 1500.0);

        let snap = Snapshot::capture(&state);
        assert_eq!(snap.pipes.len(), 2);
        assert!(snap.pipes[0].id < snap.pipes[1].id);
        assert_eq!(snap.pipes[0].gap_top, state.pipes[0].gap_top(1500.0));
        assert!(snap.pipes[0].oscillation_phase.is_some());
        assert_eq!(snap.particles.len(), state.particles.len());
    }

    #[test]
    fn test_timed_goal_progress() {
        let mut state = GameState::new(3, Difficulty::Easy);
        state.phase = GamePhase::Playing;
        state.level = crate::sim::level::LevelState::new(Difficulty::Easy, 1, 1000.0);
        state.clock_ms = 15_000.0;
        let goal = Snapshot::capture(&state).hud.goal;
        assert_eq!(
            goal,
            GoalProgress::Time {
                elapsed_secs: 14.0,
                goal_secs: 28.0,
                passed: 0,
                pipe_floor: 14
            }
        );
        assert_eq!(goal.fraction(), 0.5);
    }

    #[test]
    fn test_effect_timers_count_down() {
        let mut state = GameState::new(3, Difficulty::Easy);
        state.effects.apply(EffectKind::Autopilot, 0.0, 5000.0);
        state.clock_ms = 1200.0;
        let hud = Snapshot::capture(&state).hud;
        assert_eq!(hud.effects.autopilot_ms, 3800.0);
        assert_eq!(hud.effects.immunity_ms, 0.0);
    }
}
