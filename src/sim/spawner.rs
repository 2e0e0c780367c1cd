//! Procedural pipe spawning and scrolling

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GameState, Pipe, PipeOscillation};
use crate::consts::*;

/// Accumulated-time spawn trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipeSpawner {
    /// Time since the last spawn (ms, slow-motion scaled)
    pub elapsed_ms: f64,
    /// Jitter multiplier for the current interval, in `[1 - J, 1 + J)`
    pub jitter: f64,
}

impl PipeSpawner {
    pub fn new(rng: &mut Pcg32) -> Self {
        Self {
            elapsed_ms: 0.0,
            jitter: draw_jitter(rng),
        }
    }

    /// Interval the accumulator must reach before the next spawn
    pub fn target_ms(&self, base_interval_ms: f64) -> f64 {
        base_interval_ms * self.jitter
    }
}

fn draw_jitter(rng: &mut Pcg32) -> f64 {
    1.0 + rng.random_range(-SPAWN_JITTER..SPAWN_JITTER)
}

/// Inclusive-exclusive range the gap top is drawn from
pub fn gap_top_range(playfield_height: f32, gap_height: f32) -> (f32, f32) {
    let min_top = GAP_TOP_MARGIN;
    let max_top = (playfield_height - gap_height - GAP_BOTTOM_MARGIN).max(min_top);
    (min_top, max_top)
}

/// Emit one pipe at the right edge
pub fn spawn_pipe(state: &mut GameState) {
    let config = state.config();
    let gap_height = config.gap_height;
    let (min_top, max_top) = gap_top_range(state.playfield.height, gap_height);
    let base_top = if max_top > min_top {
        state.rng.random_range(min_top..max_top).floor()
    } else {
        min_top
    };

    let oscillation = config.oscillation.map(|osc| PipeOscillation {
        amplitude: osc.amplitude,
        speed: osc.speed,
        phase: state.rng.random_range(0.0..std::f32::consts::TAU),
    });

    let width = (BASE_PIPE_WIDTH * state.level.mods.pipe_width_mul).max(MIN_PIPE_WIDTH);
    let id = state.next_entity_id();
    state.pipes.push(Pipe {
        id,
        x: state.playfield.width + PIPE_SPAWN_OFFSET,
        base_top,
        gap_height,
        width,
        oscillation,
        passed: false,
    });
}

/// Advance the spawn accumulator and emit a pipe when the interval elapses
pub fn update_spawner(state: &mut GameState, dt_ms: f64) {
    state.spawner.elapsed_ms += dt_ms;
    let target = state.spawner.target_ms(state.level.mods.spawn_interval_ms);
    if state.spawner.elapsed_ms >= target {
        spawn_pipe(state);
        state.spawner.elapsed_ms = 0.0;
        state.spawner.jitter = draw_jitter(&mut state.rng);
    }
}

/// Scroll pipes left and drop the ones fully off-screen
pub fn scroll_pipes(state: &mut GameState, dt: f32) {
    let dx = state.level.mods.pipe_speed * dt;
    for pipe in &mut state.pipes {
        pipe.x -= dx;
    }
    state.pipes.retain(|p| p.right() > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Playfield;
    use crate::tuning::Difficulty;
    use proptest::prelude::*;

    #[test]
    fn test_jitter_within_bounds() {
        let mut state = GameState::new(7, Difficulty::Normal);
        for _ in 0..500 {
            let j = draw_jitter(&mut state.rng);
            assert!((0.88..1.12).contains(&j));
        }
    }

    #[test]
    fn test_spawns_once_interval_elapses() {
        let mut state = GameState::new(3, Difficulty::Normal);
        let target = state.spawner.target_ms(state.level.mods.spawn_interval_ms);
        update_spawner(&mut state, target - 1.0);
        assert!(state.pipes.is_empty());
        update_spawner(&mut state, 2.0);
        assert_eq!(state.pipes.len(), 1);
        assert_eq!(state.spawner.elapsed_ms, 0.0);
    }

    #[test]
    fn test_spawned_pipe_geometry() {
        let mut state = GameState::new(11, Difficulty::Normal);
        spawn_pipe(&mut state);
        let pipe = &state.pipes[0];
        assert_eq!(pipe.x, 980.0);
        assert_eq!(pipe.width, 60.0);
        assert_eq!(pipe.gap_height, 160.0);
        assert!(pipe.oscillation.is_none());
        assert!(!pipe.passed);
    }

    #[test]
    fn test_hard_pipes_oscillate() {
        let mut state = GameState::new(11, Difficulty::Hard);
        spawn_pipe(&mut state);
        let osc = state.pipes[0].oscillation.unwrap();
        assert_eq!(osc.amplitude, 32.0);
        assert!((0.0..std::f32::consts::TAU).contains(&osc.phase));
    }

    #[test]
    fn test_width_respects_minimum() {
        let mut state = GameState::new(1, Difficulty::Easy);
        state.level.mods.pipe_width_mul = 0.1;
        spawn_pipe(&mut state);
        assert_eq!(state.pipes[0].width, MIN_PIPE_WIDTH);
    }

    #[test]
    fn test_scroll_culls_offscreen() {
        let mut state = GameState::new(1, Difficulty::Normal);
        spawn_pipe(&mut state);
        state.pipes[0].x = -55.0;
        scroll_pipes(&mut state, 0.05);
        assert!(state.pipes.is_empty());
    }

    proptest! {
        #[test]
        fn prop_gap_within_margins(
            seed in any::<u64>(),
            level in 0u32..40,
            difficulty in prop::sample::select(Difficulty::ALL.to_vec()),
            height in 450u32..900,
        ) {
            let height = height as f32;
            let field = Playfield::new(960.0, height).unwrap();
            let mut state = GameState::with_playfield(seed, difficulty, field);
            state.level = crate::sim::level::LevelState::new(difficulty, level, 0.0);
            for _ in 0..20 {
                spawn_pipe(&mut state);
            }
            // Margins bound the drawn baseline; a hard pipe's live gap swings
            // up to `amplitude` around it and may cross them
            for pipe in &state.pipes {
                prop_assert!(pipe.base_top >= GAP_TOP_MARGIN);
                prop_assert!(pipe.base_top + pipe.gap_height <= height - GAP_BOTTOM_MARGIN);
            }
        }

        #[test]
        fn prop_live_gap_stays_within_amplitude(
            seed in any::<u64>(),
            now in 0.0f64..600_000.0,
        ) {
            let mut state = GameState::new(seed, Difficulty::Hard);
            spawn_pipe(&mut state);
            let pipe = &state.pipes[0];
            let amplitude = pipe.oscillation.map_or(0.0, |o| o.amplitude);
            prop_assert!(amplitude > 0.0);
            prop_assert!((pipe.gap_top(now) - pipe.base_top).abs() <= amplitude + 1e-3);
        }
    }
}
