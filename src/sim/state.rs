//! Game state and core simulation types
//!
//! `GameState` is the single simulation context: one controller owns it and
//! hands it by `&mut` to the step functions. Every timestamp in here is on
//! the simulation clock (`clock_ms`), never wall time.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{EffectClock, EffectKind};
use super::level::LevelState;
use super::pickups::{Pickup, PickupKind};
use super::spawner::PipeSpawner;
use crate::consts::*;
use crate::error::{GameError, Result};
use crate::tuning::{Difficulty, DifficultyConfig};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// World frozen until the first flap
    Ready,
    /// Active gameplay
    Playing,
    /// Between levels; `since_ms` is when the current stage began
    Transitioning { stage: TransitionStage, since_ms: f64 },
    /// Run ended, only `GameState::reset` leaves this
    GameOver,
}

/// The two timed stages of a level transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionStage {
    /// Bonus awarded, old level still shown
    Cleared,
    /// New level computed, waiting to resume
    Starting,
}

/// Playfield dimensions (px)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let field = Self { width, height };
        field.validate()?;
        Ok(field)
    }

    pub fn validate(&self) -> Result<()> {
        let ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width >= MIN_PLAYFIELD_WIDTH
            && self.height >= MIN_PLAYFIELD_HEIGHT;
        if ok {
            Ok(())
        } else {
            Err(GameError::InvalidPlayfield {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Y of the ground line
    pub fn ground_y(&self) -> f32 {
        self.height - GROUND_MARGIN
    }

    /// Fixed horizontal position of the bird
    pub fn bird_x(&self) -> f32 {
        (self.width * BIRD_X_FRACTION).floor().max(BIRD_MIN_X)
    }
}

/// The controlled entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    /// Vertical velocity (px/s, positive = down)
    pub vel_y: f32,
    pub radius: f32,
}

impl Bird {
    pub fn new(playfield: &Playfield, radius: f32) -> Self {
        Self {
            pos: Vec2::new(playfield.bird_x(), playfield.height / 2.0),
            vel_y: 0.0,
            radius,
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.radius
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.radius
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// Per-pipe oscillation, phase drawn at spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeOscillation {
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
}

/// An obstacle: upper and lower barrier around a vertical gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Gap top before oscillation
    pub base_top: f32,
    pub gap_height: f32,
    pub width: f32,
    pub oscillation: Option<PipeOscillation>,
    /// Set once the trailing edge is behind the bird
    pub passed: bool,
}

impl Pipe {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Oscillation offset at the given clock time
    pub fn offset(&self, now_ms: f64) -> f32 {
        match self.oscillation {
            Some(osc) => {
                let t = (now_ms / 1000.0) as f32;
                (osc.phase + t * osc.speed).sin() * osc.amplitude
            }
            None => 0.0,
        }
    }

    /// Current gap top (oscillation applied)
    pub fn gap_top(&self, now_ms: f64) -> f32 {
        self.base_top + self.offset(now_ms)
    }

    pub fn gap_center(&self, now_ms: f64) -> f32 {
        self.gap_top(now_ms) + self.gap_height / 2.0
    }
}

/// A cosmetic particle (hit feedback burst)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub born_ms: f64,
    pub life_ms: f64,
}

/// What the bird ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitCause {
    Ground,
    Ceiling,
    Pipe,
}

/// Discrete things that happened during the last step, for the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    Flap,
    Hit { cause: HitCause, health: u8 },
    PipePassed { combo: u32, award: f64 },
    PipeMissed,
    PickupCollected { kind: PickupKind },
    EffectGranted { kind: EffectKind, until_ms: f64 },
    LevelCleared { level_index: u32, bonus: f64 },
    LevelStarted { level_index: u32 },
    GameOver { score: f64 },
}

/// Last-hit timestamp for a bird that has never been hit
const NEVER_HIT_MS: f64 = -1.0e9;

/// Seed offset for the cosmetic RNG stream
const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub difficulty: Difficulty,
    pub playfield: Playfield,
    /// Gameplay RNG (spawner, pickups)
    pub rng: Pcg32,
    /// Cosmetic RNG (particles), kept apart so effects never shift gameplay draws
    pub fx_rng: Pcg32,
    /// Simulation clock (ms), sampled once per step
    pub clock_ms: f64,
    pub phase: GamePhase,
    pub bird: Bird,
    /// Live pipes in spawn order
    pub pipes: Vec<Pipe>,
    /// Live pickups in spawn order
    pub pickups: Vec<Pickup>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub effects: EffectClock,
    pub spawner: PipeSpawner,
    /// Force-spawn cooldown for the pickup population (ms)
    pub pickup_cooldown_ms: f64,
    pub health: u8,
    pub last_hit_ms: f64,
    pub combo: u32,
    /// Accumulated score, fractional while autopilot trickles
    pub score: f64,
    pub level: LevelState,
    /// Events raised by the most recent step
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new run on the default playfield
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self::with_playfield(seed, difficulty, Playfield::default())
    }

    pub fn with_playfield(seed: u64, difficulty: Difficulty, playfield: Playfield) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawner = PipeSpawner::new(&mut rng);
        let level = LevelState::new(difficulty, 0, 0.0);
        let bird = Bird::new(&playfield, level.mods.bird_radius);
        Self {
            seed,
            difficulty,
            playfield,
            rng,
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            clock_ms: 0.0,
            phase: GamePhase::Ready,
            bird,
            pipes: Vec::new(),
            pickups: Vec::new(),
            particles: Vec::new(),
            effects: EffectClock::default(),
            spawner,
            pickup_cooldown_ms: 0.0,
            health: MAX_HEALTH,
            last_hit_ms: NEVER_HIT_MS,
            combo: 0,
            score: 0.0,
            level,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Start over with a new seed, keeping difficulty and playfield
    pub fn reset(&mut self, seed: u64) {
        log::info!("Run reset (seed {}, {})", seed, self.difficulty);
        *self = Self::with_playfield(seed, self.difficulty, self.playfield);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn config(&self) -> DifficultyConfig {
        self.difficulty.config()
    }

    /// Inside the post-hit window or holding immunity
    pub fn is_invulnerable(&self, now: f64) -> bool {
        now - self.last_hit_ms < INVULN_MS || self.effects.is_active(EffectKind::Immunity, now)
    }

    /// Blink toggles every 100ms during the post-hit window
    pub fn bird_blinking(&self, now: f64) -> bool {
        now - self.last_hit_ms < INVULN_MS && ((now / 100.0).floor() as i64) % 2 == 0
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn emit(&mut self, event: GameEvent) {
        log::debug!("{:?}", event);
        self.events.push(event);
    }

    /// Score add that keeps the total monotonic
    pub fn add_score(&mut self, amount: f64) {
        if amount > 0.0 {
            self.score += amount;
        }
    }
}
