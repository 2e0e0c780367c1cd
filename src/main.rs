//! Flappy Arcade - headless runner
//!
//! Plays one seeded run with the idle bot at 60 fps and prints the final
//! score submission as JSON.
//!
//! Usage: `flappy-arcade [--settings FILE] [--leaderboard FILE] [--seed N]
//! [--difficulty easy|normal|hard] [--max-frames N]`

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use flappy_arcade::{
    Difficulty, Leaderboard, LeaderboardQuery, ScoreSubmission, Settings,
    sim::{GameEvent, Snapshot, TickInput, tick},
};

/// 60 fps frame delta (ms)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after ten simulated minutes
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u64 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(name = "flappy-arcade")]
#[command(about = "Play one seeded flappy run with the idle bot")]
#[command(version)]
struct Args {
    /// Settings JSON file
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Leaderboard JSON file to record the finished run in
    #[arg(short, long)]
    leaderboard: Option<PathBuf>,

    /// Run seed (overrides settings)
    #[arg(long)]
    seed: Option<u64>,

    /// Difficulty: easy, normal or hard (overrides settings)
    #[arg(short, long)]
    difficulty: Option<String>,

    /// Frames to simulate before giving up
    #[arg(long, default_value_t = MAX_FRAMES)]
    max_frames: u64,
}

#[cfg(not(target_arch = "wasm32"))]
impl Args {
    /// Settings file (or defaults) with command-line overrides applied
    fn resolve_settings(&self) -> flappy_arcade::Result<Settings> {
        let mut settings = match &self.settings {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(name) = &self.difficulty {
            settings.difficulty = name.parse::<Difficulty>()?;
        }
        Ok(settings)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy Arcade (headless) starting...");

    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is driven by the embedding page on wasm
}

#[cfg(not(target_arch = "wasm32"))]
fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &Args) -> flappy_arcade::Result<()> {
    let settings = args.resolve_settings()?;
    let mut state = settings.new_run(clock_seed())?;
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut frames = 0;
    while !state.is_game_over() && frames < args.max_frames {
        tick(&mut state, &input, FRAME_MS);
        for event in &state.events {
            if let GameEvent::PickupCollected { kind } = event {
                log::info!("Collected {:?}", kind);
            }
        }
        frames += 1;
    }

    let snapshot = Snapshot::capture(&state);
    log::info!(
        "Stopped after {} frames: level {} ({:.0}% of goal), score {}, health {}",
        frames,
        snapshot.hud.level,
        snapshot.hud.goal.fraction() * 100.0,
        snapshot.hud.score,
        snapshot.hud.health
    );

    if !state.is_game_over() {
        println!("{}", serde_json::to_string(&snapshot.hud)?);
        return Ok(());
    }

    let submission = ScoreSubmission::from_finished_run(&state, &settings.player_name)?;
    println!("{}", submission.to_json()?);

    if let Some(path) = &args.leaderboard {
        let mut board = Leaderboard::load_or_default(path);
        let rank = board.insert(submission.clone());
        board.save(path)?;
        log::info!("Ranked #{} overall", rank);
        if let Some(best) = board.top_score(Some(submission.difficulty)) {
            println!("Best on {}: {}", submission.difficulty, best);
        }
        let query = LeaderboardQuery::for_difficulty(submission.difficulty);
        for (i, entry) in board.query(&query).iter().enumerate() {
            println!("{:>3}. {:<20} {:>8}", i + 1, entry.name, entry.score);
        }
    }

    Ok(())
}
