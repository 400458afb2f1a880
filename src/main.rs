//! Bat Hunter headless driver
//!
//! Plays one session on a simulated clock with a scripted shooter, then
//! records the score on the JSON leaderboard.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use bat_hunter::feedback::LogFeedback;
use bat_hunter::leaderboard::{JsonFileStore, LeaderboardService};
use bat_hunter::sim::{GeometryHitTest, HitOutcome, PcgSource, SessionController};
use bat_hunter::{DifficultyLevel, GameSettings};

/// Simulation step for the headless clock
const FRAME_MS: u64 = 50;
/// How often the scripted shooter pulls the trigger
const SHOT_INTERVAL_MS: u64 = 400;

#[derive(Parser, Debug)]
#[command(name = "bat-hunter", about = "Run a headless Bat Hunter session")]
struct Cli {
    /// EASY, MEDIUM or HARD (overrides settings)
    #[arg(short, long)]
    difficulty: Option<String>,

    /// RNG seed for spawns and the shooter (overrides settings)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Settings JSON file
    #[arg(long, default_value = "bat_hunter_settings.json")]
    settings: PathBuf,

    /// Leaderboard JSON file
    #[arg(long, default_value = "bat_hunter_leaderboard.json")]
    leaderboard: PathBuf,

    /// Name recorded on the leaderboard
    #[arg(short, long, default_value = "Hunter")]
    player: String,

    /// Chance that a shot is aimed at a live target
    #[arg(short, long, default_value_t = 0.7)]
    accuracy: f32,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match GameSettings::load(&cli.settings) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(name) = &cli.difficulty {
        match DifficultyLevel::parse(name) {
            Ok(level) => settings.difficulty = level,
            Err(e) => {
                eprintln!("error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    let seed = cli.seed.or(settings.seed).unwrap_or_else(rand::random);
    log::info!("Bat Hunter (headless) seed={} difficulty={}", seed, settings.difficulty);

    let level = settings.difficulty;
    let mut controller = SessionController::new(
        settings.clone(),
        Box::new(GeometryHitTest),
        Box::new(LogFeedback::new(settings.sound_enabled, settings.vibration_enabled)),
        Box::new(PcgSource::new(seed)),
    );
    controller.start_level(level, 0);

    let mut shooter = Pcg32::seed_from_u64(seed ^ 0x5eed);
    let accuracy = cli.accuracy.clamp(0.0, 1.0);
    let (mut hits, mut misses) = (0u32, 0u32);

    let mut now = 0;
    let summary = loop {
        now += FRAME_MS;
        if let Some(summary) = controller.on_tick(now) {
            break summary;
        }

        if now % SHOT_INTERVAL_MS == 0 {
            let aim = aim(&controller, now, accuracy, &mut shooter);
            match controller.on_hit_attempt(aim, now) {
                HitOutcome::Hit { .. } => hits += 1,
                HitOutcome::Miss { .. } => misses += 1,
                HitOutcome::Ignored => {}
            }
            if let Some(summary) = controller.summary() {
                break summary.clone();
            }
        }
    };

    println!(
        "{} session over ({:?}): score {} | kills {} | shots {} hit / {} missed | {}s left",
        summary.difficulty,
        summary.reason,
        summary.score,
        summary.targets_killed,
        hits,
        misses,
        summary.time_left_ms / 1000
    );

    let mut service = LeaderboardService::new(JsonFileStore::new(&cli.leaderboard));
    let board = match service.save_score(&cli.player, summary.score) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("\nTop {}:", board.len());
    for (i, entry) in board.iter().enumerate() {
        println!(
            "{:>2}. {:<15} {:>6}  {}",
            i + 1,
            entry.player_name,
            entry.score,
            entry.date.format("%Y-%m-%d")
        );
    }

    ExitCode::SUCCESS
}

/// Pick a tap position: on a live target with probability `accuracy`, else anywhere
fn aim(controller: &SessionController, now: u64, accuracy: f32, rng: &mut Pcg32) -> Vec2 {
    let playfield = controller.settings().playfield;
    let targets = &controller.state().live_targets;

    if !targets.is_empty() && rng.random::<f32>() < accuracy {
        let target = &targets[rng.random_range(0..targets.len())];
        let jitter = controller.profile().target_size * 0.3;
        let offset = Vec2::new(
            rng.random_range(-jitter..=jitter),
            rng.random_range(-jitter..=jitter),
        );
        return target.position(now, &playfield, controller.profile()) + offset;
    }

    Vec2::new(
        rng.random_range(0.0..playfield.width),
        rng.random_range(0.0..playfield.height),
    )
}
