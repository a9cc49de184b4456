#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Cat Bin headlessly with a scripted bot.

mod bot;

use std::{fs, path::PathBuf, thread, time::Duration};

use anyhow::{Context, Result};
use cat_bin_core::{Event, GameStatus, Tuning, WELCOME_BANNER};
use cat_bin_session::{Clock, ManualClock, MonotonicClock, Session};
use cat_bin_storage::{HighScoreStore, JsonFileStore, MemoryStore};
use cat_bin_system_encouragement::StaticEncouragement;
use cat_bin_world::query;
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::bot::Bot;

/// Interval between bot decisions.
const STEP: Duration = Duration::from_millis(100);

/// Command-line arguments accepted by the autoplay binary.
#[derive(Parser, Debug)]
#[command(author, version, about = "Plays Cat Bin headlessly with a scripted player")]
struct Args {
    /// TOML file overriding design constants
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// JSON file holding the leaderboard; kept in memory when omitted
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Seed for occupant spawning and the bot
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Seconds of simulated time to play at most
    #[arg(long, default_value_t = 120)]
    seconds: u64,

    /// Locale of the flavor text (`en` or `he`)
    #[arg(long, default_value = "en")]
    locale: String,

    /// Name recorded on the leaderboard
    #[arg(long, default_value = "Player")]
    player: String,

    /// Chance that the bot reacts to an open slot on each step
    #[arg(long, default_value_t = 0.35)]
    skill: f64,

    /// Pace the game against the wall clock instead of simulating instantly
    #[arg(long, default_value_t = false)]
    realtime: bool,

    /// Start with audio cues muted
    #[arg(long, default_value_t = false)]
    muted: bool,

    /// Log filter such as `debug` or `cat_bin_world=debug`; overrides `RUST_LOG`
    #[arg(long)]
    log_level: Option<String>,
}

/// Tallies gathered from the event stream while playing.
#[derive(Debug, Default)]
struct Tally {
    caught: u32,
    power_ups: u32,
    lives_lost: u32,
    levels_won: u32,
}

impl Tally {
    fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::OccupantCaught { .. } => self.caught += 1,
                Event::PowerUpActivated { .. } => self.power_ups += 1,
                Event::LifeLost { .. } => self.lives_lost += 1,
                Event::LevelWon { .. } => self.levels_won += 1,
                _ => {}
            }
        }
    }
}

/// Entry point for the Cat Bin command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref())?;

    let tuning = load_tuning(args.tuning.as_ref())?;
    println!("{WELCOME_BANNER}");

    if args.realtime {
        run(&args, tuning, MonotonicClock::new(), thread::sleep)
    } else {
        let clock = ManualClock::new();
        let handle = clock.clone();
        run(&args, tuning, clock, move |dt| handle.advance(dt))
    }
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
    Ok(())
}

fn load_tuning(path: Option<&PathBuf>) -> Result<Tuning> {
    let Some(path) = path else {
        return Ok(Tuning::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    Tuning::from_toml_str(&contents)
        .with_context(|| format!("failed to load tuning from {}", path.display()))
}

fn run<C: Clock>(args: &Args, tuning: Tuning, clock: C, mut wait: impl FnMut(Duration)) -> Result<()> {
    let store: Box<dyn HighScoreStore> = match &args.scores {
        Some(path) => Box::new(JsonFileStore::new(path)),
        None => Box::new(MemoryStore::new()),
    };
    let mut session = Session::new(
        tuning,
        clock,
        ChaCha8Rng::seed_from_u64(args.seed),
        store,
        Box::new(StaticEncouragement),
        args.locale.clone(),
    );
    let mut bot = Bot::new(args.seed.wrapping_add(1), args.skill);
    let mut tally = Tally::default();

    session.set_muted(args.muted);
    session.start_game();
    info!(seed = args.seed, seconds = args.seconds, "autoplay_started");

    let budget = Duration::from_secs(args.seconds);
    let mut played = Duration::ZERO;
    while played < budget {
        wait(STEP);
        played += STEP;
        session.pump();

        match session.status() {
            GameStatus::Playing => {
                let _ = bot.act(&mut session);
            }
            GameStatus::LevelWon => {
                let level = query::level(session.world());
                let line = session.flavor_text().unwrap_or_default().to_string();
                println!("level {level} complete: {line}");
                session.next_level();
            }
            GameStatus::Menu | GameStatus::Paused | GameStatus::GameOver => {
                tally.observe(&session.drain_events());
                break;
            }
        }
        tally.observe(&session.drain_events());
    }

    print_summary(&session, &tally, played);

    if session.status() == GameStatus::GameOver {
        let date = chrono::Local::now().format("%Y-%m-%d").to_string();
        match session.submit_high_score(&args.player, date) {
            Some(rank) => println!("new high score, rank {}", rank + 1),
            None => println!("score did not reach the leaderboard"),
        }
    }

    print_high_scores(&session);
    Ok(())
}

fn print_summary<C: Clock>(session: &Session<C, ChaCha8Rng>, tally: &Tally, played: Duration) {
    let world = session.world();
    println!(
        "status={:?} level={} score={} lives={} played={:.1}s",
        query::status(world),
        query::level(world),
        query::score(world),
        query::lives(world),
        played.as_secs_f64()
    );
    println!(
        "caught={} power_ups={} lives_lost={} levels_won={}",
        tally.caught, tally.power_ups, tally.lives_lost, tally.levels_won
    );
}

fn print_high_scores<C: Clock>(session: &Session<C, ChaCha8Rng>) {
    let board = session.high_scores();
    if board.is_empty() {
        println!("no high scores yet");
        return;
    }
    println!("high scores:");
    for (rank, entry) in board.entries().iter().enumerate() {
        println!(
            "{:>2}. {:<15} {:>6} {}",
            rank + 1,
            entry.name,
            entry.score,
            entry.date
        );
    }
}
