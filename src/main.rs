//! Quoridor-Rust: command-line driver for the decision engine.
//!
//! ## Usage
//!
//! - `quoridor-rust` - Show a demo
//! - `quoridor-rust protocol` - Serve the text protocol on stdin/stdout
//! - `quoridor-rust selfplay --games 4` - Let the engine play itself
//! - `quoridor-rust demo` - Play a short engine-vs-engine game
//!
//! The transposition cache is loaded once at start-up and written back
//! once at exit unless `--no-cache` is given.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};

use quoridor_rust::constants::DEFAULT_CACHE_PATH;
use quoridor_rust::movegen::play;
use quoridor_rust::pathfind::distance_to_goal;
use quoridor_rust::playout::self_play;
use quoridor_rust::position::{PlayerId, PositionState};
use quoridor_rust::protocol::ProtocolEngine;
use quoridor_rust::search::{Difficulty, SearchConfig, SearchEngine};
use quoridor_rust::store::TranspositionStore;

/// Quoridor-Rust: a 9x9 wall-placement race engine
#[derive(Parser)]
#[command(name = "quoridor-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Transposition cache file
    #[arg(long, global = true, default_value = DEFAULT_CACHE_PATH)]
    cache: PathBuf,

    /// Neither load nor save the transposition cache
    #[arg(long, global = true)]
    no_cache: bool,

    /// Engine strength
    #[arg(long, global = true, value_enum, default_value_t = DifficultyArg::Hard)]
    difficulty: DifficultyArg,

    /// Fixed search depth in plies instead of the adaptive policy
    #[arg(long, global = true)]
    depth: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    Easy,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the line protocol for use with a front end
    Protocol,
    /// Let the engine play itself from random openings
    Selfplay {
        /// Number of games
        #[arg(long, default_value_t = 1)]
        games: usize,
        /// Random plies before the engine takes over
        #[arg(long, default_value_t = 4)]
        opening_plies: usize,
        /// Abandon a game after this many plies
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
        /// Seed for the random openings
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a short demo game
    Demo,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = SearchConfig {
        difficulty: cli.difficulty.into(),
        pruning: true,
        max_depth: cli.depth,
    };
    let store = if cli.no_cache {
        TranspositionStore::new()
    } else {
        TranspositionStore::load(&cli.cache)
    };
    let engine = SearchEngine::with_store(config, store);

    let store = match cli.command {
        Some(Commands::Protocol) => {
            let mut session = ProtocolEngine::with_engine(engine);
            session.run().context("protocol session failed")?;
            session.into_store()
        }
        Some(Commands::Selfplay {
            games,
            opening_plies,
            max_plies,
            seed,
        }) => run_selfplay(engine, games, opening_plies, max_plies, seed),
        Some(Commands::Demo) | None => run_demo(engine),
    };

    if !cli.no_cache {
        if let Err(e) = store.save(&cli.cache) {
            warn!("could not save transposition cache: {e}");
        } else {
            let (children, evaluations, optimal) = store.sizes();
            info!(
                "saved transposition cache to {}: {children} children, {evaluations} evaluations, {optimal} optimal",
                cli.cache.display()
            );
        }
    }
    Ok(())
}

fn run_selfplay(
    mut engine: SearchEngine,
    games: usize,
    opening_plies: usize,
    max_plies: usize,
    seed: Option<u64>,
) -> TranspositionStore {
    let mut rng = match seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    };

    let mut wins = [0usize; 2];
    for game in 1..=games {
        let record = self_play(&mut engine, &mut rng, opening_plies, max_plies);
        let result = match record.winner {
            Some(p) => {
                wins[p.index()] += 1;
                format!("{p} wins")
            }
            None => "unfinished".to_string(),
        };
        println!("game {game}: {} plies, {result}", record.actions.len());
    }
    println!("player 1: {} wins, player 2: {} wins", wins[0], wins[1]);
    engine.into_store()
}

fn run_demo(mut engine: SearchEngine) -> TranspositionStore {
    println!("Quoridor-Rust: 9x9 Wall-Placement Race Engine\n");

    let mut state = PositionState::new(false);
    println!("{state}");

    for ply in 1..=12 {
        let Some(action) = engine.get_action(&state) else {
            break;
        };
        let mover = state.current_player();
        if !play(&mut state, action) {
            warn!("engine chose illegal action {action}");
            break;
        }
        println!("ply {ply}: {mover} plays {action}");
        if state.is_over() {
            break;
        }
    }

    println!("\n{state}");
    for p in PlayerId::BOTH {
        let dist = distance_to_goal(&state, p).map_or_else(|| "-".to_string(), |d| d.to_string());
        println!("{p}: distance {dist}, {} barriers left", state.remaining(p));
    }
    engine.into_store()
}
