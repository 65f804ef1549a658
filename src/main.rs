//! Yonmoque Hex engine front end.
//!
//! ## Usage
//!
//! - `yonmoque-hex` - Show a demo
//! - `yonmoque-hex selfplay` - Play a computer-vs-computer match
//! - `yonmoque-hex protocol` - Start the text protocol server for GUI integration
//! - `yonmoque-hex demo` - Run the demo

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use fastrand::Rng;
use tracing::info;

use yonmoque_hex::board::build_board;
use yonmoque_hex::config::{AgentConfig, Difficulty, EngineKind, MatchConfig};
use yonmoque_hex::constants::{DEFAULT_DEPTH, DEFAULT_MAX_TURNS, DEFAULT_SIZE};
use yonmoque_hex::game::{Match, Strategy};
use yonmoque_hex::protocol::ProtocolEngine;

/// Yonmoque Hex: rules and search engine
#[derive(Parser)]
#[command(name = "yonmoque-hex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a computer-vs-computer match and print the move log
    Selfplay(SelfplayArgs),
    /// Start the text protocol server for use with GUI applications
    Protocol {
        /// Board size
        #[arg(long, default_value_t = DEFAULT_SIZE)]
        size: usize,
        /// Minimax search depth used by genmove
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        depth: u32,
        /// Seed for reproducible move choice
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run a short demo of the engine
    Demo,
}

#[derive(Args)]
struct SelfplayArgs {
    /// Board size (odd, 5 to 9)
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    size: usize,
    /// Engine for player 1
    #[arg(long, value_enum, default_value_t = EngineKind::Minimax)]
    first: EngineKind,
    /// Difficulty for player 1
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    first_difficulty: Difficulty,
    /// Engine for player 2
    #[arg(long, value_enum, default_value_t = EngineKind::Mcts)]
    second: EngineKind,
    /// Difficulty for player 2
    #[arg(long, value_enum, default_value_t = Difficulty::Medium)]
    second_difficulty: Difficulty,
    /// Turns before the match is declared a draw
    #[arg(long, default_value_t = DEFAULT_MAX_TURNS)]
    max_turns: usize,
    /// Seed for reproducible matches
    #[arg(long)]
    seed: Option<u64>,
}

impl From<SelfplayArgs> for MatchConfig {
    fn from(args: SelfplayArgs) -> Self {
        MatchConfig {
            size: args.size,
            agents: [
                AgentConfig {
                    engine: args.first,
                    difficulty: args.first_difficulty,
                },
                AgentConfig {
                    engine: args.second,
                    difficulty: args.second_difficulty,
                },
            ],
            max_turns: args.max_turns,
            seed: args.seed,
        }
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Selfplay(args)) => run_selfplay(args.into()),
        Some(Commands::Protocol { size, depth, seed }) => {
            let board = build_board(size).context("building board")?;
            let mut engine = ProtocolEngine::new(board, Strategy::Minimax { depth }, seed);
            info!(size, depth, "protocol server started");
            engine
                .run(std::io::stdin().lock(), std::io::stdout())
                .context("protocol I/O failed")
        }
        Some(Commands::Demo) | None => run_demo(),
    }
}

fn run_selfplay(config: MatchConfig) -> Result<()> {
    config.validate().context("invalid match configuration")?;
    let board = build_board(config.size).context("building board")?;
    let strategies = config.agents.map(|agent| agent.strategy());
    let mut rng = config.seed.map_or_else(Rng::new, Rng::with_seed);

    println!(
        "Player 1: {}  Player 2: {}  Board: {}x{}\n",
        strategies[0], strategies[1], config.size, config.size
    );
    let mut game = Match::new(board, strategies, config.max_turns);
    let outcome = game.play(&mut rng);

    for record in game.log() {
        println!("{record}");
    }
    println!("\n{outcome}\n\n{}", game.state());
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Yonmoque Hex: rules and search engine\n");

    println!("=== Board Zones ===");
    let board = build_board(DEFAULT_SIZE).context("building board")?;
    println!("{board}");

    println!("=== Easy Minimax vs Easy MCTS ===");
    let strategies = [
        Strategy::Minimax {
            depth: Difficulty::Easy.depth(),
        },
        Strategy::Mcts {
            iterations: Difficulty::Easy.iterations(),
        },
    ];
    let mut game = Match::new(board, strategies, 40);
    let outcome = game.play(&mut Rng::with_seed(2024));
    for record in game.log() {
        println!("{record}");
    }
    println!("\n{outcome}\n\n{}", game.state());
    Ok(())
}
