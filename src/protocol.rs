//! Line-based text protocol for graphical front ends.
//!
//! The protocol follows the shape of GTP: one command per line, optionally
//! prefixed by a numeric id. Successful replies start with `=`, failures with
//! `?`, and every reply is followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`, `list_commands`, `known_command <cmd>`, `quit`
//! - `boardsize <n>` - Start a new game on an `n x n` board (odd, 5 to 9)
//! - `clear_board` - Start a new game on the current board
//! - `showboard` - Render the board (`-` empty, `1`/`2` owner) and reserves
//! - `reserve` - Remaining reserve of both players
//! - `legal_moves <player>` - Space separated legal moves
//! - `play <player> <move>` - Apply a move, e.g. `play 1 12` or `play 2 7-13`
//! - `genmove <player>` - Let the engine choose, apply and print a move
//! - `engine minimax <depth>` / `engine mcts <iterations>` - Select the search
//! - `final_status` - `ongoing` or `winner <player>`
//!
//! ## Example
//!
//! ```ignore
//! use yonmoque_hex::{board::build_board, game::Strategy, protocol::ProtocolEngine};
//! let board = build_board(5)?;
//! let mut engine = ProtocolEngine::new(board, Strategy::Minimax { depth: 3 }, None);
//! engine.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{self, BufRead, Write};

use fastrand::Rng;
use thiserror::Error;
use tracing::warn;

use crate::board::{build_board, Board, BoardError};
use crate::config::{validate_size, ConfigError};
use crate::eval::winner;
use crate::game::Strategy;
use crate::movegen::generate_moves;
use crate::state::{apply_move, parse_move, GameState, Move, ParseMoveError, Player};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "engine",
    "final_status",
    "genmove",
    "known_command",
    "legal_moves",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "reserve",
    "showboard",
    "version",
];

/// A failed command. The message is sent back after `?`.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("missing argument")]
    MissingArgument,
    #[error("invalid argument '{0}'")]
    InvalidArgument(String),
    #[error("invalid move: {0}")]
    InvalidMove(#[from] ParseMoveError),
    #[error("illegal move {0}")]
    IllegalMove(Move),
    #[error("no legal moves")]
    NoLegalMoves,
    #[error("game is over")]
    GameOver,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Protocol engine state.
pub struct ProtocolEngine {
    state: GameState,
    strategy: Strategy,
    rng: Rng,
}

impl ProtocolEngine {
    /// Create an engine for a fresh game on `board`.
    /// A `seed` makes every `genmove` reproducible.
    pub fn new(board: Board, strategy: Strategy, seed: Option<u64>) -> Self {
        Self {
            state: GameState::new(board),
            strategy,
            rng: seed.map_or_else(Rng::new, Rng::with_seed),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!(error = %e, "failed to read command");
                    break;
                }
            };

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (prefix, message) = match self.execute(&command, args) {
                Ok(body) => ('=', body),
                Err(e) => ('?', e.to_string()),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return the reply body.
    pub fn execute(&mut self, command: &str, args: &[&str]) -> Result<String, ProtocolError> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("1".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = arg(args, 0)?.to_lowercase();
                Ok(KNOWN_COMMANDS.contains(&cmd.as_str()).to_string())
            }

            "quit" => Ok(String::new()),

            "boardsize" => {
                let size = parse_number::<usize>(arg(args, 0)?)?;
                validate_size(size)?;
                self.state = GameState::new(build_board(size)?);
                Ok(String::new())
            }

            "clear_board" => {
                self.state = GameState::new(self.state.board().clone());
                Ok(String::new())
            }

            "showboard" => Ok(format!("\n{}", self.state)),

            "reserve" => Ok(format!(
                "{} {}",
                self.state.reserve(Player::First),
                self.state.reserve(Player::Second)
            )),

            "legal_moves" => {
                let player = parse_player(arg(args, 0)?)?;
                let moves = generate_moves(&self.state, player, None);
                Ok(join_moves(&moves))
            }

            "play" => {
                let player = parse_player(arg(args, 0)?)?;
                let mv = parse_move(arg(args, 1)?, self.state.board())?;
                self.ensure_ongoing()?;
                if !generate_moves(&self.state, player, None).contains(&mv) {
                    return Err(ProtocolError::IllegalMove(mv));
                }
                self.state = apply_move(&self.state, mv, player);
                Ok(String::new())
            }

            "genmove" => {
                let player = parse_player(arg(args, 0)?)?;
                self.ensure_ongoing()?;
                let mv = self
                    .strategy
                    .choose_move(&self.state, player, &mut self.rng)
                    .ok_or(ProtocolError::NoLegalMoves)?;
                self.state = apply_move(&self.state, mv, player);
                Ok(mv.to_string())
            }

            "engine" => {
                let kind = arg(args, 0)?.to_lowercase();
                let value = arg(args, 1)?;
                self.strategy = match kind.as_str() {
                    "minimax" => Strategy::Minimax {
                        depth: parse_number(value)?,
                    },
                    "mcts" => Strategy::Mcts {
                        iterations: parse_number(value)?,
                    },
                    _ => return Err(ProtocolError::InvalidArgument(kind)),
                };
                Ok(self.strategy.to_string())
            }

            "final_status" => Ok(match winner(&self.state) {
                Some(player) => format!("winner {player}"),
                None => "ongoing".to_string(),
            }),

            _ => Err(ProtocolError::UnknownCommand(command.to_string())),
        }
    }

    fn ensure_ongoing(&self) -> Result<(), ProtocolError> {
        match winner(&self.state) {
            Some(_) => Err(ProtocolError::GameOver),
            None => Ok(()),
        }
    }
}

fn arg<'a>(args: &[&'a str], index: usize) -> Result<&'a str, ProtocolError> {
    args.get(index).copied().ok_or(ProtocolError::MissingArgument)
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, ProtocolError> {
    s.parse().map_err(|_| ProtocolError::InvalidArgument(s.to_string()))
}

/// Players are written one-based: `1` or `2`.
fn parse_player(s: &str) -> Result<Player, ProtocolError> {
    s.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(Player::from_index)
        .ok_or_else(|| ProtocolError::InvalidArgument(s.to_string()))
}

fn join_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
