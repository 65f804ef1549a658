//! Yonmoque Hex: rules and search engine for a two-player hex-grid strategy game.
//!
//! Players place pieces from a reserve or slide pieces already on the board.
//! A piece landing by movement flips every opponent run it flanks. Four in a
//! row formed by a movement wins; five or more in a row loses.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, evaluation weights and search parameters
//! - [`board`] - Hexagonal cell graph with color zones
//! - [`state`] - Game state, moves and move execution
//! - [`flip`] - Flanking capture
//! - [`movegen`] - Legal move generation (placement and sliding)
//! - [`eval`] - Line detection, static evaluation and terminal detection
//! - [`minimax`] - Alpha-beta minimax search
//! - [`mcts`] - Monte Carlo Tree Search with UCT
//! - [`playout`] - Guided rollouts for MCTS
//! - [`game`] - Match driver for computer-vs-computer games
//! - [`config`] - Engine and match configuration
//! - [`protocol`] - Text protocol for graphical front ends
//!
//! ## Example
//!
//! ```
//! use yonmoque_hex::board::build_board;
//! use yonmoque_hex::minimax::best_move;
//! use yonmoque_hex::state::{apply_move, GameState, Player};
//!
//! let state = GameState::new(build_board(5).unwrap());
//! let mut rng = fastrand::Rng::with_seed(7);
//!
//! let mv = best_move(&state, Player::First, 2, &mut rng).unwrap();
//! let state = apply_move(&state, mv, Player::First);
//! println!("Player 1 plays {mv}\n{state}");
//! ```

pub mod board;
pub mod config;
pub mod constants;
pub mod eval;
pub mod flip;
pub mod game;
pub mod mcts;
pub mod minimax;
pub mod movegen;
pub mod playout;
pub mod protocol;
pub mod state;
