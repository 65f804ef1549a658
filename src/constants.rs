//! Constants for board dimensions, evaluation weights, and search parameters.
//!
//! This module contains all the compile-time defaults for the engine. Runtime
//! choices (board size, engines, difficulty) are made through [`crate::config`].

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN). The standard game is played on 5x5.
pub const DEFAULT_SIZE: usize = 5;

/// Smallest supported board. Sizes must also be odd so the board has a center cell.
pub const MIN_SIZE: usize = 5;

/// Largest board offered by front ends.
pub const MAX_SIZE: usize = 9;

/// Number of neighbor directions of a hexagonal cell.
pub const DIRECTIONS: usize = 6;

// =============================================================================
// Pieces
// =============================================================================

/// Pieces each player holds in reserve at the start of a game.
pub const INITIAL_STOCK: u8 = 6;

/// Length of a winning line (formed by a move, never by a placement).
pub const WIN_LENGTH: usize = 4;

/// Length at which a line becomes a loss for the player completing it.
pub const OVERLINE_LENGTH: usize = 5;

// =============================================================================
// Evaluation
// =============================================================================

/// Score magnitude of a decided game. Dominates any heuristic difference.
pub const WIN_SCORE: f64 = 100_000.0;

/// Value of a piece's longest run, indexed by `run length - 1`.
/// Longer runs are not in the table and are worth nothing.
pub const LINE_VALUES: [f64; 5] = [1.0, 10.0, 100.0, 1000.0, -10_000.0];

/// Bonus for having just moved a piece (penalty if the opponent did).
pub const MOVE_NUDGE: f64 = 0.5;

/// Penalty for having just placed a piece (bonus if the opponent did).
pub const PLACEMENT_NUDGE: f64 = 0.2;

// =============================================================================
// Minimax Parameters
// =============================================================================

/// Default alpha-beta search depth.
pub const DEFAULT_DEPTH: u32 = 3;

// =============================================================================
// MCTS (Monte Carlo Tree Search) Parameters
// =============================================================================

/// Default number of MCTS iterations per move.
pub const DEFAULT_ITERATIONS: usize = 50;

/// UCT exploration constant.
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Maximum number of plies played in a single rollout.
pub const ROLLOUT_STEPS: usize = 100;

/// Probability of playing a uniformly random move in a rollout.
pub const ROLLOUT_EPSILON: f64 = 0.3;

// =============================================================================
// Match Parameters
// =============================================================================

/// Turn cap after which a self-play match is declared a draw.
pub const DEFAULT_MAX_TURNS: usize = 200;

/// Minimax depth for the Easy, Medium and Hard presets.
pub const DIFFICULTY_DEPTH: [u32; 3] = [1, 2, 3];

/// MCTS iterations for the Easy, Medium and Hard presets.
pub const DIFFICULTY_ITERATIONS: [usize; 3] = [25, 50, 100];
