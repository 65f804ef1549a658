//! Match driver for computer-vs-computer games.
//!
//! A [`Match`] owns the authoritative game state, asks each side's
//! [`Strategy`] for a move, applies it, and judges the result independently
//! of the search.

use std::fmt;
use std::time::{Duration, Instant};

use fastrand::Rng;
use tracing::info;

use crate::board::Board;
use crate::eval::winner;
use crate::mcts::best_move_mcts;
use crate::minimax::best_move;
use crate::state::{apply_move, GameState, Move, Player};

/// How a computer player picks its moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    Minimax { depth: u32 },
    Mcts { iterations: usize },
}

impl Strategy {
    /// Returns `None` if `player` has no legal move.
    pub fn choose_move(&self, state: &GameState, player: Player, rng: &mut Rng) -> Option<Move> {
        match *self {
            Strategy::Minimax { depth } => best_move(state, player, depth, rng),
            Strategy::Mcts { iterations } => best_move_mcts(state, player, iterations, rng),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Minimax { depth } => write!(f, "minimax(depth={depth})"),
            Strategy::Mcts { iterations } => write!(f, "mcts(iterations={iterations})"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    /// Stalemate (side to move has no legal move) or turn cap reached.
    Draw,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(player) => write!(f, "Player {player} wins"),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

/// One entry of the move log.
#[derive(Copy, Clone, Debug)]
pub struct MoveRecord {
    /// Zero-based turn number
    pub turn: usize,
    pub player: Player,
    pub mv: Move,
    /// Time spent choosing the move
    pub elapsed: Duration,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs_f64();
        match self.mv {
            Move::Placement(cell) => write!(
                f,
                "{}. Player {} placed at cell {cell}, took {secs:.2} seconds",
                self.turn + 1,
                self.player
            ),
            Move::Movement { from, to } => write!(
                f,
                "{}. Player {} moved from cell {from} to {to}, took {secs:.2} seconds",
                self.turn + 1,
                self.player
            ),
        }
    }
}

/// A game between two strategies. Player 1 (`Player::First`) moves first.
pub struct Match {
    state: GameState,
    strategies: [Strategy; 2],
    to_move: Player,
    max_turns: usize,
    log: Vec<MoveRecord>,
    outcome: Option<Outcome>,
}

impl Match {
    pub fn new(board: Board, strategies: [Strategy; 2], max_turns: usize) -> Self {
        Self {
            state: GameState::new(board),
            strategies,
            to_move: Player::First,
            max_turns,
            log: Vec::new(),
            outcome: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn to_move(&self) -> Player {
        self.to_move
    }

    pub fn log(&self) -> &[MoveRecord] {
        &self.log
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Play one turn. Returns the outcome once the game is over.
    pub fn step(&mut self, rng: &mut Rng) -> Option<Outcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        if self.log.len() >= self.max_turns {
            info!(turns = self.log.len(), "turn cap reached");
            return self.finish(Outcome::Draw);
        }

        let player = self.to_move;
        let strategy = self.strategies[player.index()];
        let start = Instant::now();
        let Some(mv) = strategy.choose_move(&self.state, player, rng) else {
            info!(%player, "no legal moves");
            return self.finish(Outcome::Draw);
        };
        let elapsed = start.elapsed();

        self.state = apply_move(&self.state, mv, player);
        let record = MoveRecord {
            turn: self.log.len(),
            player,
            mv,
            elapsed,
        };
        info!(turn = record.turn, %player, %mv, %strategy, ?elapsed, "move played");
        self.log.push(record);

        if let Some(w) = winner(&self.state) {
            return self.finish(Outcome::Win(w));
        }
        self.to_move = player.opponent();
        None
    }

    /// Play until the game is over.
    pub fn play(&mut self, rng: &mut Rng) -> Outcome {
        loop {
            if let Some(outcome) = self.step(rng) {
                return outcome;
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Option<Outcome> {
        info!(%outcome, turns = self.log.len(), "game over");
        self.outcome = Some(outcome);
        self.outcome
    }
}
