//! Runtime configuration for matches and front ends.
//!
//! Engines are configured by kind and difficulty preset; presets map to a
//! minimax depth or an MCTS iteration budget (see [`crate::constants`]).

use clap::ValueEnum;
use thiserror::Error;

use crate::constants::{DIFFICULTY_DEPTH, DIFFICULTY_ITERATIONS, MAX_SIZE, MIN_SIZE};
use crate::game::Strategy;

/// Search algorithm used by a computer player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    Minimax,
    Mcts,
}

/// Strength preset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn index(self) -> usize {
        self as usize
    }

    /// Minimax search depth for this preset.
    pub fn depth(self) -> u32 {
        DIFFICULTY_DEPTH[self.index()]
    }

    /// MCTS iteration budget for this preset.
    pub fn iterations(self) -> usize {
        DIFFICULTY_ITERATIONS[self.index()]
    }
}

/// A computer player: which engine, how strong.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AgentConfig {
    pub engine: EngineKind,
    pub difficulty: Difficulty,
}

impl AgentConfig {
    pub fn strategy(&self) -> Strategy {
        match self.engine {
            EngineKind::Minimax => Strategy::Minimax {
                depth: self.difficulty.depth(),
            },
            EngineKind::Mcts => Strategy::Mcts {
                iterations: self.difficulty.iterations(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board size {0} must be odd and between {MIN_SIZE} and {MAX_SIZE}")]
    InvalidSize(usize),
    #[error("turn cap must be at least 1")]
    ZeroTurns,
}

/// Check that `size` is a board size front ends offer: odd, `MIN_SIZE..=MAX_SIZE`.
pub fn validate_size(size: usize) -> Result<(), ConfigError> {
    if !(MIN_SIZE..=MAX_SIZE).contains(&size) || size % 2 == 0 {
        return Err(ConfigError::InvalidSize(size));
    }
    Ok(())
}

/// Settings for a computer-vs-computer match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    pub size: usize,
    /// Agents for player 1 and player 2.
    pub agents: [AgentConfig; 2],
    pub max_turns: usize,
    pub seed: Option<u64>,
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_size(self.size)?;
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        Ok(())
    }
}
