//! Guided rollouts (game simulation) for MCTS.
//!
//! A rollout alternates turns from a leaf state until the game ends or the
//! step cap is reached. Each step:
//! - plays a move that wins on the spot for the side to move, if there is one,
//! - otherwise plays a random move with probability ε,
//! - otherwise plays the move with the best static score for the root player.
//!
//! The rollout winner is decided by the sign of the final static score.

use fastrand::Rng;

use crate::eval::{evaluate, winner};
use crate::mcts::MctsConfig;
use crate::movegen::generate_moves;
use crate::state::{apply_move, GameState, Move, Player};

/// Moves from `moves` after which `player` has won.
pub fn winning_moves(state: &GameState, player: Player, moves: &[Move]) -> Vec<Move> {
    moves
        .iter()
        .copied()
        .filter(|&mv| winner(&apply_move(state, mv, player)) == Some(player))
        .collect()
}

/// Pick a uniformly random element. `items` must not be empty.
#[inline]
pub(crate) fn choose<T: Copy>(items: &[T], rng: &mut Rng) -> T {
    items[rng.usize(..items.len())]
}

/// Play out the game from `state` with `turn` to move.
///
/// Returns the winner as judged from `root_player`'s static score: the root
/// player if it is positive, the opponent otherwise.
pub fn rollout(
    state: &GameState,
    turn: Player,
    root_player: Player,
    config: &MctsConfig,
    rng: &mut Rng,
) -> Player {
    let mut sim = state.clone();
    let mut turn = turn;

    if winner(&sim).is_none() {
        for _ in 0..config.rollout_steps {
            let moves = generate_moves(&sim, turn, None);
            if moves.is_empty() {
                break;
            }

            let mv = choose_rollout_move(&sim, turn, root_player, &moves, config.epsilon, rng);
            sim = apply_move(&sim, mv, turn);
            turn = turn.opponent();

            if winner(&sim).is_some() {
                break;
            }
        }
    }

    if evaluate(&sim, root_player) > 0.0 {
        root_player
    } else {
        root_player.opponent()
    }
}

fn choose_rollout_move(
    state: &GameState,
    turn: Player,
    root_player: Player,
    moves: &[Move],
    epsilon: f64,
    rng: &mut Rng,
) -> Move {
    let wins = winning_moves(state, turn, moves);
    if !wins.is_empty() {
        return choose(&wins, rng);
    }

    if rng.f64() < epsilon {
        return choose(moves, rng);
    }

    let mut best_score = f64::NEG_INFINITY;
    let mut best = Vec::new();
    for &mv in moves {
        let score = evaluate(&apply_move(state, mv, turn), root_player);
        if score > best_score {
            best_score = score;
            best.clear();
            best.push(mv);
        } else if score == best_score {
            best.push(mv);
        }
    }

    if best.is_empty() {
        choose(moves, rng)
    } else {
        choose(&best, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::build_board;

    fn fresh(size: usize) -> GameState {
        GameState::new(build_board(size).unwrap())
    }

    /// Player 0 has 22 23 24 on row 3 of a 7x7 board and a piece on 18 that
    /// can slide down-left onto 25 to complete four.
    fn one_move_from_win() -> GameState {
        let mut state = fresh(7);
        for cell in [22, 23, 24, 18] {
            state.play(Move::Placement(cell), Player::First);
        }
        state.play(Move::Placement(40), Player::Second);
        state
    }

    #[test]
    fn test_winning_moves_finds_completing_slide() {
        let state = one_move_from_win();
        let moves = generate_moves(&state, Player::First, None);
        let wins = winning_moves(&state, Player::First, &moves);
        assert!(wins.contains(&Move::Movement { from: 18, to: 25 }));
        assert!(wins.iter().all(|m| matches!(m, Move::Movement { .. })));
    }

    #[test]
    fn test_winning_moves_empty_on_fresh_board() {
        let state = fresh(5);
        let moves = generate_moves(&state, Player::First, None);
        assert!(winning_moves(&state, Player::First, &moves).is_empty());
    }

    #[test]
    fn test_rollout_takes_immediate_win() {
        let state = one_move_from_win();
        let config = MctsConfig {
            rollout_steps: 1,
            ..MctsConfig::default()
        };
        for seed in 0..10 {
            let mut rng = Rng::with_seed(seed);
            assert_eq!(
                rollout(&state, Player::First, Player::First, &config, &mut rng),
                Player::First
            );
        }
    }

    #[test]
    fn test_greedy_step_maximizes_root_score() {
        let mut state = fresh(5);
        for (cell, player) in [(6, Player::First), (12, Player::Second), (7, Player::First)] {
            state.play(Move::Placement(cell), player);
        }
        for (turn, root) in [
            (Player::Second, Player::Second),
            (Player::Second, Player::First),
            (Player::First, Player::Second),
        ] {
            let moves = generate_moves(&state, turn, None);
            assert!(winning_moves(&state, turn, &moves).is_empty());
            let scores: Vec<f64> = moves
                .iter()
                .map(|&mv| evaluate(&apply_move(&state, mv, turn), root))
                .collect();
            let top = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            for seed in 0..10 {
                let mut rng = Rng::with_seed(seed);
                let mv = choose_rollout_move(&state, turn, root, &moves, 0.0, &mut rng);
                let index = moves.iter().position(|&m| m == mv).unwrap();
                assert_eq!(scores[index], top, "turn {turn} root {root} chose {mv}");
            }
        }
    }

    #[test]
    fn test_rollout_is_reproducible() {
        let state = fresh(5);
        let config = MctsConfig::default();
        let a = rollout(&state, Player::First, Player::First, &config, &mut Rng::with_seed(7));
        let b = rollout(&state, Player::First, Player::First, &config, &mut Rng::with_seed(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_rollout_on_decided_state_plays_nothing() {
        let mut state = fresh(7);
        for cell in [21, 22, 23, 24, 25] {
            state.play(Move::Placement(cell), Player::Second);
        }
        let mut rng = Rng::with_seed(1);
        let config = MctsConfig::default();
        assert_eq!(
            rollout(&state, Player::First, Player::First, &config, &mut rng),
            Player::First
        );
    }
}
