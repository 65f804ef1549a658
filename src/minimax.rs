//! Depth-bounded minimax search with alpha-beta pruning.
//!
//! The perspective player never changes during the recursion: maximizing
//! nodes enumerate that player's moves, minimizing nodes enumerate the
//! opponent's, and every leaf is scored from the perspective player's side.

use fastrand::Rng;
use tracing::{debug, trace};

use crate::eval::is_terminal;
use crate::movegen::generate_moves;
use crate::playout::{choose, winning_moves};
use crate::state::{apply_move, GameState, Move, Player};

/// Alpha-beta minimax value of `state` for `player`.
///
/// Decided games and depth 0 return the terminal/static score. A node where
/// the side to move has no legal move is scored statically as well.
pub fn minimax(
    state: &GameState,
    depth: u32,
    mut alpha: f64,
    mut beta: f64,
    maximizing: bool,
    player: Player,
) -> f64 {
    let (terminal, score) = is_terminal(state, player);
    if depth == 0 || terminal {
        return score;
    }

    let mover = if maximizing { player } else { player.opponent() };
    let moves = generate_moves(state, mover, None);
    if moves.is_empty() {
        return score;
    }

    if maximizing {
        let mut best = f64::NEG_INFINITY;
        for mv in moves {
            let value = minimax(&apply_move(state, mv, mover), depth - 1, alpha, beta, false, player);
            best = best.max(value);
            alpha = alpha.max(value);
            if beta <= alpha {
                break;
            }
        }
        best
    } else {
        let mut best = f64::INFINITY;
        for mv in moves {
            let value = minimax(&apply_move(state, mv, mover), depth - 1, alpha, beta, true, player);
            best = best.min(value);
            beta = beta.min(value);
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// Pick a move for `player` searching `depth` plies.
///
/// A move that wins on the spot is returned without searching. Otherwise each
/// first-ply move is scored by `minimax` at `depth - 1` (with the opponent to
/// move) and one of the best is chosen at random. Depth 0 behaves like depth 1.
/// Returns `None` if `player` has no legal move.
pub fn best_move(state: &GameState, player: Player, depth: u32, rng: &mut Rng) -> Option<Move> {
    let first_turn = state.pieces_on_board(player) == 0;
    let moves = generate_moves(state, player, Some(first_turn));
    if moves.is_empty() {
        return None;
    }

    let wins = winning_moves(state, player, &moves);
    if !wins.is_empty() {
        let mv = choose(&wins, rng);
        debug!(%player, %mv, candidates = wins.len(), "minimax found immediate win");
        return Some(mv);
    }

    let mut best_value = f64::NEG_INFINITY;
    let mut best_moves = Vec::new();
    for mv in moves {
        let next = apply_move(state, mv, player);
        let value = minimax(
            &next,
            depth.saturating_sub(1),
            f64::NEG_INFINITY,
            f64::INFINITY,
            false,
            player,
        );
        trace!(%mv, value, "minimax root move");
        if value > best_value {
            best_value = value;
            best_moves.clear();
            best_moves.push(mv);
        } else if value == best_value {
            best_moves.push(mv);
        }
    }

    if best_moves.is_empty() {
        return None;
    }
    let mv = choose(&best_moves, rng);
    debug!(%player, %mv, value = best_value, ties = best_moves.len(), "minimax search complete");
    Some(mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::build_board;
    use crate::constants::WIN_SCORE;
    use crate::eval::{evaluate, winner};

    fn fresh(size: usize) -> GameState {
        GameState::new(build_board(size).unwrap())
    }

    /// Full-width minimax with the same leaf scoring and no cutoffs.
    fn plain_minimax(state: &GameState, depth: u32, maximizing: bool, player: Player) -> f64 {
        let (terminal, score) = is_terminal(state, player);
        if depth == 0 || terminal {
            return score;
        }
        let mover = if maximizing { player } else { player.opponent() };
        let values = generate_moves(state, mover, None)
            .into_iter()
            .map(|mv| plain_minimax(&apply_move(state, mv, mover), depth - 1, !maximizing, player));
        let best = if maximizing {
            values.fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
        } else {
            values.fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.min(v))))
        };
        best.unwrap_or(score)
    }

    /// A position reached by `plies` random legal moves from an empty 5x5 board.
    fn random_position(plies: usize, seed: u64) -> (GameState, Player) {
        let mut rng = Rng::with_seed(seed);
        let mut state = fresh(5);
        let mut player = Player::First;
        for _ in 0..plies {
            let moves = generate_moves(&state, player, None);
            if moves.is_empty() || winner(&state).is_some() {
                break;
            }
            state = apply_move(&state, choose(&moves, &mut rng), player);
            player = player.opponent();
        }
        (state, player)
    }

    #[test]
    fn test_pruning_preserves_value() {
        for seed in 0..4 {
            let (state, player) = random_position(8, seed);
            for depth in 1..=3 {
                for maximizing in [true, false] {
                    let pruned = minimax(
                        &state,
                        depth,
                        f64::NEG_INFINITY,
                        f64::INFINITY,
                        maximizing,
                        player,
                    );
                    let full = plain_minimax(&state, depth, maximizing, player);
                    assert_eq!(pruned, full, "seed {seed} depth {depth} maximizing {maximizing}");
                }
            }
        }
    }

    #[test]
    fn test_depth_zero_is_static_score() {
        let mut state = fresh(5);
        state.play(Move::Placement(6), Player::First);
        let value = minimax(&state, 0, f64::NEG_INFINITY, f64::INFINITY, true, Player::First);
        assert_eq!(value, evaluate(&state, Player::First));
    }

    #[test]
    fn test_terminal_state_returns_win_score() {
        let mut state = fresh(7);
        for cell in [21, 22, 23, 24, 25] {
            state.play(Move::Placement(cell), Player::Second);
        }
        let value = minimax(&state, 3, f64::NEG_INFINITY, f64::INFINITY, true, Player::First);
        assert_eq!(value, WIN_SCORE);
    }

    #[test]
    fn test_best_move_takes_immediate_win() {
        let mut state = fresh(7);
        for cell in [22, 23, 24, 18] {
            state.play(Move::Placement(cell), Player::First);
        }
        state.play(Move::Placement(40), Player::Second);
        for seed in 0..5 {
            let mut rng = Rng::with_seed(seed);
            let mv = best_move(&state, Player::First, 2, &mut rng).unwrap();
            let next = apply_move(&state, mv, Player::First);
            assert_eq!(winner(&next), Some(Player::First), "seed {seed} chose {mv}");
        }
    }

    #[test]
    fn test_best_move_blocks_opponent_win() {
        // Player 1 threatens 18 -> 25 completing 22 23 24 25. Player 0 has a
        // piece to spare and must occupy 25 (the only way to stop the slide).
        let mut state = fresh(7);
        for cell in [22, 23, 24, 18] {
            state.play(Move::Placement(cell), Player::Second);
        }
        state.play(Move::Placement(8), Player::First);
        let mut rng = Rng::with_seed(4);
        let mv = best_move(&state, Player::First, 2, &mut rng).unwrap();
        let next = apply_move(&state, mv, Player::First);
        let replies = generate_moves(&next, Player::Second, None);
        assert!(
            replies
                .iter()
                .all(|&r| winner(&apply_move(&next, r, Player::Second)) != Some(Player::Second)),
            "{mv} leaves a winning reply"
        );
    }

    #[test]
    fn test_best_move_first_turn_avoids_corners() {
        let state = fresh(5);
        let mut rng = Rng::with_seed(1);
        let mv = best_move(&state, Player::First, 1, &mut rng).unwrap();
        assert!(!state.board().is_corner(mv.landing()));
    }

    #[test]
    fn test_depth_zero_behaves_like_depth_one() {
        let mut state = fresh(5);
        state.play(Move::Placement(12), Player::First);
        let a = best_move(&state, Player::Second, 0, &mut Rng::with_seed(8));
        let b = best_move(&state, Player::Second, 1, &mut Rng::with_seed(8));
        assert_eq!(a, b);
    }
}
