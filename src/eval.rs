//! Line detection, static evaluation and terminal detection.
//!
//! Lines are counted along the three board axes. A line of exactly
//! [`WIN_LENGTH`] completed by a movement wins; a line of [`OVERLINE_LENGTH`]
//! or more loses for whoever completed it, whether by movement or placement.

use crate::board::{Axis, CellId};
use crate::constants::{
    LINE_VALUES, MOVE_NUDGE, OVERLINE_LENGTH, PLACEMENT_NUDGE, WIN_LENGTH, WIN_SCORE,
};
use crate::state::{ActionKind, GameState, Player};

/// Length of the run of `owner` pieces through `cell` along `axis`.
///
/// `cell` itself always counts, whoever occupies it.
pub fn line_length(state: &GameState, cell: CellId, owner: Player, axis: Axis) -> usize {
    let board = state.board();
    let (forward, backward) = axis.directions();
    let mut count = 1;
    for dir in [forward, backward] {
        let mut current = cell;
        while let Some(next) = board.neighbor(current, dir) {
            if state.owner(next) != Some(owner) {
                break;
            }
            count += 1;
            current = next;
        }
    }
    count
}

/// Longest same-owner run through the piece on `cell`, or 0 for an empty cell.
pub fn longest_run(state: &GameState, cell: CellId) -> usize {
    let Some(owner) = state.owner(cell) else {
        return 0;
    };
    Axis::ALL
        .iter()
        .map(|&axis| line_length(state, cell, owner, axis))
        .max()
        .unwrap_or(0)
}

/// Value of a piece's longest run. Runs longer than the table are worth 0.
fn line_value(run: usize) -> f64 {
    run.checked_sub(1)
        .and_then(|i| LINE_VALUES.get(i))
        .copied()
        .unwrap_or(0.0)
}

/// Static heuristic score of `state` from `player`'s point of view.
///
/// Only meaningful for comparing states against each other.
pub fn evaluate(state: &GameState, player: Player) -> f64 {
    let mut score = 0.0;

    for piece in state.pieces() {
        let value = line_value(longest_run(state, piece.cell));
        if piece.owner == player {
            score += value;
        } else {
            score -= value;
        }
    }

    let own = state.pieces_on_board(player) as f64;
    let other = state.pieces_on_board(player.opponent()) as f64;
    score += own - other;

    if let Some(last) = state.last_action() {
        let nudge = match last.kind {
            ActionKind::Movement => MOVE_NUDGE,
            ActionKind::Placement => -PLACEMENT_NUDGE,
        };
        if last.player == player {
            score += nudge;
        } else {
            score -= nudge;
        }
    }

    score
}

/// Decide the game from the last action alone.
///
/// Returns the player who won, or `None` while the game goes on.
pub fn winner(state: &GameState) -> Option<Player> {
    let last = state.last_action()?;
    if state.is_empty(last.cell) {
        return None;
    }
    let run = longest_run(state, last.cell);
    if run >= OVERLINE_LENGTH {
        Some(last.player.opponent())
    } else if run == WIN_LENGTH && last.kind == ActionKind::Movement {
        Some(last.player)
    } else {
        None
    }
}

/// Terminal check from `player`'s perspective.
///
/// Returns `(true, ±WIN_SCORE)` for a decided game, otherwise
/// `(false, evaluate(state, player))`.
pub fn is_terminal(state: &GameState, player: Player) -> (bool, f64) {
    match winner(state) {
        Some(w) if w == player => (true, WIN_SCORE),
        Some(_) => (true, -WIN_SCORE),
        None => (false, evaluate(state, player)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::build_board;
    use crate::state::Move;

    fn fresh(size: usize) -> GameState {
        GameState::new(build_board(size).unwrap())
    }

    #[test]
    fn test_fresh_state_is_not_terminal() {
        let state = fresh(5);
        assert_eq!(is_terminal(&state, Player::First), (false, 0.0));
    }

    #[test]
    fn test_line_length_along_axes() {
        // Column-like "Vertical" axis on 7x7 goes in steps of 8.
        let mut state = fresh(7);
        for cell in [8, 16, 24] {
            state.play(Move::Placement(cell), Player::First);
        }
        state.play(Move::Placement(9), Player::Second);
        assert_eq!(line_length(&state, 16, Player::First, Axis::Vertical), 3);
        assert_eq!(line_length(&state, 16, Player::First, Axis::Rising), 1);
        assert_eq!(longest_run(&state, 24), 3);
        assert_eq!(longest_run(&state, 9), 1);
        assert_eq!(longest_run(&state, 0), 0);
    }

    #[test]
    fn test_line_values() {
        assert_eq!(line_value(0), 0.0);
        assert_eq!(line_value(1), 1.0);
        assert_eq!(line_value(4), 1000.0);
        assert_eq!(line_value(5), -10_000.0);
        assert_eq!(line_value(6), 0.0);
    }

    #[test]
    fn test_evaluate_is_antisymmetric_without_last_action_bias() {
        let mut state = fresh(5);
        state.play(Move::Placement(6), Player::First);
        state.play(Move::Placement(7), Player::First);
        state.play(Move::Placement(18), Player::Second);
        // First: two pieces in a run of 2 (10 each) + 1 extra piece.
        // Second placed last: +0.2 for First, -0.2 for Second.
        assert_eq!(evaluate(&state, Player::First), 20.0 - 1.0 + 1.0 + 0.2);
        assert_eq!(evaluate(&state, Player::Second), 1.0 - 20.0 - 1.0 - 0.2);
    }

    #[test]
    fn test_movement_nudge() {
        let mut state = fresh(5);
        state.play(Move::Placement(6), Player::First);
        state.play(Move::Movement { from: 6, to: 7 }, Player::First);
        assert_eq!(evaluate(&state, Player::First), 1.0 + 1.0 + 0.5);
        assert_eq!(evaluate(&state, Player::Second), -1.0 - 1.0 - 0.5);
    }

    #[test]
    fn test_four_by_placement_is_not_a_win() {
        let mut state = fresh(7);
        for cell in [22, 23, 24, 25] {
            state.play(Move::Placement(cell), Player::First);
        }
        assert_eq!(winner(&state), None);
        assert!(!is_terminal(&state, Player::First).0);
    }

    #[test]
    fn test_four_by_movement_wins() {
        let mut state = fresh(7);
        for cell in [22, 23, 24, 18] {
            state.play(Move::Placement(cell), Player::First);
        }
        // 25 is the DownLeft neighbor of 18.
        state.play(Move::Movement { from: 18, to: 25 }, Player::First);
        assert_eq!(winner(&state), Some(Player::First));
        assert_eq!(is_terminal(&state, Player::First), (true, WIN_SCORE));
        assert_eq!(is_terminal(&state, Player::Second), (true, -WIN_SCORE));
    }

    #[test]
    fn test_five_is_a_loss_for_the_mover() {
        let mut state = fresh(7);
        for cell in [21, 22, 23, 24, 25] {
            state.play(Move::Placement(cell), Player::Second);
        }
        assert_eq!(winner(&state), Some(Player::First));
        assert_eq!(is_terminal(&state, Player::Second), (true, -WIN_SCORE));
        assert_eq!(is_terminal(&state, Player::First), (true, WIN_SCORE));
    }
}
