//! Legal move generation.
//!
//! A player may place a piece from their reserve on any empty cell (except
//! the corners on their very first placement), or slide one of their pieces
//! in a straight line. A slide:
//! - stops at the board edge or the first occupied cell,
//! - may cross at most one zone boundary,
//! - only continues past a cell if that cell is in the mover's target zone.

use crate::board::{CellId, Direction};
use crate::state::{GameState, Move, Player};

/// Enumerate every legal move for `player`.
///
/// When `is_first_move` is `None` it is computed as "`player` has no piece on
/// the board". Placements come first, in cell order, followed by movements.
pub fn generate_moves(state: &GameState, player: Player, is_first_move: Option<bool>) -> Vec<Move> {
    let first = is_first_move.unwrap_or_else(|| state.pieces_on_board(player) == 0);
    let board = state.board();
    let mut moves = Vec::new();

    if state.reserve(player) > 0 {
        moves.extend(
            (0..board.len())
                .filter(|&cell| state.is_empty(cell))
                .filter(|&cell| !(first && board.is_corner(cell)))
                .map(Move::Placement),
        );
    }

    for piece in state.pieces().iter().filter(|p| p.owner == player) {
        for dir in Direction::ALL {
            moves.extend(
                slide_destinations(state, piece.cell, dir)
                    .into_iter()
                    .map(|to| Move::Movement {
                        from: piece.cell,
                        to,
                    }),
            );
        }
    }

    moves
}

/// Cells reachable by sliding the piece on `origin` in `dir`.
///
/// Returns nothing for an empty origin.
pub fn slide_destinations(state: &GameState, origin: CellId, dir: Direction) -> Vec<CellId> {
    let Some(mover) = state.owner(origin) else {
        return Vec::new();
    };
    let board = state.board();
    let target = mover.target_zone();

    let mut destinations = Vec::new();
    let mut current = origin;
    let mut crossed = false;
    while let Some(next) = board.neighbor(current, dir) {
        if !state.is_empty(next) {
            break;
        }
        let zone = board.zone(next);
        if zone != board.zone(current) {
            if crossed {
                break;
            }
            crossed = true;
        }
        destinations.push(next);
        if zone != target {
            break;
        }
        current = next;
    }
    destinations
}
