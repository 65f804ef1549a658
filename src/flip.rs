//! Flanking capture.
//!
//! After a piece lands by movement, every straight run of opponent pieces that
//! is closed off on the far side by another piece of the mover changes owner.
//! Runs that end at an empty cell or at the board edge are left alone.

use crate::board::{CellId, Direction};
use crate::state::GameState;

/// Flip every opponent run flanked by the piece on `cell`.
///
/// Each of the six directions is resolved independently. Returns the number
/// of pieces that changed owner; an empty `cell` flips nothing.
pub fn resolve_flips(state: &mut GameState, cell: CellId) -> usize {
    let Some(mover) = state.owner(cell) else {
        return 0;
    };

    let mut flipped = 0;
    let mut run: Vec<CellId> = Vec::new();
    for dir in Direction::ALL {
        run.clear();
        let mut current = cell;
        let closed = loop {
            let Some(next) = state.board().neighbor(current, dir) else {
                break false;
            };
            match state.owner(next) {
                None => break false,
                Some(owner) if owner == mover => break true,
                Some(_) => {
                    run.push(next);
                    current = next;
                }
            }
        };
        if closed {
            for &captured in &run {
                state.set_owner(captured, mover);
            }
            flipped += run.len();
        }
    }
    flipped
}
