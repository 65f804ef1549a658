//! Game state representation and move execution.
//!
//! This module provides the core game data:
//! - [`Player`] and [`Piece`] ownership
//! - [`Move`] descriptions (placement or movement) and their text notation
//! - [`GameState`], a snapshot of pieces, reserves and the last action
//!
//! A `GameState` shares its [`Board`] through an `Arc`, since the graph never
//! changes; everything mutable (occupants, pieces, reserves) is owned, so a
//! `clone()` is a fully independent copy that search can mutate freely.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::board::{Board, CellId, Zone};
use crate::constants::INITIAL_STOCK;
use crate::flip::resolve_flips;

/// One of the two players. Player 0 (`First`) always opens the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    First,
    Second,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::First, Player::Second];

    /// Zero-based player index.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Player> {
        match index {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// The zone this player's pieces must keep landing on to keep sliding.
    #[inline]
    pub fn target_zone(self) -> Zone {
        match self {
            Player::First => Zone::Blue,
            Player::Second => Zone::White,
        }
    }
}

/// Players are shown one-based, as "1" and "2".
impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}

/// A piece on the board. Pieces are created by placement and never removed;
/// a flip only changes the owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub owner: Player,
    pub cell: CellId,
}

/// A move description. Carries no side effects until applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    /// Take a piece from the reserve and put it on an empty cell.
    Placement(CellId),
    /// Slide a piece already on the board.
    Movement { from: CellId, to: CellId },
}

impl Move {
    /// The cell the acting piece ends up on.
    pub fn landing(self) -> CellId {
        match self {
            Move::Placement(cell) => cell,
            Move::Movement { to, .. } => to,
        }
    }

    pub fn kind(self) -> ActionKind {
        match self {
            Move::Placement(_) => ActionKind::Placement,
            Move::Movement { .. } => ActionKind::Movement,
        }
    }
}

/// Placements are written as the cell id (`12`), movements as `from-to` (`7-13`).
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Placement(cell) => write!(f, "{cell}"),
            Move::Movement { from, to } => write!(f, "{from}-{to}"),
        }
    }
}

/// Error returned for malformed move notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoveError {
    #[error("empty move")]
    Empty,
    #[error("invalid cell '{0}'")]
    InvalidCell(String),
    #[error("cell {cell} is off the board ({cells} cells)")]
    OutOfRange { cell: CellId, cells: usize },
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseMoveError::Empty);
        }
        let cell = |part: &str| {
            part.trim()
                .parse::<CellId>()
                .map_err(|_| ParseMoveError::InvalidCell(part.to_string()))
        };
        match s.split_once('-') {
            Some((from, to)) => Ok(Move::Movement {
                from: cell(from)?,
                to: cell(to)?,
            }),
            None => Ok(Move::Placement(cell(s)?)),
        }
    }
}

/// Parse move notation and check every cell exists on `board`.
pub fn parse_move(s: &str, board: &Board) -> Result<Move, ParseMoveError> {
    let mv: Move = s.parse()?;
    let cells = board.len();
    let check = |cell: CellId| {
        if cell < cells {
            Ok(())
        } else {
            Err(ParseMoveError::OutOfRange { cell, cells })
        }
    };
    match mv {
        Move::Placement(cell) => check(cell)?,
        Move::Movement { from, to } => {
            check(from)?;
            check(to)?;
        }
    }
    Ok(mv)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Placement,
    Movement,
}

/// Record of the most recent action, used by terminal detection and evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LastAction {
    pub player: Player,
    pub kind: ActionKind,
    /// Cell the acting piece landed on.
    pub cell: CellId,
}

/// A game snapshot: board graph, pieces, reserves and the last action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    board: Arc<Board>,
    /// Per-cell index into `pieces`.
    occupants: Vec<Option<usize>>,
    pieces: Vec<Piece>,
    reserve: [u8; 2],
    last_action: Option<LastAction>,
}

impl GameState {
    /// A fresh game: empty board, full reserves, no last action.
    pub fn new(board: impl Into<Arc<Board>>) -> Self {
        let board = board.into();
        Self {
            occupants: vec![None; board.len()],
            board,
            pieces: Vec::new(),
            reserve: [INITIAL_STOCK; 2],
            last_action: None,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The piece on `cell`, if any.
    #[inline]
    pub fn piece_at(&self, cell: CellId) -> Option<&Piece> {
        self.occupants[cell].map(|i| &self.pieces[i])
    }

    #[inline]
    pub fn owner(&self, cell: CellId) -> Option<Player> {
        self.piece_at(cell).map(|p| p.owner)
    }

    #[inline]
    pub fn is_empty(&self, cell: CellId) -> bool {
        self.occupants[cell].is_none()
    }

    /// All pieces on the board, in placement order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Number of pieces `player` currently owns on the board.
    pub fn pieces_on_board(&self, player: Player) -> usize {
        self.pieces.iter().filter(|p| p.owner == player).count()
    }

    /// Pieces `player` can still place.
    #[inline]
    pub fn reserve(&self, player: Player) -> u8 {
        self.reserve[player.index()]
    }

    #[inline]
    pub fn last_action(&self) -> Option<LastAction> {
        self.last_action
    }

    /// Apply `mv` for `player` in place.
    ///
    /// Returns false and leaves the state untouched if the move cannot be
    /// executed: placing with an empty reserve or onto an occupied cell,
    /// moving from an empty origin or onto an occupied destination.
    pub fn play(&mut self, mv: Move, player: Player) -> bool {
        match mv {
            Move::Placement(cell) => {
                if self.reserve[player.index()] == 0 || !self.is_empty(cell) {
                    return false;
                }
                self.reserve[player.index()] -= 1;
                self.occupants[cell] = Some(self.pieces.len());
                self.pieces.push(Piece {
                    owner: player,
                    cell,
                });
            }
            Move::Movement { from, to } => {
                let Some(index) = self.occupants[from] else {
                    return false;
                };
                if !self.is_empty(to) {
                    return false;
                }
                self.occupants[from] = None;
                self.occupants[to] = Some(index);
                self.pieces[index].cell = to;
                resolve_flips(self, to);
            }
        }
        self.last_action = Some(LastAction {
            player,
            kind: mv.kind(),
            cell: mv.landing(),
        });
        true
    }

    /// Change the owner of the piece on `cell`. No-op on an empty cell.
    pub(crate) fn set_owner(&mut self, cell: CellId, owner: Player) {
        if let Some(index) = self.occupants[cell] {
            self.pieces[index].owner = owner;
        }
    }
}

/// Apply `mv` for `player` to a copy of `state` and return the copy.
///
/// The input is never mutated. Moves that cannot be executed leave the copy
/// unchanged; callers are expected to only pass moves from
/// [`generate_moves`](crate::movegen::generate_moves).
pub fn apply_move(state: &GameState, mv: Move, player: Player) -> GameState {
    let mut next = state.clone();
    next.play(mv, player);
    next
}

/// One row per line: `-` for an empty cell, `1`/`2` for the owner, followed by
/// the remaining reserves.
impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.board.size();
        for row in 0..size {
            for col in 0..size {
                match self.owner(row * size + col) {
                    Some(player) => write!(f, "{player}")?,
                    None => write!(f, "-")?,
                }
            }
            writeln!(f)?;
        }
        write!(
            f,
            "reserve: {} {}",
            self.reserve(Player::First),
            self.reserve(Player::Second)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::build_board;

    fn fresh() -> GameState {
        GameState::new(build_board(5).unwrap())
    }

    #[test]
    fn test_fresh_state() {
        let state = fresh();
        assert_eq!(state.reserve(Player::First), INITIAL_STOCK);
        assert_eq!(state.reserve(Player::Second), INITIAL_STOCK);
        assert!(state.pieces().is_empty());
        assert!(state.last_action().is_none());
        assert!((0..25).all(|c| state.is_empty(c)));
    }

    #[test]
    fn test_placement() {
        let mut state = fresh();
        assert!(state.play(Move::Placement(6), Player::First));
        assert_eq!(state.owner(6), Some(Player::First));
        assert_eq!(state.reserve(Player::First), INITIAL_STOCK - 1);
        assert_eq!(
            state.last_action(),
            Some(LastAction {
                player: Player::First,
                kind: ActionKind::Placement,
                cell: 6,
            })
        );
    }

    #[test]
    fn test_placement_on_occupied_cell_is_noop() {
        let mut state = fresh();
        state.play(Move::Placement(6), Player::First);
        let before = state.clone();
        assert!(!state.play(Move::Placement(6), Player::Second));
        assert_eq!(state, before);
    }

    #[test]
    fn test_placement_with_empty_reserve_is_noop() {
        let mut state = fresh();
        for cell in 0..INITIAL_STOCK as usize {
            assert!(state.play(Move::Placement(cell), Player::Second));
        }
        assert_eq!(state.reserve(Player::Second), 0);
        let before = state.clone();
        assert!(!state.play(Move::Placement(20), Player::Second));
        assert_eq!(state, before);
    }

    #[test]
    fn test_movement_relocates_piece() {
        let mut state = fresh();
        state.play(Move::Placement(6), Player::First);
        assert!(state.play(Move::Movement { from: 6, to: 7 }, Player::First));
        assert!(state.is_empty(6));
        assert_eq!(state.piece_at(7).map(|p| p.cell), Some(7));
        assert_eq!(state.last_action().map(|a| a.kind), Some(ActionKind::Movement));
    }

    #[test]
    fn test_movement_from_empty_origin_is_noop() {
        let state = fresh();
        let next = apply_move(&state, Move::Movement { from: 6, to: 7 }, Player::First);
        assert_eq!(next, state);
    }

    #[test]
    fn test_apply_move_does_not_mutate_input() {
        let mut state = fresh();
        state.play(Move::Placement(6), Player::First);
        let saved = state.clone();
        let next = apply_move(&state, Move::Placement(7), Player::Second);
        assert_eq!(state, saved);
        assert_ne!(next, saved);
    }

    #[test]
    fn test_move_notation() {
        assert_eq!("12".parse::<Move>(), Ok(Move::Placement(12)));
        assert_eq!(
            "7-13".parse::<Move>(),
            Ok(Move::Movement { from: 7, to: 13 })
        );
        assert_eq!("".parse::<Move>(), Err(ParseMoveError::Empty));
        assert!(matches!(
            "a-3".parse::<Move>(),
            Err(ParseMoveError::InvalidCell(_))
        ));
        assert_eq!(Move::Movement { from: 7, to: 13 }.to_string(), "7-13");

        let board = build_board(5).unwrap();
        assert_eq!(
            parse_move("3-25", &board),
            Err(ParseMoveError::OutOfRange { cell: 25, cells: 25 })
        );
    }

    #[test]
    fn test_display() {
        let mut state = fresh();
        state.play(Move::Placement(0), Player::First);
        state.play(Move::Placement(6), Player::Second);
        let text = state.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("1----"));
        assert_eq!(lines.next(), Some("-2---"));
        assert_eq!(text.lines().last(), Some("reserve: 5 5"));
    }
}
