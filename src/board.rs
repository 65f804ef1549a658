//! Board graph: the fixed hexagonal cell adjacency and color zones.
//!
//! The board is a rhombus of `size x size` hexagonal cells stored as an arena.
//! A cell is addressed by its index `row * size + col`, and neighbor links are
//! stored as indices, so the graph has no ownership cycles and can be shared
//! between any number of game states.
//!
//! Zones are fixed at construction: every cell starts White, the four edges
//! become Blue, then the four corners and the center cell become Neutral.

use std::fmt;

use thiserror::Error;

use crate::constants::{DIRECTIONS, MIN_SIZE};

/// A cell on the board, represented as an index into the cell arena.
pub type CellId = usize;

/// Color zone of a cell. Controls how pieces slide.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    Neutral,
    White,
    Blue,
}

impl Zone {
    fn symbol(self) -> char {
        match self {
            Zone::Neutral => 'N',
            Zone::White => 'W',
            Zone::Blue => 'B',
        }
    }
}

/// The six compass directions of a hexagonal cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    UpRight,
    DownRight,
    Down,
    DownLeft,
    UpLeft,
}

impl Direction {
    /// All directions, in clockwise order starting from `Up`.
    pub const ALL: [Direction; DIRECTIONS] = [
        Direction::Up,
        Direction::UpRight,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::UpLeft,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction pointing the other way.
    #[inline]
    pub fn opposite(self) -> Direction {
        Self::ALL[(self.index() + 3) % DIRECTIONS]
    }
}

/// One of the three straight lines through a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    /// `Up` / `Down`
    Vertical,
    /// `UpRight` / `DownLeft`
    Rising,
    /// `UpLeft` / `DownRight`
    Falling,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Vertical, Axis::Rising, Axis::Falling];

    /// The two opposing directions that make up this axis.
    pub fn directions(self) -> (Direction, Direction) {
        match self {
            Axis::Vertical => (Direction::Up, Direction::Down),
            Axis::Rising => (Direction::UpRight, Direction::DownLeft),
            Axis::Falling => (Direction::UpLeft, Direction::DownRight),
        }
    }
}

/// Error returned when a board cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid board size {size}: must be odd and at least {MIN_SIZE}")]
    InvalidSize { size: usize },
}

/// A single hexagonal cell. Zone and neighbors never change after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub id: CellId,
    pub zone: Zone,
    neighbors: [Option<CellId>; DIRECTIONS],
}

impl Cell {
    /// The neighbor in `dir`, or `None` at the board edge.
    #[inline]
    pub fn neighbor(&self, dir: Direction) -> Option<CellId> {
        self.neighbors[dir.index()]
    }
}

/// The immutable cell graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

/// Build the board graph for a `size x size` game.
pub fn build_board(size: usize) -> Result<Board, BoardError> {
    if size < MIN_SIZE || size % 2 == 0 {
        return Err(BoardError::InvalidSize { size });
    }

    let mut cells: Vec<Cell> = (0..size * size)
        .map(|id| Cell {
            id,
            zone: Zone::White,
            neighbors: [None; DIRECTIONS],
        })
        .collect();

    for id in 0..size * size {
        let (row, col) = (id / size, id % size);
        let links = &mut cells[id].neighbors;
        if col > 0 {
            links[Direction::UpLeft.index()] = Some(id - 1);
        }
        if col + 1 < size {
            links[Direction::DownRight.index()] = Some(id + 1);
        }
        if row > 0 {
            links[Direction::UpRight.index()] = Some(id - size);
        }
        if row + 1 < size {
            links[Direction::DownLeft.index()] = Some(id + size);
        }
        if row > 0 && col > 0 {
            links[Direction::Up.index()] = Some(id - size - 1);
        }
        if row + 1 < size && col + 1 < size {
            links[Direction::Down.index()] = Some(id + size + 1);
        }
    }

    for cell in &mut cells {
        let (row, col) = (cell.id / size, cell.id % size);
        if row == 0 || row == size - 1 || col == 0 || col == size - 1 {
            cell.zone = Zone::Blue;
        }
    }

    for id in corners(size).into_iter().chain([size * size / 2]) {
        cells[id].zone = Zone::Neutral;
    }

    Ok(Board { size, cells })
}

fn corners(size: usize) -> [CellId; 4] {
    [0, size - 1, size * size - size, size * size - 1]
}

impl Board {
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a built board; provided for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Resolve a cell by identity.
    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn zone(&self, id: CellId) -> Zone {
        self.cells[id].zone
    }

    #[inline]
    pub fn neighbor(&self, id: CellId, dir: Direction) -> Option<CellId> {
        self.cells[id].neighbor(dir)
    }

    /// The four grid corners.
    pub fn corners(&self) -> [CellId; 4] {
        corners(self.size)
    }

    pub fn is_corner(&self, id: CellId) -> bool {
        self.corners().contains(&id)
    }

    pub fn center(&self) -> CellId {
        self.size * self.size / 2
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for cell in row {
                write!(f, "{} ", cell.zone.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
