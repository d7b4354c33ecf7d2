//! Core domain types for tic-tac-toe.

use crate::error::MoveError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows (and columns) on the board.
pub const BOARD_SIZE: usize = 3;

/// A player's mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// First mark (always opens the game).
    X,
    /// Second mark.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell address.
///
/// The fields are public and unchecked; [`Coord::new`] is the checked
/// constructor. Board lookups treat an off-board address as no mark, and
/// [`Board::place`] rejects it with [`MoveError::OutOfBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row index; on the board when below [`BOARD_SIZE`].
    pub row: usize,
    /// Column index; on the board when below [`BOARD_SIZE`].
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate, rejecting anything outside the board.
    pub fn new(row: usize, col: usize) -> Result<Self, MoveError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(MoveError::OutOfBounds { row, col });
        }
        Ok(Self { row, col })
    }

    /// All nine coordinates in row-major order.
    pub fn all() -> impl Iterator<Item = Coord> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Coord { row, col }))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 3x3 tic-tac-toe board.
///
/// Boards are values: [`Board::place`] returns a new board and never
/// touches the one it was called on, so earlier snapshots stay valid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Option<Mark>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a fresh board with every cell unset.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a board from explicit rows.
    ///
    /// No reachability check is made; the evaluator must still cope with
    /// boards that could never occur in play.
    pub fn from_rows(cells: [[Option<Mark>; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Returns the mark at (row, col), or `None` if the cell is unset or off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Mark> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Returns the mark at a coordinate.
    pub fn at(&self, coord: Coord) -> Option<Mark> {
        self.get(coord.row, coord.col)
    }

    /// Checks whether (row, col) is on the board and unset.
    pub fn is_empty_at(&self, row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE && self.cells[row][col].is_none()
    }

    /// Returns a new board with `mark` placed at (row, col).
    #[instrument(skip(self))]
    pub fn place(&self, row: usize, col: usize, mark: Mark) -> Result<Board, MoveError> {
        let coord = Coord::new(row, col)?;
        if self.at(coord).is_some() {
            return Err(MoveError::CellOccupied(coord));
        }
        let mut next = *self;
        next.cells[row][col] = Some(mark);
        Ok(next)
    }

    /// All unset cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Coord> {
        Coord::all().filter(|c| self.at(*c).is_none()).collect()
    }

    /// Number of marks placed so far.
    pub fn mark_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Returns the rows of the board.
    pub fn rows(&self) -> &[[Option<Mark>; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (r, row) in self.cells.iter().enumerate() {
            let symbols: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(mark) => mark.to_string(),
                    None => ".".to_string(),
                })
                .collect();
            write!(f, " {} ", symbols.join(" | "))?;
            if r + 1 < BOARD_SIZE {
                write!(f, "\n---+---+---\n")?;
            }
        }
        Ok(())
    }
}
