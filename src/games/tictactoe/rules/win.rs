//! Win detection logic for tic-tac-toe.

use super::super::{Board, Coord, Mark};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Orientation of a winning line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// A full row.
    #[serde(rename = "horizontal")]
    Horizontal,
    /// A full column.
    #[serde(rename = "vertical")]
    Vertical,
    /// Top-left to bottom-right.
    #[serde(rename = "diagonal-1")]
    DiagonalDown,
    /// Top-right to bottom-left.
    #[serde(rename = "diagonal-2")]
    DiagonalUp,
}

/// One of the eight fixed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// Cells of the line, start to end.
    pub cells: [Coord; 3],
    /// Orientation tag.
    pub direction: Direction,
}

const fn c(row: usize, col: usize) -> Coord {
    Coord { row, col }
}

/// The winning lines, in evaluation order: rows, columns, diagonals.
#[rustfmt::skip]
pub const LINES: [Line; 8] = [
    // Rows
    Line { cells: [c(0, 0), c(0, 1), c(0, 2)], direction: Direction::Horizontal },
    Line { cells: [c(1, 0), c(1, 1), c(1, 2)], direction: Direction::Horizontal },
    Line { cells: [c(2, 0), c(2, 1), c(2, 2)], direction: Direction::Horizontal },
    // Columns
    Line { cells: [c(0, 0), c(1, 0), c(2, 0)], direction: Direction::Vertical },
    Line { cells: [c(0, 1), c(1, 1), c(2, 1)], direction: Direction::Vertical },
    Line { cells: [c(0, 2), c(1, 2), c(2, 2)], direction: Direction::Vertical },
    // Diagonals
    Line { cells: [c(0, 0), c(1, 1), c(2, 2)], direction: Direction::DiagonalDown },
    Line { cells: [c(0, 2), c(1, 1), c(2, 0)], direction: Direction::DiagonalUp },
];

/// A completed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningInfo {
    /// Mark that completed the line.
    pub winner: Mark,
    /// The three cells of the line, in table order.
    pub line: [Coord; 3],
    /// Orientation of the line.
    pub direction: Direction,
}

/// Returns the first completed line in table order, if any.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<WinningInfo> {
    LINES.iter().find_map(|line| {
        let [a, b, c] = line.cells;
        match board.at(a) {
            Some(mark) if board.at(b) == Some(mark) && board.at(c) == Some(mark) => {
                Some(WinningInfo {
                    winner: mark,
                    line: line.cells,
                    direction: line.direction,
                })
            }
            _ => None,
        }
    })
}
