//! Tic-tac-toe rules: win and draw evaluation.

mod draw;
mod win;

pub use draw::is_full;
pub use win::{check_winner, Direction, Line, WinningInfo, LINES};

use super::Board;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Evaluation {
    /// A line is complete.
    Win(WinningInfo),
    /// Every cell is set and no line is complete.
    Draw,
    /// The game can continue.
    InProgress,
}

/// Evaluates a board: first completed line in table order, else draw, else in progress.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Evaluation {
    let evaluation = if let Some(info) = check_winner(board) {
        Evaluation::Win(info)
    } else if is_full(board) {
        Evaluation::Draw
    } else {
        Evaluation::InProgress
    };
    debug!(?evaluation, "Evaluated board");
    evaluation
}
