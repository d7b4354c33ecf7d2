mod rules;
mod types;

pub use rules::{
    Direction, Evaluation, LINES, Line, WinningInfo, check_winner, evaluate, is_full,
};
pub use types::{BOARD_SIZE, Board, Coord, Mark};
