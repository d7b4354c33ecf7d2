//! Local move selection for each difficulty tier.
//!
//! These run without any network access. The provider uses them as a
//! first-class backend, and [`random_move`] is the fallback for every
//! failed remote call.

use crate::games::tictactoe::{Board, Coord, Evaluation, Mark, evaluate};
use crate::session::Difficulty;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, instrument};

const CENTER: Coord = Coord { row: 1, col: 1 };
const CORNERS: [Coord; 4] = [
    Coord { row: 0, col: 0 },
    Coord { row: 0, col: 2 },
    Coord { row: 2, col: 0 },
    Coord { row: 2, col: 2 },
];

/// Picks a move for `mark` according to `difficulty`.
///
/// Returns `None` only when the board has no empty cell.
#[instrument(skip(board, rng))]
pub fn choose_move<R: Rng + ?Sized>(
    board: &Board,
    mark: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<Coord> {
    let choice = match difficulty {
        Difficulty::Easy => random_move(board, rng),
        Difficulty::Medium => heuristic_move(board, mark, rng),
        Difficulty::Hard => optimal_move(board, mark),
    };
    debug!(?choice, "Local strategy chose");
    choice
}

/// Uniformly random empty cell.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Coord> {
    board.empty_cells().choose(rng).copied()
}

/// First cell (row-major) that completes a line for `mark`.
pub fn winning_move(board: &Board, mark: Mark) -> Option<Coord> {
    board.empty_cells().into_iter().find(|c| {
        board
            .place(c.row, c.col, mark)
            .map(|next| matches!(evaluate(&next), Evaluation::Win(info) if info.winner == mark))
            .unwrap_or(false)
    })
}

/// Win, else block, else centre, else a corner, else an edge.
pub fn heuristic_move<R: Rng + ?Sized>(board: &Board, mark: Mark, rng: &mut R) -> Option<Coord> {
    if let Some(win) = winning_move(board, mark) {
        return Some(win);
    }
    if let Some(block) = winning_move(board, mark.opponent()) {
        return Some(block);
    }
    if board.at(CENTER).is_none() {
        return Some(CENTER);
    }
    let corners: Vec<Coord> = CORNERS
        .iter()
        .copied()
        .filter(|c| board.at(*c).is_none())
        .collect();
    if let Some(corner) = corners.choose(rng) {
        return Some(*corner);
    }
    random_move(board, rng)
}

/// Minimax-optimal move; ties go to the first cell in row-major order.
pub fn optimal_move(board: &Board, mark: Mark) -> Option<Coord> {
    let mut best: Option<(Coord, i32)> = None;
    for cell in board.empty_cells() {
        let Ok(next) = board.place(cell.row, cell.col, mark) else {
            continue;
        };
        let score = minimax(&next, mark.opponent(), mark, 1);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((cell, score));
        }
    }
    best.map(|(cell, _)| cell)
}

// Scores favour faster wins and slower losses.
fn minimax(board: &Board, to_move: Mark, me: Mark, depth: i32) -> i32 {
    match evaluate(board) {
        Evaluation::Win(info) if info.winner == me => 10 - depth,
        Evaluation::Win(_) => depth - 10,
        Evaluation::Draw => 0,
        Evaluation::InProgress => {
            let scores = board.empty_cells().into_iter().filter_map(|c| {
                board
                    .place(c.row, c.col, to_move)
                    .ok()
                    .map(|next| minimax(&next, to_move.opponent(), me, depth + 1))
            });
            if to_move == me {
                scores.max().unwrap_or(0)
            } else {
                scores.min().unwrap_or(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::Mark::{O, X};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_random_move_is_empty_cell() {
        let board = Board::from_rows([
            [Some(X), Some(O), Some(X)],
            [Some(O), None, Some(X)],
            [Some(O), Some(X), Some(O)],
        ]);
        assert_eq!(random_move(&board, &mut rng()), Some(CENTER));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = Board::from_rows([
            [Some(X), Some(O), Some(X)],
            [Some(O), Some(X), Some(X)],
            [Some(O), Some(X), Some(O)],
        ]);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(choose_move(&board, O, difficulty, &mut rng()), None);
        }
    }

    #[test]
    fn test_medium_takes_win_over_block() {
        // O can win at (1,2); X threatens (0,2).
        let board = Board::from_rows([
            [Some(X), Some(X), None],
            [Some(O), Some(O), None],
            [Some(X), None, None],
        ]);
        assert_eq!(
            heuristic_move(&board, O, &mut rng()),
            Some(Coord { row: 1, col: 2 })
        );
    }

    #[test]
    fn test_medium_blocks() {
        let board = Board::from_rows([
            [Some(X), Some(X), None],
            [None, Some(O), None],
            [None, None, None],
        ]);
        assert_eq!(
            heuristic_move(&board, O, &mut rng()),
            Some(Coord { row: 0, col: 2 })
        );
    }

    #[test]
    fn test_medium_prefers_center_then_corner() {
        assert_eq!(heuristic_move(&Board::empty(), O, &mut rng()), Some(CENTER));
        let board = Board::empty().place(1, 1, X).unwrap();
        let choice = heuristic_move(&board, O, &mut rng()).unwrap();
        assert!(CORNERS.contains(&choice));
    }

    #[test]
    fn test_hard_answers_center_with_corner() {
        // An edge reply to a centre opening loses; a corner draws.
        let board = Board::empty().place(1, 1, X).unwrap();
        let choice = optimal_move(&board, O).unwrap();
        assert!(CORNERS.contains(&choice));
    }

    #[test]
    fn test_hard_wins_immediately() {
        let board = Board::from_rows([
            [Some(O), Some(X), Some(X)],
            [None, Some(O), None],
            [Some(X), None, None],
        ]);
        assert_eq!(optimal_move(&board, O), Some(Coord { row: 2, col: 2 }));
    }

    #[test]
    fn test_hard_never_loses_against_any_reply() {
        // Exhaustively play every X line against Hard O.
        fn explore(board: Board) {
            match evaluate(&board) {
                Evaluation::Win(info) => assert_eq!(info.winner, O, "hard lost:\n{}", board),
                Evaluation::Draw => {}
                Evaluation::InProgress => {
                    for c in board.empty_cells() {
                        let after_x = board.place(c.row, c.col, X).unwrap();
                        if evaluate(&after_x) != Evaluation::InProgress {
                            explore(after_x);
                            continue;
                        }
                        let reply = optimal_move(&after_x, O).unwrap();
                        explore(after_x.place(reply.row, reply.col, O).unwrap());
                    }
                }
            }
        }
        explore(Board::empty());
    }
}
