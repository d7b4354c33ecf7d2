//! Construction of the move request sent to the remote reasoning service.

use super::response::MoveResponse;
use crate::games::tictactoe::{Board, Mark};
use crate::session::Difficulty;
use serde::Serialize;
use tracing::instrument;

/// Everything the remote service needs to choose a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRequest {
    /// Current board as a 3x3 array of "X", "O" or null.
    pub board: Board,
    /// Mark the AI plays.
    pub ai_mark: Mark,
    /// Mark the opponent plays.
    pub opponent_mark: Mark,
    /// Requested strength tier.
    pub difficulty: Difficulty,
}

impl MoveRequest {
    /// Creates a request for `ai_mark` on `board`.
    #[instrument(skip(board))]
    pub fn new(board: Board, ai_mark: Mark, difficulty: Difficulty) -> Self {
        Self {
            board,
            ai_mark,
            opponent_mark: ai_mark.opponent(),
            difficulty,
        }
    }

    /// Sampling temperature: deterministic for Hard, varied otherwise.
    pub fn temperature(&self) -> f32 {
        match self.difficulty {
            Difficulty::Hard => 0.0,
            Difficulty::Easy | Difficulty::Medium => 0.7,
        }
    }

    /// System prompt shared by every request.
    pub fn system_prompt(&self) -> &'static str {
        "You are an expert Tic-Tac-Toe AI. You answer with a single JSON object and nothing else."
    }

    /// Natural-language policy for the requested tier.
    pub fn policy(&self) -> &'static str {
        match self.difficulty {
            Difficulty::Easy => "Make a valid, but random, move on an empty cell.",
            Difficulty::Medium => {
                "Win in one move if you can. Otherwise block the opponent's winning move. \
                 Otherwise make a reasonable strategic move."
            }
            Difficulty::Hard => {
                "Play optimally. Force a win when one is available; otherwise play the move \
                 that minimizes your risk of losing."
            }
        }
    }

    /// User prompt describing the board, the marks and the tier policy.
    #[instrument(skip(self))]
    pub fn prompt(&self) -> String {
        let board_json = serde_json::to_string_pretty(&self.board)
            .unwrap_or_else(|_| "[[null,null,null],[null,null,null],[null,null,null]]".to_string());

        format!(
            "The board is a 3x3 grid, represented by a 2D array. Rows and columns are 0-indexed.\n\
             'X' and 'O' are players, and null represents an empty cell.\n\n\
             Current board state:\n```json\n{board_json}\n```\n\n\
             You are playing as '{ai}'. The opponent is '{opponent}'.\n\
             The requested difficulty is '{difficulty}': {policy}\n\n\
             Respond with a JSON object containing the 0-indexed integer 'row' and 'col' \
             of your move.\n\
             Example: {{\"row\": 1, \"col\": 2}}\n\
             Only select a cell that is currently null.",
            ai = self.ai_mark,
            opponent = self.opponent_mark,
            difficulty = self.difficulty,
            policy = self.policy(),
        )
    }

    /// JSON schema of the expected `{row, col}` reply.
    pub fn response_schema(&self) -> serde_json::Value {
        let mut schema = serde_json::to_value(schemars::schema_for!(MoveResponse))
            .unwrap_or(serde_json::Value::Null);
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
            obj.remove("title");
        }
        schema
    }
}
