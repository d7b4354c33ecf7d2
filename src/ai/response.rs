//! Parsing and validation of the remote service's move reply.

use crate::error::AiError;
use crate::games::tictactoe::{BOARD_SIZE, Board, Coord};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// The structured reply: a 0-indexed cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct MoveResponse {
    /// The row index of the move (0-2).
    pub row: i64,
    /// The column index of the move (0-2).
    pub col: i64,
}

impl MoveResponse {
    /// Parses reply text, tolerating surrounding whitespace and a Markdown code fence.
    ///
    /// Only a JSON object with exactly `row` and `col` is accepted.
    #[instrument(skip(text), fields(len = text.len()))]
    pub fn parse(text: &str) -> Result<Self, AiError> {
        let body = strip_code_fence(text.trim());
        let value: Value = serde_json::from_str(body).map_err(|e| malformed(text, e))?;
        if !value.is_object() {
            warn!(reply = %text, "AI reply is not a JSON object");
            let message = format!("expected a JSON object, got {:?}", text);
            return Err(AiError::ResponseInvalid(message));
        }
        serde_json::from_value(value).map_err(|e| malformed(text, e))
    }

    /// Checks the cell is on the board and empty.
    #[instrument(skip(board))]
    pub fn validate(self, board: &Board) -> Result<Coord, AiError> {
        let in_range = |v: i64| (0..BOARD_SIZE as i64).contains(&v);
        if !in_range(self.row) || !in_range(self.col) {
            warn!("AI reply out of range");
            return Err(AiError::ResponseInvalid(format!(
                "cell ({}, {}) is off the board",
                self.row, self.col
            )));
        }

        let coord = Coord {
            row: self.row as usize,
            col: self.col as usize,
        };
        if board.at(coord).is_some() {
            warn!(%coord, "AI reply points at an occupied cell");
            return Err(AiError::ResponseInvalid(format!("cell {} is occupied", coord)));
        }

        debug!(%coord, "AI reply accepted");
        Ok(coord)
    }
}

fn malformed(text: &str, e: serde_json::Error) -> AiError {
    warn!(error = %e, reply = %text, "Unparseable AI reply");
    AiError::ResponseInvalid(format!("malformed reply {:?}: {}", text, e))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = rest.split_once('\n').map_or(rest, |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}
