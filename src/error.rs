//! Error types for moves, the AI provider, and the game controller.

use crate::games::tictactoe::Coord;
use crate::llm_client::LlmError;

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The row or column is outside 0-2.
    #[display("Cell ({}, {}) is off the board", row, col)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Coord),

    /// The game is over or has not started.
    #[display("Game is not active")]
    GameInactive,

    /// The mover does not hold the turn.
    #[display("It's not your turn")]
    NotYourTurn,
}

impl std::error::Error for MoveError {}

/// Error produced while selecting an AI move.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum AiError {
    /// The remote reply was malformed, out of range, or pointed at an occupied cell.
    #[display("AI response invalid: {}", _0)]
    #[from(ignore)]
    ResponseInvalid(String),

    /// The remote call failed or timed out.
    #[display("AI transport failure: {}", _0)]
    Transport(LlmError),

    /// The board has no empty cell left.
    #[display("No available moves on the board")]
    NoAvailableMoves,
}

impl std::error::Error for AiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AiError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

/// Error surfaced by the game controller.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum GameError {
    /// VsAI mode was requested without a usable AI configuration.
    #[display("AI configuration missing: {}", _0)]
    #[from(ignore)]
    ConfigurationMissing(String),

    /// AI move selection failed past its fallback.
    #[display("{}", _0)]
    Ai(AiError),

    /// A move was rejected.
    #[display("{}", _0)]
    Move(MoveError),
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Ai(e) => Some(e),
            GameError::Move(e) => Some(e),
            GameError::ConfigurationMissing(_) => None,
        }
    }
}
