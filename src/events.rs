//! Presentation-facing snapshots and transition events.
//!
//! Rendering, sound and haptics live outside the core. They subscribe to
//! [`GameEvent`]s and read [`Snapshot`]s; nothing they do can affect the game.

use crate::games::tictactoe::{Board, Coord, Mark, WinningInfo};
use crate::session::SessionId;
use serde::Serialize;

/// Read-only view of the controller after a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Session this snapshot belongs to, if a game was started.
    pub session_id: Option<SessionId>,
    /// Current board.
    pub board: Board,
    /// Mark to move.
    pub current: Mark,
    /// Completed line, if any.
    pub winning_info: Option<WinningInfo>,
    /// Whether moves are accepted.
    pub active: bool,
    /// Human-readable status line.
    pub status: String,
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EventKind {
    /// A fresh game started.
    NewGame,
    /// A mark was placed.
    MoveAccepted {
        /// Mark placed.
        mark: Mark,
        /// Where it was placed.
        coord: Coord,
    },
    /// The AI started choosing a move.
    AiThinking,
    /// The game was won.
    Won(WinningInfo),
    /// The board filled with no winner.
    Draw,
    /// The AI could not move; the human has the turn.
    AiError(String),
}

/// A controller transition, for fire-and-forget observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEvent {
    /// What happened.
    pub kind: EventKind,
    /// State right after it happened.
    pub snapshot: Snapshot,
}
