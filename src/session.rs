//! Game session state and move validation.

use crate::error::MoveError;
use crate::games::tictactoe::{Board, Coord, Evaluation, Mark, WinningInfo, evaluate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = u64;

/// Who is playing.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameMode {
    /// Human against the AI.
    #[default]
    VsAi,
    /// Two humans sharing the board.
    TwoPlayer,
}

/// AI strength tier (meaningful only in [`GameMode::VsAi`]).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Difficulty {
    /// Random legal moves.
    Easy,
    /// Win, block, then play strategically.
    Medium,
    /// Optimal play.
    #[default]
    Hard,
}

/// Who is attempting a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// A person clicking a cell.
    Human,
    /// The AI move provider.
    Ai,
}

/// The mutable state of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    id: SessionId,
    board: Board,
    current: Mark,
    winning_info: Option<WinningInfo>,
    active: bool,
    mode: GameMode,
    difficulty: Difficulty,
    ai_mark: Mark,
}

impl GameSession {
    /// Mark that always opens the game.
    pub const START_MARK: Mark = Mark::X;

    /// Creates a new active session on an empty board.
    #[instrument]
    pub fn new(id: SessionId, mode: GameMode, difficulty: Difficulty, ai_mark: Mark) -> Self {
        info!(session_id = id, "Creating new game session");
        Self {
            id,
            board: Board::empty(),
            current: Self::START_MARK,
            winning_info: None,
            active: true,
            mode,
            difficulty,
            ai_mark,
        }
    }

    /// Returns the session ID.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark to move.
    pub fn current(&self) -> Mark {
        self.current
    }

    /// Returns the completed line, if the game was won.
    pub fn winning_info(&self) -> Option<&WinningInfo> {
        self.winning_info.as_ref()
    }

    /// Returns whether moves are still accepted.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the game mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the mark the AI plays.
    pub fn ai_mark(&self) -> Mark {
        self.ai_mark
    }

    /// Returns the mark the human plays in VsAI mode.
    pub fn human_mark(&self) -> Mark {
        self.ai_mark.opponent()
    }

    /// Checks whether the AI holds the turn.
    pub fn is_ai_turn(&self) -> bool {
        self.mode == GameMode::VsAi && self.current == self.ai_mark && self.active
    }

    /// Validates and applies a move for `actor`, returning the new evaluation.
    ///
    /// This is the only way a session's board changes.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub fn apply_move(
        &mut self,
        row: usize,
        col: usize,
        actor: Actor,
    ) -> Result<Evaluation, MoveError> {
        validate_for(self, row, col, actor)?;

        let mark = self.current;
        self.board = self.board.place(row, col, mark)?;
        let evaluation = evaluate(&self.board);

        match evaluation {
            Evaluation::Win(info) => {
                info!(winner = %info.winner, direction = ?info.direction, "Game won");
                self.winning_info = Some(info);
                self.active = false;
            }
            Evaluation::Draw => {
                info!("Game drawn");
                self.active = false;
            }
            Evaluation::InProgress => {
                self.current = mark.opponent();
                debug!(next = %self.current, "Turn passed");
            }
        }

        Ok(evaluation)
    }

    /// Hands the turn to the human after the AI could not move.
    #[instrument(skip(self), fields(session_id = self.id))]
    pub(crate) fn yield_to_human(&mut self) {
        self.current = self.human_mark();
    }
}

/// Checks a human move against the session.
pub fn validate(session: &GameSession, row: usize, col: usize) -> Result<(), MoveError> {
    validate_for(session, row, col, Actor::Human)
}

/// Checks a move by `actor` against the session. No side effects.
#[instrument(skip(session), fields(session_id = session.id))]
pub fn validate_for(
    session: &GameSession,
    row: usize,
    col: usize,
    actor: Actor,
) -> Result<(), MoveError> {
    if !session.active || session.winning_info.is_some() {
        debug!("Move rejected: game not active");
        return Err(MoveError::GameInactive);
    }

    let coord = Coord::new(row, col)?;
    if session.board.at(coord).is_some() {
        debug!(%coord, "Move rejected: cell occupied");
        return Err(MoveError::CellOccupied(coord));
    }

    if session.mode == GameMode::VsAi {
        let ai_to_move = session.current == session.ai_mark;
        let allowed = match actor {
            Actor::Human => !ai_to_move,
            Actor::Ai => ai_to_move,
        };
        if !allowed {
            warn!(?actor, current = %session.current, "Move rejected: out of turn");
            return Err(MoveError::NotYourTurn);
        }
    }

    Ok(())
}
