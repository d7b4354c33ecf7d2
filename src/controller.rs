//! Game controller: turn order, move application and the AI turn.
//!
//! The controller owns the only [`GameSession`]. Human moves and AI moves
//! go through the same [`GameSession::apply_move`] path; presentation learns
//! about transitions from the broadcast [`GameEvent`] channel.

use crate::ai::AiMoveProvider;
use crate::error::{AiError, GameError};
use crate::events::{EventKind, GameEvent, Snapshot};
use crate::games::tictactoe::{Board, Coord, Evaluation, Mark, WinningInfo};
use crate::llm_client::LlmError;
use crate::session::{Actor, Difficulty, GameMode, GameSession, SessionId};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

/// Pause before the AI moves, so the human's mark renders first.
pub const DEFAULT_AI_DELAY: Duration = Duration::from_millis(500);

const EVENT_CAPACITY: usize = 64;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// A line was completed.
    Win(WinningInfo),
    /// The board filled with no winner.
    Draw,
}

/// Controller state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerState {
    /// No game has been started.
    Idle,
    /// Waiting for a human to place `Mark`.
    AwaitingMove(Mark),
    /// Waiting for the AI provider.
    AwaitingAiMove,
    /// The game is over; only `new_game` leaves this state.
    Terminal(Outcome),
}

/// An in-flight AI turn, tied to the session that requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiTurn {
    /// Session the turn belongs to.
    pub session_id: SessionId,
    /// Board the AI is choosing on.
    pub board: Board,
    /// Mark the AI plays.
    pub ai_mark: Mark,
    /// Requested tier.
    pub difficulty: Difficulty,
}

/// Orchestrates one game at a time.
#[derive(Debug)]
pub struct GameController {
    state: ControllerState,
    session: Option<GameSession>,
    mode: GameMode,
    difficulty: Difficulty,
    ai_mark: Mark,
    ai: Option<Arc<AiMoveProvider>>,
    ai_delay: Duration,
    next_session_id: SessionId,
    status: String,
    events: broadcast::Sender<GameEvent>,
}

impl GameController {
    /// Creates an idle controller. `ai` is `None` when no AI is configured.
    #[instrument(skip(ai), fields(has_ai = ai.is_some()))]
    pub fn new(ai: Option<AiMoveProvider>) -> Self {
        info!("Creating game controller");
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: ControllerState::Idle,
            session: None,
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            ai_mark: Mark::O,
            ai: ai.map(Arc::new),
            ai_delay: DEFAULT_AI_DELAY,
            next_session_id: 1,
            status: "Start a new game!".to_string(),
            events,
        }
    }

    /// Sets the pause before each AI move.
    pub fn with_ai_delay(mut self, ai_delay: Duration) -> Self {
        self.ai_delay = ai_delay;
        self
    }

    /// Sets the mark the AI plays in new games.
    pub fn with_ai_mark(mut self, ai_mark: Mark) -> Self {
        self.ai_mark = ai_mark;
        self
    }

    /// Sets the mode used by the next `new_game`.
    pub fn set_mode(&mut self, mode: GameMode) {
        debug!(%mode, "Mode selected");
        self.mode = mode;
    }

    /// Sets the difficulty used by the next `new_game`.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        debug!(%difficulty, "Difficulty selected");
        self.difficulty = difficulty;
    }

    /// Selected mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Selected difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Current state.
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Current session, if a game was started.
    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    /// Status line for presentation.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Subscribes to transition events.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Read-only view of the current game.
    pub fn snapshot(&self) -> Snapshot {
        match &self.session {
            Some(session) => Snapshot {
                session_id: Some(session.id()),
                board: *session.board(),
                current: session.current(),
                winning_info: session.winning_info().copied(),
                active: session.is_active(),
                status: self.status.clone(),
            },
            None => Snapshot {
                session_id: None,
                board: Board::empty(),
                current: GameSession::START_MARK,
                winning_info: None,
                active: false,
                status: self.status.clone(),
            },
        }
    }

    /// Starts a fresh game with the selected mode and difficulty.
    ///
    /// In VsAI mode this fails with [`GameError::ConfigurationMissing`] when
    /// no AI provider was configured; the controller state is left as it was.
    #[instrument(skip(self), fields(mode = %self.mode, difficulty = %self.difficulty))]
    pub fn new_game(&mut self) -> Result<(), GameError> {
        if self.mode == GameMode::VsAi && self.ai.is_none() {
            warn!("VsAI game requested without an AI provider");
            return Err(GameError::ConfigurationMissing(
                "set an API key for the configured provider, or use the local backend".to_string(),
            ));
        }

        let id = self.next_session_id;
        self.next_session_id += 1;

        let session = GameSession::new(id, self.mode, self.difficulty, self.ai_mark);
        let start = session.current();
        self.state = if session.is_ai_turn() {
            ControllerState::AwaitingAiMove
        } else {
            ControllerState::AwaitingMove(start)
        };
        self.session = Some(session);
        self.status = format!("Player {}'s turn", start);

        info!(session_id = id, state = ?self.state, "New game started");
        self.emit(EventKind::NewGame);
        Ok(())
    }

    /// Submits a human move. Returns whether it was accepted.
    ///
    /// Rejected moves (wrong state, AI's turn, occupied or off-board cell)
    /// are silent no-ops.
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn submit_move(&mut self, row: usize, col: usize) -> bool {
        if !matches!(self.state, ControllerState::AwaitingMove(_)) {
            debug!("Ignoring move: not awaiting a human move");
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let mark = session.current();
        match session.apply_move(row, col, Actor::Human) {
            Ok(evaluation) => {
                self.after_move(mark, Coord { row, col }, evaluation);
                true
            }
            Err(e) => {
                debug!(error = %e, "Ignoring rejected move");
                false
            }
        }
    }

    /// Marks the start of an AI turn and returns the request to resolve.
    ///
    /// Returns `None` unless the controller is awaiting the AI.
    #[instrument(skip(self))]
    pub fn begin_ai_turn(&mut self) -> Option<AiTurn> {
        if self.state != ControllerState::AwaitingAiMove {
            return None;
        }
        let session = self.session.as_ref()?;
        let turn = AiTurn {
            session_id: session.id(),
            board: *session.board(),
            ai_mark: session.ai_mark(),
            difficulty: session.difficulty(),
        };

        self.status = "AI is thinking...".to_string();
        self.emit(EventKind::AiThinking);
        Some(turn)
    }

    /// Applies the result of an AI turn. Returns whether a move was placed.
    ///
    /// Results for a session that is no longer current, or that arrive when
    /// the controller is not awaiting the AI, are discarded.
    #[instrument(skip(self, turn), fields(turn_session = turn.session_id))]
    pub fn complete_ai_turn(&mut self, turn: &AiTurn, result: Result<Coord, AiError>) -> bool {
        let current_id = self.session.as_ref().map(GameSession::id);
        if self.state != ControllerState::AwaitingAiMove || current_id != Some(turn.session_id) {
            debug!(?current_id, state = ?self.state, "Discarding stale AI result");
            return false;
        }

        let applied = result.and_then(|coord| {
            let session = self
                .session
                .as_mut()
                .ok_or(AiError::NoAvailableMoves)?;
            let mark = session.current();
            session
                .apply_move(coord.row, coord.col, Actor::Ai)
                .map(|evaluation| (mark, coord, evaluation))
                .map_err(|e| AiError::ResponseInvalid(e.to_string()))
        });

        match applied {
            Ok((mark, coord, evaluation)) => {
                self.after_move(mark, coord, evaluation);
                true
            }
            Err(e) => {
                self.recover_from_ai_error(e);
                false
            }
        }
    }

    /// Runs a whole AI turn: delay, provider call, application.
    ///
    /// Returns whether a move was placed.
    #[instrument(skip(self))]
    pub async fn play_ai_turn(&mut self) -> bool {
        if self.state != ControllerState::AwaitingAiMove {
            return false;
        }
        if !self.ai_delay.is_zero() {
            tokio::time::sleep(self.ai_delay).await;
        }
        let Some(turn) = self.begin_ai_turn() else {
            return false;
        };

        let result = match self.ai.clone() {
            Some(provider) => {
                provider
                    .select_move(&turn.board, turn.ai_mark, turn.difficulty)
                    .await
            }
            None => Err(AiError::Transport(LlmError::new(
                "no AI provider configured".to_string(),
            ))),
        };
        self.complete_ai_turn(&turn, result)
    }

    fn after_move(&mut self, mark: Mark, coord: Coord, evaluation: Evaluation) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        let terminal = match evaluation {
            Evaluation::Win(info) => {
                self.state = ControllerState::Terminal(Outcome::Win(info));
                self.status = format!("Player {} wins!", info.winner);
                Some(EventKind::Won(info))
            }
            Evaluation::Draw => {
                self.state = ControllerState::Terminal(Outcome::Draw);
                self.status = "It's a draw!".to_string();
                Some(EventKind::Draw)
            }
            Evaluation::InProgress => {
                let next = session.current();
                self.state = if session.is_ai_turn() {
                    ControllerState::AwaitingAiMove
                } else {
                    ControllerState::AwaitingMove(next)
                };
                self.status = format!("Player {}'s turn", next);
                None
            }
        };

        info!(%mark, %coord, state = ?self.state, "Move accepted");
        self.emit(EventKind::MoveAccepted { mark, coord });
        if let Some(kind) = terminal {
            self.emit(kind);
        }
    }

    fn recover_from_ai_error(&mut self, e: AiError) {
        error!(error = %e, "AI failed to move, handing the turn back");
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.yield_to_human();
        self.state = ControllerState::AwaitingMove(session.current());
        self.status = "AI error. Your turn!".to_string();
        self.emit(EventKind::AiError(e.to_string()));
    }

    fn emit(&self, kind: EventKind) {
        let event = GameEvent {
            kind,
            snapshot: self.snapshot(),
        };
        if self.events.send(event).is_err() {
            debug!("No event subscribers");
        }
    }
}
