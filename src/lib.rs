//! Noughts - tic-tac-toe game core with a language-model opponent
//!
//! The crate owns the game state and rules, validates every move, and asks
//! an AI move provider for the computer's turn. The provider may delegate to
//! a remote language model, but always falls back to a local legal move, so
//! a game can be finished even with the AI service unavailable.
//!
//! # Architecture
//!
//! - **Games**: board model and win/draw evaluation
//! - **Session**: the state of one game and the move validator
//! - **AI**: request construction, reply validation, local strategies, fallback
//! - **Controller**: turn order and state machine, with transition events
//! - **Config**: TOML settings plus environment credentials
//!
//! # Example
//!
//! ```no_run
//! use noughts::{AiMoveProvider, GameController, GameMode, ControllerState};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut controller = GameController::new(Some(AiMoveProvider::local()));
//! controller.set_mode(GameMode::VsAi);
//! controller.new_game()?;
//!
//! controller.submit_move(1, 1);
//! if controller.state() == ControllerState::AwaitingAiMove {
//!     controller.play_ai_turn().await;
//! }
//! println!("{}", controller.snapshot().board);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod ai;
mod config;
mod controller;
mod error;
mod events;
mod games;
mod session;

/// LLM API clients (public for integration tests).
pub mod llm_client;

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    BOARD_SIZE, Board, Coord, Direction, Evaluation, LINES, Line, Mark, WinningInfo,
    check_winner, evaluate, is_full,
};

// Crate-level exports - Session and validation
pub use session::{Actor, Difficulty, GameMode, GameSession, SessionId, validate, validate_for};

// Crate-level exports - AI
pub use ai::strategy;
pub use ai::{
    AiMoveProvider, Backend, DEFAULT_REQUEST_TIMEOUT, MoveOracle, MoveRequest, MoveResponse,
};

// Crate-level exports - Controller and events
pub use controller::{AiTurn, ControllerState, DEFAULT_AI_DELAY, GameController, Outcome};
pub use events::{EventKind, GameEvent, Snapshot};

// Crate-level exports - Configuration
pub use config::{AiBackend, AiConfig, ConfigError};

// Crate-level exports - Errors
pub use error::{AiError, GameError, MoveError};

// Crate-level exports - LLM client
pub use llm_client::{GenerationOptions, LlmClient, LlmConfig, LlmError, LlmProvider};
