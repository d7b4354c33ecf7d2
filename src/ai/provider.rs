//! AI move selection with mandatory fallback.

use super::oracle::MoveOracle;
use super::request::MoveRequest;
use super::response::MoveResponse;
use super::strategy;
use crate::error::AiError;
use crate::games::tictactoe::{Board, Coord, Mark};
use crate::llm_client::LlmError;
use crate::session::Difficulty;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Default limit on one remote round trip.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where moves come from.
#[derive(Clone)]
pub enum Backend {
    /// A remote reasoning service, with random fallback.
    Remote(Arc<dyn MoveOracle>),
    /// The local tiered strategies.
    Local,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Remote(oracle) => f.debug_tuple("Remote").field(&oracle.name()).finish(),
            Backend::Local => f.write_str("Local"),
        }
    }
}

/// Chooses moves for the AI player.
///
/// Never mutates a board; the caller applies the returned cell through
/// the same validation path as a human move.
#[derive(Debug)]
pub struct AiMoveProvider {
    backend: Backend,
    request_timeout: Duration,
    rng: Mutex<StdRng>,
}

impl AiMoveProvider {
    /// Creates a provider backed by a remote oracle.
    #[instrument(skip(oracle), fields(oracle = oracle.name()))]
    pub fn remote(oracle: Arc<dyn MoveOracle>) -> Self {
        info!("Creating remote AI move provider");
        Self::with_backend(Backend::Remote(oracle))
    }

    /// Creates a provider that only uses local strategies.
    #[instrument]
    pub fn local() -> Self {
        info!("Creating local AI move provider");
        Self::with_backend(Backend::Local)
    }

    fn with_backend(backend: Backend) -> Self {
        Self {
            backend,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Sets the remote round-trip limit.
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Seeds the random source, for reproducible play.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Returns the backend.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Selects an empty cell for `ai_mark`.
    ///
    /// Remote failures of any kind (transport, timeout, malformed or illegal
    /// reply) fall back to a uniformly random empty cell. The only error
    /// returned is [`AiError::NoAvailableMoves`].
    #[instrument(skip(self, board), fields(backend = ?self.backend))]
    pub async fn select_move(
        &self,
        board: &Board,
        ai_mark: Mark,
        difficulty: Difficulty,
    ) -> Result<Coord, AiError> {
        if board.empty_cells().is_empty() {
            error!("AI asked to move on a full board");
            return Err(AiError::NoAvailableMoves);
        }

        match &self.backend {
            Backend::Local => {
                let choice =
                    self.with_rng(|rng| strategy::choose_move(board, ai_mark, difficulty, rng));
                choice.ok_or(AiError::NoAvailableMoves)
            }
            Backend::Remote(oracle) => {
                match self.ask_remote(oracle.as_ref(), board, ai_mark, difficulty).await {
                    Ok(coord) => {
                        info!(%coord, "Remote AI chose move");
                        Ok(coord)
                    }
                    Err(e) => {
                        warn!(error = %e, "Remote AI move failed, falling back to a random move");
                        self.fallback_move(board)
                    }
                }
            }
        }
    }

    /// Uniformly random empty cell.
    #[instrument(skip(self, board))]
    pub fn fallback_move(&self, board: &Board) -> Result<Coord, AiError> {
        let choice = self.with_rng(|rng| strategy::random_move(board, rng));
        debug!(?choice, "Fallback move");
        choice.ok_or(AiError::NoAvailableMoves)
    }

    async fn ask_remote(
        &self,
        oracle: &dyn MoveOracle,
        board: &Board,
        ai_mark: Mark,
        difficulty: Difficulty,
    ) -> Result<Coord, AiError> {
        let request = MoveRequest::new(*board, ai_mark, difficulty);
        debug!(oracle = oracle.name(), "Requesting remote move");

        let reply = tokio::time::timeout(self.request_timeout, oracle.propose(&request))
            .await
            .map_err(|_| {
                AiError::Transport(LlmError::new(format!(
                    "no reply within {:?}",
                    self.request_timeout
                )))
            })??;

        MoveResponse::parse(&reply)?.validate(board)
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted(&'static str);

    #[async_trait::async_trait]
    impl MoveOracle for Scripted {
        async fn propose(&self, _request: &MoveRequest) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_remote_reply_is_used_when_valid() {
        let provider = AiMoveProvider::remote(Arc::new(Scripted(r#"{"row": 2, "col": 0}"#)));
        let coord = provider
            .select_move(&Board::empty(), Mark::O, Difficulty::Hard)
            .await
            .unwrap();
        assert_eq!(coord, Coord { row: 2, col: 0 });
    }

    #[tokio::test]
    async fn test_local_backend_plays_hard() {
        let board = Board::empty()
            .place(0, 0, Mark::O)
            .and_then(|b| b.place(0, 1, Mark::O))
            .and_then(|b| b.place(1, 1, Mark::X))
            .and_then(|b| b.place(2, 2, Mark::X))
            .unwrap();
        let provider = AiMoveProvider::local().with_seed(1);
        let coord = provider.select_move(&board, Mark::O, Difficulty::Hard).await.unwrap();
        assert_eq!(coord, Coord { row: 0, col: 2 });
    }

    #[tokio::test]
    async fn test_full_board_reports_no_moves() {
        use crate::games::tictactoe::Mark::{O, X};
        let board = Board::from_rows([
            [Some(X), Some(O), Some(X)],
            [Some(O), Some(X), Some(X)],
            [Some(O), Some(X), Some(O)],
        ]);
        let provider = AiMoveProvider::remote(Arc::new(Scripted(r#"{"row": 0, "col": 0}"#)));
        assert!(matches!(
            provider.select_move(&board, O, Difficulty::Easy).await,
            Err(AiError::NoAvailableMoves)
        ));
    }
}
