//! The remote reasoning seam.

use super::request::MoveRequest;
use crate::llm_client::{GenerationOptions, LlmClient, LlmError};
use tracing::instrument;

/// A remote service that proposes a move as raw reply text.
///
/// Implementations only transport the request; parsing and validation
/// happen in the provider so every backend gets the same checks.
#[async_trait::async_trait]
pub trait MoveOracle: Send + Sync {
    /// Sends the request and returns the reply body.
    async fn propose(&self, request: &MoveRequest) -> Result<String, LlmError>;

    /// Returns a short name for logs.
    fn name(&self) -> &str;
}

#[async_trait::async_trait]
impl MoveOracle for LlmClient {
    #[instrument(skip(self, request), fields(difficulty = %request.difficulty))]
    async fn propose(&self, request: &MoveRequest) -> Result<String, LlmError> {
        let options = GenerationOptions {
            temperature: request.temperature(),
            response_schema: Some(request.response_schema()),
        };
        self.generate(request.system_prompt(), &request.prompt(), &options)
            .await
    }

    fn name(&self) -> &str {
        self.config().model()
    }
}
