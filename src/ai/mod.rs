//! AI move selection: remote request/response handling plus local strategies.

mod oracle;
mod provider;
mod request;
mod response;
pub mod strategy;

pub use oracle::MoveOracle;
pub use provider::{AiMoveProvider, Backend, DEFAULT_REQUEST_TIMEOUT};
pub use request::MoveRequest;
pub use response::MoveResponse;
