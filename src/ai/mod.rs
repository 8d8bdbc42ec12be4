//! Text-completion service integration
//!
//! The pipeline talks to the model through [`CompletionService`]; the Gemini
//! client is the production implementation and [`MockCompletionClient`]
//! scripts responses for tests and offline harnesses.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiCompletionClient;
pub use mock::{MockCompletionClient, MockReply};

use crate::models::CompletionRequest;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send one single-turn request and return the first candidate's text.
    ///
    /// A 2xx response without candidate text yields `""`. Rate limiting is
    /// retried internally; anything else that fails is a transport error.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
