//! Generation service integration
//!
//! Provides the interface to the remote character-generation endpoint and an
//! in-memory stand-in for tests and offline harnesses.

pub mod client;
pub mod mock;

pub use client::GeneratorClient;
pub use mock::{MockGeneratorClient, MockReply};

use crate::models::{GenerationRequest, GenerationResponse};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GeneratorService: Send + Sync {
    /// Send one generation request and return the decoded envelope.
    ///
    /// Network failures surface as [`crate::Error::Transport`]; a body that is
    /// not a valid envelope surfaces as [`crate::Error::GenerationFailed`].
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}
