use super::GeneratorService;
use crate::models::{GenerationRequest, GenerationResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// reqwest-backed client for the character-generation endpoint.
pub struct GeneratorClient {
    client: Client,
    endpoint: String,
}

impl GeneratorClient {
    /// Build a client for `endpoint`. `None` leaves requests without a timeout.
    pub fn new(endpoint: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::new_with_client(endpoint, builder.build()?))
    }

    pub fn new_with_client(endpoint: String, client: Client) -> Self {
        Self { client, endpoint }
    }
}

/// Render an error together with every `source()` below it, joined by `": "`.
///
/// reqwest's own `Display` stops at "error sending request for url (..)";
/// the OS-level cause only shows up further down the chain.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[async_trait]
impl GeneratorService for GeneratorClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        tracing::debug!(
            "Sending generation request to {} (yokai_type: {}, power_level: {})",
            self.endpoint,
            request.yokai_type,
            request.power_level
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let message = error_chain(&e);
                tracing::error!("Failed to send request to generation service: {}", message);
                Error::Transport(message)
            })?;

        // The envelope is authoritative; a non-2xx status with a JSON body
        // still carries `success`.
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Generation service responded with status {}", status);
        }

        let body = response.text().await.map_err(|e| {
            let message = error_chain(&e);
            tracing::error!("Failed to read generation response body: {}", message);
            Error::Transport(message)
        })?;

        // A body that is not JSON at all is a transport problem; JSON of the
        // wrong shape is a failed generation.
        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Generation response is not JSON: {}\nBody: {}", e, body);
            Error::Transport(e.to_string())
        })?;

        serde_json::from_value(value).map_err(|e| {
            tracing::error!("Failed to decode generation response: {}\nBody: {}", e, body);
            Error::GenerationFailed
        })
    }
}
