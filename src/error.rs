//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! The `Validation`, `Transport` and `GenerationFailed` variants carry the
//! exact messages shown to the user next to the form.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Please enter a yokai type!")]
    Validation,

    #[error("Error connecting to server: {0}")]
    Transport(String),

    #[error("Failed to generate character")]
    GenerationFailed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
