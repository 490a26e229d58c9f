//! Client for a remote yokai character generator
//!
//! Collects a yokai type, power level, and optional element, asks the
//! generation service for a character, and renders or exports the returned
//! record.

pub mod app;
pub mod controller;
pub mod error;
pub mod export;
pub mod generator;
pub mod models;
pub mod render;

pub use error::{Error, Result};
