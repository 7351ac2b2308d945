//! Scanner Core Library
//!
//! Shared types, API clients, and configuration for the new-wallet scanner.

pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
