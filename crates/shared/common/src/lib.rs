//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling for HTTP
//! - Environment configuration helpers
//! - Validation message extraction

pub mod config;
pub mod error;
pub mod validation;

pub use config::{env_any, env_or, env_parse};
pub use error::{AppError, AppResult, INTERNAL_SERVER_ERROR};
pub use validation::first_message;
