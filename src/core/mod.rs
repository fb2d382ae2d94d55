//! # Core Module
//!
//! Core domain types, configuration, and error handling for the persona tools.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with config and error modules

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::Config;
pub use error::{ErrorKind, PersonaError, Result};
