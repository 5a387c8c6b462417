//! # stagehand-core
//!
//! Core types for the stagehand framework: error types, settings, settings
//! loading, and logging. This crate has no framework dependencies and is the
//! foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Framework settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{StagehandError, StagehandResult};
pub use settings::{Settings, SETTINGS};
