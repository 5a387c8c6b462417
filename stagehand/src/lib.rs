//! # stagehand
//!
//! Controller response helpers and XPath queries for Rust web applications.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient access.
//! You can depend on `stagehand` to get everything, or depend on individual
//! crates for finer-grained control.

/// Core types, settings, logging, and error types.
pub use stagehand_core as core;

/// HTTP layer: request context, action results, controller helpers.
#[cfg(feature = "http")]
pub use stagehand_http as http;

/// Helper libraries: XPath queries.
#[cfg(feature = "libs")]
pub use stagehand_libs as libs;

/// Axum, for building routers around controller actions.
pub use axum;

/// The XML document model queried by the XPath helpers.
pub use sxd_document;

/// Tracing macros used by the framework.
pub use tracing;
