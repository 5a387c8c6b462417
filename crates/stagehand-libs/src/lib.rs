//! # stagehand-libs
//!
//! Helper libraries for stagehand applications.
//!
//! - [`xpath`] - XPath queries with optional namespace bindings

pub mod xpath;

pub use xpath::{NamespaceBindings, NodeList, XPathError, XPathResult};
