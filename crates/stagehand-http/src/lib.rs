//! # stagehand-http
//!
//! HTTP layer for the stagehand framework. Provides the request view, the
//! request-scoped context, payload and result types, reverse-routing handles,
//! and the controller helpers that tie them together.
//!
//! ## Modules
//!
//! - [`request`] - The inbound [`HttpRequest`]
//! - [`context`] - Task- and thread-scoped [`RequestContext`]
//! - [`content`] - [`Content`] and [`Payload`]
//! - [`result`] - [`ActionResult`] and its Axum conversion
//! - [`call`] - [`RouteCall`] and [`Call`]
//! - [`controller`] - `ok`, `not_found`, `forbidden`, `bad_request`, `redirect`, `request`
//! - [`middleware`] - Axum middleware establishing the request context

pub mod call;
pub mod content;
pub mod context;
pub mod controller;
pub mod middleware;
pub mod request;
pub mod result;

pub use call::{Call, RouteCall};
pub use content::{Content, Payload};
pub use context::RequestContext;
pub use request::{HttpRequest, HttpRequestBuilder};
pub use result::ActionResult;
