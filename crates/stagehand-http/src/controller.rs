//! Controller helpers.
//!
//! Free functions for building the common [`ActionResult`]s from inside an
//! action, plus access to the request bound to the current request context.
//!
//! ```
//! use stagehand_http::controller::{bad_request, ok, redirect_to, request};
//! use stagehand_http::{ActionResult, Call, Content};
//!
//! fn show_feed() -> ActionResult {
//!     let Ok(request) = request() else {
//!         return bad_request("no request");
//!     };
//!     match request.query_param("format").as_deref() {
//!         Some("atom") => ok(Content::xml("<feed/>")),
//!         Some(_) => bad_request("unknown format"),
//!         None => redirect_to(&Call::get("/feeds/?format=atom")),
//!     }
//! }
//! ```

use std::sync::Arc;

use stagehand_core::StagehandResult;

use crate::call::RouteCall;
use crate::content::Payload;
use crate::context;
use crate::request::HttpRequest;
use crate::result::ActionResult;

/// Returns the request being processed.
///
/// Behind [`request_context_middleware`](crate::middleware::request_context_middleware)
/// the returned request carries the request head but an empty body; read the
/// body through the handler's own extractors.
///
/// # Errors
///
/// Returns [`StagehandError::NoActiveContext`](stagehand_core::StagehandError::NoActiveContext)
/// when called outside of a request's processing scope.
pub fn request() -> StagehandResult<Arc<HttpRequest>> {
    context::current_request()
}

/// 200 OK with `payload`. Strings are served as `text/html`.
pub fn ok(payload: impl Into<Payload>) -> ActionResult {
    ActionResult::ok(payload)
}

/// 200 OK with a raw string at `content_type`.
pub fn ok_as(body: impl Into<String>, content_type: impl Into<String>) -> ActionResult {
    ActionResult::ok_as(body, content_type)
}

/// 404 Not Found with `payload`. Strings are served as `text/html`.
pub fn not_found(payload: impl Into<Payload>) -> ActionResult {
    ActionResult::not_found(payload)
}

/// 404 Not Found with a raw string at `content_type`.
pub fn not_found_as(body: impl Into<String>, content_type: impl Into<String>) -> ActionResult {
    ActionResult::not_found_as(body, content_type)
}

/// 403 Forbidden with `payload`. Strings are served as `text/html`.
pub fn forbidden(payload: impl Into<Payload>) -> ActionResult {
    ActionResult::forbidden(payload)
}

/// 403 Forbidden with a raw string at `content_type`.
pub fn forbidden_as(body: impl Into<String>, content_type: impl Into<String>) -> ActionResult {
    ActionResult::forbidden_as(body, content_type)
}

/// 400 Bad Request with `payload`. Strings are served as `text/html`.
pub fn bad_request(payload: impl Into<Payload>) -> ActionResult {
    ActionResult::bad_request(payload)
}

/// 400 Bad Request with a raw string at `content_type`.
pub fn bad_request_as(body: impl Into<String>, content_type: impl Into<String>) -> ActionResult {
    ActionResult::bad_request_as(body, content_type)
}

/// Redirect to `url`, unmodified.
pub fn redirect(url: impl Into<String>) -> ActionResult {
    ActionResult::redirect(url)
}

/// Redirect to the URL `call` resolves to.
pub fn redirect_to<C: RouteCall + ?Sized>(call: &C) -> ActionResult {
    ActionResult::redirect_to(call)
}
