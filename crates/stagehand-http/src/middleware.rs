//! Axum middleware that establishes the request context.
//!
//! ```rust,no_run
//! use axum::{middleware, routing::get, Router};
//! use stagehand_http::controller::{ok, request};
//! use stagehand_http::middleware::request_context_middleware;
//! use stagehand_http::ActionResult;
//!
//! async fn whoami() -> ActionResult {
//!     match request() {
//!         Ok(req) => ok(req.path().to_string()),
//!         Err(e) => ActionResult::bad_request(e.to_string()),
//!     }
//! }
//!
//! let app: Router = Router::new()
//!     .route("/whoami", get(whoami))
//!     .layer(middleware::from_fn(request_context_middleware));
//! ```

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use http::HeaderValue;
use tracing::Instrument;

use stagehand_core::logging::request_span;

use crate::context::RequestContext;
use crate::request::HttpRequest;

/// Header used to propagate the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Runs the rest of the stack inside a [`RequestContext`] for this request.
///
/// The context's request is built from the request head; the body stays with
/// the downstream handler. An incoming `X-Request-Id` is reused as the request
/// id, otherwise a new one is generated. The id is echoed on the response.
pub async fn request_context_middleware(request: Request, next: Next) -> Response {
    let head = HttpRequest::from_head(request.method(), request.uri(), request.headers(), Vec::new());
    let context = match request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|id| !id.is_empty())
    {
        Some(id) => RequestContext::with_id(id, head),
        None => RequestContext::new(head),
    };

    let request_id = context.id().to_string();
    let span = request_span(&request_id);

    let mut response = context.scope(next.run(request)).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
