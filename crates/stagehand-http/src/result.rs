//! Action results.
//!
//! An [`ActionResult`] is the immutable outcome a controller action hands back
//! to the dispatching layer. It converts into an Axum response via
//! [`IntoResponse`].

use axum::response::IntoResponse;
use http::{HeaderValue, StatusCode};

use stagehand_core::SETTINGS;

use crate::call::RouteCall;
use crate::content::Payload;

/// The outcome of a controller action.
///
/// # Examples
///
/// ```
/// use stagehand_http::{ActionResult, Content};
///
/// let result = ActionResult::ok(Content::xml("<feed/>"));
/// assert_eq!(result.status(), http::StatusCode::OK);
/// assert_eq!(result.payload().unwrap().content_type(), "application/xml");
///
/// let result = ActionResult::redirect("/login");
/// assert_eq!(result.status(), http::StatusCode::SEE_OTHER);
/// assert_eq!(result.redirect_url(), Some("/login"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// 200 OK.
    Ok(Payload),
    /// 404 Not Found.
    NotFound(Payload),
    /// 403 Forbidden.
    Forbidden(Payload),
    /// 400 Bad Request.
    BadRequest(Payload),
    /// 303 See Other, to the contained URL.
    Redirect(String),
}

impl ActionResult {
    /// Creates a 200 OK result.
    pub fn ok(payload: impl Into<Payload>) -> Self {
        Self::Ok(payload.into())
    }

    /// Creates a 200 OK result from a raw string at an explicit media type.
    pub fn ok_as(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::Ok(Payload::text(body, content_type))
    }

    /// Creates a 404 Not Found result.
    pub fn not_found(payload: impl Into<Payload>) -> Self {
        Self::NotFound(payload.into())
    }

    /// Creates a 404 Not Found result from a raw string at an explicit media type.
    pub fn not_found_as(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::NotFound(Payload::text(body, content_type))
    }

    /// Creates a 403 Forbidden result.
    pub fn forbidden(payload: impl Into<Payload>) -> Self {
        Self::Forbidden(payload.into())
    }

    /// Creates a 403 Forbidden result from a raw string at an explicit media type.
    pub fn forbidden_as(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::Forbidden(Payload::text(body, content_type))
    }

    /// Creates a 400 Bad Request result.
    pub fn bad_request(payload: impl Into<Payload>) -> Self {
        Self::BadRequest(payload.into())
    }

    /// Creates a 400 Bad Request result from a raw string at an explicit media type.
    pub fn bad_request_as(body: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self::BadRequest(Payload::text(body, content_type))
    }

    /// Creates a redirect to `url`. The URL is kept verbatim.
    pub fn redirect(url: impl Into<String>) -> Self {
        Self::Redirect(url.into())
    }

    /// Creates a redirect to the URL a reverse-routing call resolves to.
    pub fn redirect_to<C: RouteCall + ?Sized>(call: &C) -> Self {
        Self::redirect(call.url())
    }

    /// Returns the HTTP status code.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Ok(_) => StatusCode::OK,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Redirect(_) => StatusCode::SEE_OTHER,
        }
    }

    /// Returns the payload, or `None` for redirects.
    pub const fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Ok(payload)
            | Self::NotFound(payload)
            | Self::Forbidden(payload)
            | Self::BadRequest(payload) => Some(payload),
            Self::Redirect(_) => None,
        }
    }

    /// Returns the redirect target, or `None` for non-redirects.
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Self::Redirect(url) => Some(url),
            _ => None,
        }
    }
}

/// Returns the `Content-Type` header value, with a charset for textual types.
fn full_content_type(content_type: &str, charset: &str) -> String {
    if content_type.contains("charset=") {
        content_type.to_string()
    } else if content_type.starts_with("text/")
        || content_type.contains("json")
        || content_type.contains("xml")
    {
        format!("{content_type}; charset={charset}")
    } else {
        content_type.to_string()
    }
}

impl IntoResponse for ActionResult {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let charset = SETTINGS
            .try_get()
            .map_or("utf-8", |settings| settings.default_charset.as_str());

        let (headers, body) = match self {
            Self::Redirect(url) => match HeaderValue::from_str(&url) {
                Ok(location) => ([(http::header::LOCATION, location)], String::new()),
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "redirect target is not a valid header value");
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                        .into_response();
                }
            },
            Self::Ok(payload)
            | Self::NotFound(payload)
            | Self::Forbidden(payload)
            | Self::BadRequest(payload) => {
                let content_type = full_content_type(payload.content_type(), charset);
                match HeaderValue::from_str(&content_type) {
                    Ok(value) => (
                        [(http::header::CONTENT_TYPE, value)],
                        payload.body().to_string(),
                    ),
                    Err(e) => {
                        tracing::error!(
                            content_type = %content_type,
                            error = %e,
                            "content type is not a valid header value"
                        );
                        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                            .into_response();
                    }
                }
            }
        };

        (status, headers, body).into_response()
    }
}
