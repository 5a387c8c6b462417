//! Reverse-routing handles.
//!
//! A reverse router hands out values implementing [`RouteCall`]; the response
//! helpers only ever ask them for their URL. [`Call`] is the plain value type
//! for a resolved route.

use std::fmt;

use http::Method;

use crate::request::HttpRequest;

/// A resolved reverse route.
pub trait RouteCall {
    /// The URL this route resolves to.
    fn url(&self) -> String;

    /// The HTTP method the route answers to.
    fn method(&self) -> Method {
        Method::GET
    }
}

/// A concrete route: an HTTP method and a URL.
///
/// # Examples
///
/// ```
/// use stagehand_http::{Call, HttpRequest, RouteCall};
///
/// let call = Call::get("/feeds/3/");
/// let request = HttpRequest::builder().header("host", "example.com").build();
/// assert_eq!(call.url(), "/feeds/3/");
/// assert_eq!(call.absolute_url(&request), "http://example.com/feeds/3/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    method: Method,
    url: String,
}

impl Call {
    /// Creates a call with an explicit method.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// Creates a GET call.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a POST call.
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Resolves the URL against the scheme and host of `request`.
    pub fn absolute_url(&self, request: &HttpRequest) -> String {
        request.build_absolute_uri(Some(&self.url))
    }
}

impl RouteCall for Call {
    fn url(&self) -> String {
        self.url.clone()
    }

    fn method(&self) -> Method {
        self.method.clone()
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
