//! HTTP request type.
//!
//! [`HttpRequest`] is the read-only view of an inbound request that handlers
//! reach through the request context: method, path, query string, headers,
//! body, and scheme.

use std::borrow::Cow;

use http::{HeaderMap, Method, Uri};

/// An inbound HTTP request.
///
/// Instances are typically created from an incoming Axum request via
/// [`HttpRequest::from_axum`] or [`HttpRequest::from_head`], or in tests via
/// [`HttpRequest::builder`].
///
/// # Examples
///
/// ```
/// use stagehand_http::HttpRequest;
///
/// let request = HttpRequest::builder()
///     .method(http::Method::GET)
///     .path("/feeds/42/")
///     .query_string("format=atom")
///     .build();
///
/// assert_eq!(request.method(), &http::Method::GET);
/// assert_eq!(request.path(), "/feeds/42/");
/// assert_eq!(request.query_param("format").as_deref(), Some("atom"));
/// ```
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    path: String,
    query_string: String,
    headers: HeaderMap,
    body: Vec<u8>,
    scheme: String,
}

impl HttpRequest {
    /// Creates a new [`HttpRequestBuilder`] for constructing an `HttpRequest`.
    pub fn builder() -> HttpRequestBuilder {
        HttpRequestBuilder::default()
    }

    /// Creates an `HttpRequest` from an Axum/hyper request head and its body bytes.
    pub fn from_axum(parts: http::request::Parts, body: Vec<u8>) -> Self {
        Self::from_head(&parts.method, &parts.uri, &parts.headers, body)
    }

    /// Creates an `HttpRequest` from borrowed request head components.
    ///
    /// Used where the original request must stay intact for a downstream
    /// handler, such as in middleware.
    pub fn from_head(method: &Method, uri: &Uri, headers: &HeaderMap, body: Vec<u8>) -> Self {
        let scheme = if headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.eq_ignore_ascii_case("https"))
            || uri.scheme_str() == Some("https")
        {
            "https"
        } else {
            "http"
        };

        Self {
            method: method.clone(),
            path: uri.path().to_string(),
            query_string: uri.query().unwrap_or("").to_string(),
            headers: headers.clone(),
            body,
            scheme: scheme.to_string(),
        }
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path (without query string).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw query string (without the leading `?`).
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    /// Returns the first value of a query parameter, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        url::form_urlencoded::parse(self.query_string.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Returns the request headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string, if present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the content type of the request body, if set.
    pub fn content_type(&self) -> Option<&str> {
        self.header(http::header::CONTENT_TYPE.as_str())
    }

    /// Returns the raw request body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the URL scheme (`"http"` or `"https"`).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns `true` if the request uses HTTPS.
    pub fn is_secure(&self) -> bool {
        self.scheme == "https"
    }

    /// Returns the host from the `Host` header, or `"localhost"`.
    pub fn host(&self) -> &str {
        self.header(http::header::HOST.as_str()).unwrap_or("localhost")
    }

    /// Returns the full path including the query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use stagehand_http::HttpRequest;
    ///
    /// let request = HttpRequest::builder()
    ///     .path("/feeds/")
    ///     .query_string("page=2")
    ///     .build();
    /// assert_eq!(request.full_path(), "/feeds/?page=2");
    /// ```
    pub fn full_path(&self) -> String {
        if self.query_string.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string)
        }
    }

    /// Builds an absolute URI from the current request.
    ///
    /// If `location` is `None`, uses the request's full path. If `location` is
    /// already absolute (starts with `http://` or `https://`), it is returned as-is.
    pub fn build_absolute_uri(&self, location: Option<&str>) -> String {
        let scheme = &self.scheme;
        let host = self.host();
        match location {
            Some(loc) if loc.starts_with("http://") || loc.starts_with("https://") => {
                loc.to_string()
            }
            Some(loc) if loc.starts_with('/') => format!("{scheme}://{host}{loc}"),
            Some(loc) => format!("{scheme}://{host}/{loc}"),
            None => format!("{scheme}://{host}{}", self.full_path()),
        }
    }
}

/// Builder for constructing [`HttpRequest`] instances in tests.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    headers: HeaderMap,
    body: Vec<u8>,
    scheme: String,
}

impl Default for HttpRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query_string: String::new(),
            headers: HeaderMap::new(),
            body: Vec::new(),
            scheme: "http".to_string(),
        }
    }
}

impl HttpRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the request path.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Adds a header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::header::HeaderName::from_bytes(name.as_bytes()),
            http::HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Sets the URL scheme.
    #[must_use]
    pub fn scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_string();
        self
    }

    /// Builds the [`HttpRequest`].
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            path: self.path,
            query_string: self.query_string,
            headers: self.headers,
            body: self.body,
            scheme: self.scheme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = HttpRequest::builder().build();
        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.path(), "/");
        assert_eq!(request.query_string(), "");
        assert!(request.body().is_empty());
        assert!(!request.is_secure());
        assert_eq!(request.host(), "localhost");
    }

    #[test]
    fn test_query_param_decoding() {
        let request = HttpRequest::builder()
            .query_string("q=hello+world&tag=a%26b&tag=second")
            .build();
        assert_eq!(request.query_param("q").as_deref(), Some("hello world"));
        assert_eq!(request.query_param("tag").as_deref(), Some("a&b"));
        assert!(request.query_param("missing").is_none());
    }

    #[test]
    fn test_from_axum() {
        let req = http::Request::builder()
            .method(Method::POST)
            .uri("/upload/?kind=xml")
            .header("host", "example.com")
            .header("content-type", "application/xml")
            .header("x-forwarded-proto", "https")
            .body(())
            .unwrap();
        let (parts, ()) = req.into_parts();

        let request = HttpRequest::from_axum(parts, b"<a/>".to_vec());
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/upload/");
        assert_eq!(request.query_string(), "kind=xml");
        assert_eq!(request.content_type(), Some("application/xml"));
        assert_eq!(request.body(), b"<a/>");
        assert!(request.is_secure());
        assert_eq!(request.host(), "example.com");
    }

    #[test]
    fn test_full_path() {
        let request = HttpRequest::builder().path("/a/").build();
        assert_eq!(request.full_path(), "/a/");
        let request = HttpRequest::builder().path("/a/").query_string("x=1").build();
        assert_eq!(request.full_path(), "/a/?x=1");
    }

    #[test]
    fn test_build_absolute_uri() {
        let request = HttpRequest::builder()
            .path("/feeds/")
            .query_string("page=2")
            .header("host", "example.com")
            .build();
        assert_eq!(
            request.build_absolute_uri(None),
            "http://example.com/feeds/?page=2"
        );
        assert_eq!(
            request.build_absolute_uri(Some("/other/")),
            "http://example.com/other/"
        );
        assert_eq!(
            request.build_absolute_uri(Some("relative")),
            "http://example.com/relative"
        );
        assert_eq!(
            request.build_absolute_uri(Some("https://elsewhere.org/")),
            "https://elsewhere.org/"
        );
    }

    #[test]
    fn test_builder_ignores_invalid_header() {
        let request = HttpRequest::builder()
            .header("bad header", "value")
            .header("x-ok", "yes")
            .build();
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.header("x-ok"), Some("yes"));
    }
}
