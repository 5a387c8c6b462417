//! Integration tests for controller helpers running behind Axum.
//!
//! Tests cover:
//! 1. Handlers read the current request through the context middleware
//! 2. Results convert into responses with status, content type, and location
//! 3. Request ids are propagated and echoed
//! 4. The context request carries the head only; the body goes to the handler
//! 5. Concurrent requests observe only their own request

use axum::body::Body;
use axum::routing::get;
use axum::{middleware, Router};
use http::{Request, StatusCode};
use tower::ServiceExt;

use stagehand_core::StagehandError;
use stagehand_http::controller::{bad_request, forbidden, not_found, ok, redirect_to, request};
use stagehand_http::middleware::{request_context_middleware, REQUEST_ID_HEADER};
use stagehand_http::{ActionResult, Call, Content};

async fn echo_path() -> ActionResult {
    match request() {
        Ok(req) => ok_plain(req.path()),
        Err(e) => bad_request(e.to_string()),
    }
}

fn ok_plain(body: &str) -> ActionResult {
    ok(Content::plain(body))
}

async fn entry() -> ActionResult {
    let Ok(req) = request() else {
        return bad_request("no request");
    };
    match req.query_param("id").as_deref() {
        Some("secret") => forbidden("<p>hidden</p>"),
        Some("42") => ok(Content::xml("<entry id=\"42\"/>")),
        Some(_) => not_found("<p>no such entry</p>"),
        None => redirect_to(&Call::get("/entries/?id=42")),
    }
}

async fn context_body_len(body: String) -> ActionResult {
    match request() {
        Ok(req) => ok_plain(&format!("{} {}", req.body().len(), body.len())),
        Err(e) => bad_request(e.to_string()),
    }
}

async fn no_context() -> ActionResult {
    match request() {
        Err(StagehandError::NoActiveContext) => ok("no context"),
        _ => bad_request("unexpected context"),
    }
}

fn app() -> Router {
    let scoped = Router::new()
        .route("/echo/{*rest}", get(echo_path))
        .route("/entries/", get(entry))
        .route("/upload/", axum::routing::post(context_body_len))
        .layer(middleware::from_fn(request_context_middleware));

    Router::new().route("/bare/", get(no_context)).merge(scoped)
}

async fn send(uri: &str) -> axum::response::Response {
    app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn content_type(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_handler_reads_current_request() {
    let response = send("/echo/a/b/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/plain"));
    assert_eq!(body_text(response).await, "/echo/a/b/");
}

#[tokio::test]
async fn test_handler_without_middleware_has_no_context() {
    let response = send("/bare/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "no context");
}

#[tokio::test]
async fn test_result_statuses_and_types() {
    let response = send("/entries/?id=42").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/xml"));
    assert_eq!(body_text(response).await, "<entry id=\"42\"/>");

    let response = send("/entries/?id=secret").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(content_type(&response).starts_with("text/html"));

    let response = send("/entries/?id=7").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "<p>no such entry</p>");
}

#[tokio::test]
async fn test_redirect_to_call() {
    let response = send("/entries/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(http::header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap(),
        "/entries/?id=42"
    );
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/echo/x")
                .header(REQUEST_ID_HEADER, "trace-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(),
        "trace-123"
    );

    let response = send("/echo/y").await;
    let generated = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap();
    assert!(uuid_like(generated));
}

fn uuid_like(id: &str) -> bool {
    id.len() == 36 && id.chars().filter(|c| *c == '-').count() == 4
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_are_isolated() {
    let handles: Vec<_> = (0..32)
        .map(|i| {
            tokio::spawn(async move {
                let path = format!("/echo/{i}/");
                let response = send(&path).await;
                assert_eq!(body_text(response).await, path);
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_context_request_has_empty_body() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload/")
                .body(Body::from("payload"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "0 7");
}
