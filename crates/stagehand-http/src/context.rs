//! Request-scoped context.
//!
//! A [`RequestContext`] carries the inbound request for the duration of one
//! request's processing. It is never stored in a shared global: async code
//! installs it in task-local storage with [`RequestContext::scope`], and
//! synchronous code installs it in a thread-local stack with
//! [`RequestContext::sync_scope`]. Concurrent requests therefore never observe
//! each other's context.
//!
//! ```
//! use stagehand_http::context::{current_request, RequestContext};
//! use stagehand_http::HttpRequest;
//!
//! let request = HttpRequest::builder().path("/feeds/").build();
//! let path = RequestContext::new(request)
//!     .sync_scope(|| current_request().map(|r| r.path().to_string()));
//! assert_eq!(path.unwrap(), "/feeds/");
//!
//! // Outside of any scope there is no request.
//! assert!(current_request().is_err());
//! ```

use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;

use stagehand_core::{StagehandError, StagehandResult};

use crate::request::HttpRequest;

tokio::task_local! {
    static TASK_CONTEXT: RequestContext;
}

thread_local! {
    /// Stack of synchronously scoped contexts; the top entry is active.
    static THREAD_CONTEXT: RefCell<Vec<RequestContext>> = const { RefCell::new(Vec::new()) };
}

/// The state bound to a single request while it is being processed.
#[derive(Debug, Clone)]
pub struct RequestContext {
    id: String,
    request: Arc<HttpRequest>,
}

impl RequestContext {
    /// Creates a context for `request` with a freshly generated request id.
    pub fn new(request: HttpRequest) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), request)
    }

    /// Creates a context with an explicit request id.
    pub fn with_id(id: impl Into<String>, request: HttpRequest) -> Self {
        Self {
            id: id.into(),
            request: Arc::new(request),
        }
    }

    /// Returns the request id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the request bound to this context.
    pub const fn request(&self) -> &Arc<HttpRequest> {
        &self.request
    }

    /// Runs `future` with this context installed for the current task.
    ///
    /// Nested scopes shadow the outer one until they complete. Synchronous
    /// scopes entered outside the future, such as one around a `block_on`
    /// call, are hidden while it is polled.
    pub async fn scope<F: Future>(self, future: F) -> F::Output {
        tracing::debug!(request_id = %self.id, "entering request context");
        let mut future = std::pin::pin!(future);
        let isolated = std::future::poll_fn(move |cx| {
            let _hidden = HiddenThreadScopes::take();
            future.as_mut().poll(cx)
        });
        TASK_CONTEXT.scope(self, isolated).await
    }

    /// Runs `f` with this context installed for the current thread.
    ///
    /// The context is removed when `f` returns or unwinds.
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        tracing::debug!(request_id = %self.id, "entering request context");
        THREAD_CONTEXT.with(|stack| stack.borrow_mut().push(self));
        let _guard = ThreadScopeGuard;
        f()
    }

    /// Returns the innermost active context.
    ///
    /// # Errors
    ///
    /// Returns [`StagehandError::NoActiveContext`] outside of any scope.
    pub fn current() -> StagehandResult<Self> {
        // Task scopes hide outer synchronous scopes while polling, so any
        // entry on the thread stack was entered inside the active task scope.
        if let Some(context) = THREAD_CONTEXT.with(|stack| stack.borrow().last().cloned()) {
            return Ok(context);
        }
        TASK_CONTEXT
            .try_with(Clone::clone)
            .map_err(|_| StagehandError::NoActiveContext)
    }
}

struct ThreadScopeGuard;

impl Drop for ThreadScopeGuard {
    fn drop(&mut self) {
        THREAD_CONTEXT.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Moves the thread's synchronous scopes aside until dropped.
struct HiddenThreadScopes(Vec<RequestContext>);

impl HiddenThreadScopes {
    fn take() -> Self {
        Self(THREAD_CONTEXT.with(|stack| std::mem::take(&mut *stack.borrow_mut())))
    }
}

impl Drop for HiddenThreadScopes {
    fn drop(&mut self) {
        let outer = std::mem::take(&mut self.0);
        THREAD_CONTEXT.with(|stack| *stack.borrow_mut() = outer);
    }
}

/// Returns the request bound to the active request context.
///
/// Behind the request-context middleware the request body is always empty.
///
/// # Errors
///
/// Returns [`StagehandError::NoActiveContext`] when called outside of a
/// request's processing scope.
pub fn current_request() -> StagehandResult<Arc<HttpRequest>> {
    RequestContext::current().map(|context| Arc::clone(context.request()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_for(path: &str) -> HttpRequest {
        HttpRequest::builder().path(path).build()
    }

    #[test]
    fn test_no_active_context() {
        let err = current_request().unwrap_err();
        assert!(matches!(err, StagehandError::NoActiveContext));
    }

    #[test]
    fn test_sync_scope_binds_and_clears() {
        let path = RequestContext::new(request_for("/inside/"))
            .sync_scope(|| current_request().unwrap().path().to_string());
        assert_eq!(path, "/inside/");
        assert!(current_request().is_err());
    }

    #[test]
    fn test_sync_scope_nesting_restores_outer() {
        RequestContext::with_id("outer", request_for("/outer/")).sync_scope(|| {
            RequestContext::with_id("inner", request_for("/inner/")).sync_scope(|| {
                assert_eq!(RequestContext::current().unwrap().id(), "inner");
            });
            assert_eq!(RequestContext::current().unwrap().id(), "outer");
        });
        assert!(RequestContext::current().is_err());
    }

    #[test]
    fn test_sync_scope_cleared_after_panic() {
        let result = std::panic::catch_unwind(|| {
            RequestContext::new(request_for("/boom/")).sync_scope(|| panic!("handler failed"));
        });
        assert!(result.is_err());
        assert!(current_request().is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = RequestContext::new(request_for("/"));
        let b = RequestContext::new(request_for("/"));
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_task_scope() {
        let context = RequestContext::with_id("task-1", request_for("/task/"));
        let path = context
            .scope(async {
                tokio::task::yield_now().await;
                current_request().unwrap().path().to_string()
            })
            .await;
        assert_eq!(path, "/task/");
        assert!(current_request().is_err());
    }

    #[tokio::test]
    async fn test_sync_scope_shadows_task_scope() {
        RequestContext::with_id("task", request_for("/task/"))
            .scope(async {
                let id = RequestContext::with_id("sync", request_for("/sync/"))
                    .sync_scope(|| RequestContext::current().unwrap().id().to_string());
                assert_eq!(id, "sync");
                assert_eq!(RequestContext::current().unwrap().id(), "task");
            })
            .await;
    }

    #[test]
    fn test_task_scope_inside_sync_scope() {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();

        let inner = RequestContext::with_id("outer-sync", request_for("/sync/")).sync_scope(|| {
            let inner = runtime.block_on(
                RequestContext::with_id("inner-task", request_for("/task/")).scope(async {
                    let before = RequestContext::current().unwrap().id().to_string();
                    tokio::task::yield_now().await;
                    let nested = RequestContext::with_id("nested-sync", request_for("/nested/"))
                        .sync_scope(|| RequestContext::current().unwrap().id().to_string());
                    assert_eq!(nested, "nested-sync");
                    assert_eq!(RequestContext::current().unwrap().id(), before);
                    before
                }),
            );
            assert_eq!(RequestContext::current().unwrap().id(), "outer-sync");
            inner
        });

        assert_eq!(inner, "inner-task");
        assert!(RequestContext::current().is_err());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_tasks_are_isolated() {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let path = format!("/item/{i}/");
                tokio::spawn(RequestContext::new(request_for(&path)).scope(async move {
                    for _ in 0..10 {
                        tokio::task::yield_now().await;
                        assert_eq!(current_request().unwrap().path(), path);
                    }
                }))
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    }
}
