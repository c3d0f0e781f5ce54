//! Handler trait and type erasure.
//!
//! The router stores handlers of different concrete types in one map, so each
//! one is boxed behind `dyn ErasedHandler`:
//!
//! ```text
//! async fn lookup(req: Request) -> Response { … }   ← plain handler
//! with_state(state, lookup_with)                     ← handler that needs shared state
//!        ↓ router.get("/", …)
//! into_boxed_handler()                              ← Handler impls
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req)  at request time               ← one vtable dispatch
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler` trait's `into_boxed_handler` method.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler.
///
/// Satisfied by any `async fn(Request) -> impl IntoResponse`, and by the
/// value returned from [`with_state`]. Sealed: only those two shapes qualify.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Plain async functions ────────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

// ── Handlers with shared state ───────────────────────────────────────────────

/// Binds read-only `state` to a handler of the form
/// `async fn(Arc<S>, Request) -> impl IntoResponse`.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use onair::{Request, Response, Router, handler::with_state};
///
/// struct Greeting(&'static str);
///
/// async fn greet(state: Arc<Greeting>, _req: Request) -> Response {
///     Response::text(state.0)
/// }
///
/// let app = Router::new().get("/", with_state(Arc::new(Greeting("hi")), greet));
/// ```
pub fn with_state<S, F>(state: Arc<S>, handler: F) -> WithState<S, F> {
    WithState { state, handler }
}

/// A handler bound to shared state. Built by [`with_state`].
pub struct WithState<S, F> {
    state: Arc<S>,
    handler: F,
}

impl<S, F, Fut, R> private::Sealed for WithState<S, F>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<S, F, Fut, R> Handler for WithState<S, F>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(self)
    }
}

impl<S, F, Fut, R> ErasedHandler for WithState<S, F>
where
    S: Send + Sync + 'static,
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.handler)(Arc::clone(&self.state), req);
        Box::pin(async move { fut.await.into_response() })
    }
}
