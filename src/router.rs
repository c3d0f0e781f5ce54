//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. You register a path, you
//! get a handler; the optional CORS layer wraps every answer.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::cors::Cors;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    cors: Option<Cors>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), cors: None }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or is already registered for
    /// `method`. Routes are fixed at startup, so this is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    /// Answers CORS preflights and stamps every response with `cors`.
    pub fn with_cors(mut self, cors: Cors) -> Self {
        self.cors = Some(cors);
        self
    }

    /// Routes one request and produces one response.
    pub async fn handle(&self, req: Request) -> Response {
        let Some(cors) = &self.cors else {
            return self.route(req).await;
        };
        if let Some(preflight) = cors.preflight(&req) {
            return preflight;
        }
        let origin = req.header("origin").map(str::to_owned);
        let response = self.route(req).await;
        cors.apply(origin.as_deref(), response)
    }

    async fn route(&self, mut req: Request) -> Response {
        let found = self.lookup(req.method, &req.path).or_else(|| {
            // HEAD falls back to GET; hyper leaves the body off the wire.
            match req.method {
                Method::Head => self.lookup(Method::Get, &req.path),
                _ => None,
            }
        });
        match found {
            Some((handler, params)) => {
                req.params = params;
                handler.call(req).await
            }
            None if self.matches_other_method(req.method, &req.path) => {
                Response::status(Status::MethodNotAllowed)
            }
            None => Response::status(Status::NotFound),
        }
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    fn matches_other_method(&self, method: Method, path: &str) -> bool {
        self.routes
            .iter()
            .any(|(m, tree)| *m != method && tree.at(path).is_ok())
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn hello(req: Request) -> Response {
        Response::text(format!("hello {}", req.param("name").unwrap_or("?")))
    }

    #[tokio::test]
    async fn routes_by_method_and_path() {
        let router = Router::new().get("/hello/{name}", hello);

        let response = router.handle(Request::new(Method::Get, "/hello/yui")).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body(), b"hello yui");

        let response = router.handle(Request::new(Method::Get, "/nope")).await;
        assert_eq!(response.status_code(), 404);

        let response = router.handle(Request::new(Method::Post, "/hello/yui")).await;
        assert_eq!(response.status_code(), 405);
    }

    #[tokio::test]
    async fn head_is_answered_by_get_routes() {
        async fn head(_req: Request) -> Status { Status::NoContent }

        let router = Router::new().get("/hello/{name}", hello);
        let response = router.handle(Request::new(Method::Head, "/hello/yui")).await;
        assert_eq!(response.status_code(), 200);

        let response = router.handle(Request::new(Method::Head, "/nope")).await;
        assert_eq!(response.status_code(), 404);

        // an explicit HEAD route wins
        let router = Router::new()
            .get("/hello/{name}", hello)
            .on(Method::Head, "/hello/{name}", head);
        let response = router.handle(Request::new(Method::Head, "/hello/yui")).await;
        assert_eq!(response.status_code(), 204);
    }

    #[tokio::test]
    async fn cors_wraps_routed_responses() {
        let router = Router::new().get("/hello/{name}", hello).with_cors(Cors::default());

        let req = Request::new(Method::Get, "/hello/yui").with_header("origin", "https://bgm.tv");
        let response = router.handle(req).await;
        assert_eq!(response.header("access-control-allow-origin"), Some("https://bgm.tv"));

        let response = router.handle(Request::new(Method::Get, "/nope")).await;
        assert_eq!(response.status_code(), 404);
        assert_eq!(response.header("access-control-allow-origin"), Some("*"));
    }

    #[test]
    #[should_panic(expected = "invalid route `/a`")]
    fn duplicate_routes_panic() {
        async fn noop(_req: Request) -> Status { Status::NoContent }
        let _ = Router::new().get("/a", noop).get("/a", noop);
    }
}
