//! Cross-origin resource sharing.
//!
//! The onair endpoint is read from browser user scripts running on other
//! origins, so every response has to be readable cross-origin.

use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

const DEFAULT_ALLOW_METHODS: &str = "GET,HEAD,PUT,POST,DELETE,PATCH";

/// CORS policy applied by [`Router::with_cors`](crate::Router::with_cors).
///
/// Reflects the caller's `Origin` (or `*` when there is none) and answers
/// preflights itself with `204 No Content`.
#[derive(Clone, Debug)]
pub struct Cors {
    allow_methods: String,
}

impl Default for Cors {
    fn default() -> Self {
        Self { allow_methods: DEFAULT_ALLOW_METHODS.to_owned() }
    }
}

impl Cors {
    /// Overrides the `access-control-allow-methods` list sent on preflights.
    pub fn allow_methods(mut self, methods: &[Method]) -> Self {
        self.allow_methods = methods
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");
        self
    }

    /// Answers `req` if it is a preflight, i.e. an `OPTIONS` request carrying
    /// `access-control-request-method`.
    pub(crate) fn preflight(&self, req: &Request) -> Option<Response> {
        if req.method() != Method::Options || req.header("access-control-request-method").is_none() {
            return None;
        }
        let mut response = Response::builder()
            .status(Status::NoContent)
            .header("access-control-allow-methods", &self.allow_methods);
        if let Some(headers) = req.header("access-control-request-headers") {
            response = response.header("access-control-allow-headers", headers);
        }
        Some(self.apply(req.header("origin"), response.no_body()))
    }

    /// Stamps a routed response with the allow-origin headers.
    pub(crate) fn apply(&self, origin: Option<&str>, mut response: Response) -> Response {
        response.set_header("access-control-allow-origin", origin.unwrap_or("*"));
        response.set_header("vary", "origin");
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preflight_is_answered_with_no_content() {
        let req = Request::new(Method::Options, "/onair")
            .with_header("origin", "https://bgm.tv")
            .with_header("access-control-request-method", "GET")
            .with_header("access-control-request-headers", "x-requested-with");

        let response = Cors::default().preflight(&req).unwrap();
        assert_eq!(response.status_code(), 204);
        assert_eq!(response.header("access-control-allow-origin"), Some("https://bgm.tv"));
        assert_eq!(response.header("access-control-allow-methods"), Some(DEFAULT_ALLOW_METHODS));
        assert_eq!(response.header("access-control-allow-headers"), Some("x-requested-with"));
        assert!(response.body().is_empty());
    }

    #[test]
    fn plain_options_is_not_a_preflight() {
        let req = Request::new(Method::Options, "/onair");
        assert!(Cors::default().preflight(&req).is_none());

        let req = Request::new(Method::Get, "/onair")
            .with_header("access-control-request-method", "GET");
        assert!(Cors::default().preflight(&req).is_none());
    }

    #[test]
    fn allow_methods_can_be_narrowed() {
        let cors = Cors::default().allow_methods(&[Method::Get, Method::Head]);
        let req = Request::new(Method::Options, "/")
            .with_header("access-control-request-method", "GET");
        let response = cors.preflight(&req).unwrap();
        assert_eq!(response.header("access-control-allow-methods"), Some("GET,HEAD"));
        assert_eq!(response.header("access-control-allow-origin"), Some("*"));
    }

    #[test]
    fn apply_overwrites_origin_headers() {
        let response = Response::builder()
            .header("access-control-allow-origin", "https://stale.example")
            .no_body();
        let response = Cors::default().apply(Some("https://bgm.tv"), response);
        assert_eq!(response.header("access-control-allow-origin"), Some("https://bgm.tv"));
        assert_eq!(response.header("vary"), Some("origin"));
    }
}
