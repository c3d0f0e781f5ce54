//! Incoming HTTP request type.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::method::Method;

/// An incoming HTTP request, detached from the hyper connection it came from.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    /// Builds a request for `target`, an origin-form URI such as
    /// `/onair?q=1,2`. Used by the server and by in-process callers.
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (target, None),
        };
        Self {
            method,
            path: path.to_owned(),
            query,
            headers: Vec::new(),
            params: HashMap::new(),
        }
    }

    pub(crate) fn from_parts(
        method: Method,
        path: String,
        query: Option<String>,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self { method, path, query, headers, params: HashMap::new() }
    }

    /// Appends a header. Returns `self` for chaining.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the URL query string into `T`. A request without a query
    /// string decodes as if it were empty.
    pub fn query_params<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(self.query.as_deref().unwrap_or(""))
    }
}
