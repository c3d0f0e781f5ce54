//! The lookup endpoint: `GET {mount}?q=...&t=...`.
//!
//! Answers `{"data": [[id, entry], ...]}` with one row per requested id, in
//! request order. See [`query`](crate::query) for the accepted `q` forms.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::catalog::Catalog;
use crate::handler::with_state;
use crate::query::{Encoding, OnAirQuery, Row, parse_list, resolve};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;

/// Per-request failures. Both are the caller's fault and answered with 400.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid query string: {0}")]
    Params(#[from] serde_urlencoded::de::Error),

    #[error("too many ids: {count} requested, at most {limit} allowed")]
    TooManyIds { count: usize, limit: usize },
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        debug!(error = %self, "rejected lookup");
        let body = json!({ "error": self.to_string() });
        Response::builder()
            .status(Status::BadRequest)
            .json(body.to_string().into_bytes())
    }
}

#[derive(Debug, Serialize)]
pub struct OnAirResponse<'a> {
    pub data: Vec<Row<'a>>,
}

/// The catalog plus the request limits, shared by every lookup.
#[derive(Debug)]
pub struct OnAir {
    catalog: Catalog,
    max_ids: Option<usize>,
}

impl OnAir {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog, max_ids: None }
    }

    /// Rejects lookups for more than `limit` ids.
    pub fn with_max_ids(mut self, limit: usize) -> Self {
        self.max_ids = Some(limit);
        self
    }

    /// Decodes `params` and resolves every id against the catalog.
    pub fn query(&self, params: &OnAirQuery) -> Result<OnAirResponse<'_>, QueryError> {
        let ids = parse_list(params.q.as_deref(), Encoding::from_flag(params.t.as_deref()));
        if let Some(limit) = self.max_ids {
            if ids.len() > limit {
                return Err(QueryError::TooManyIds { count: ids.len(), limit });
            }
        }
        Ok(OnAirResponse { data: resolve(&self.catalog, &ids) })
    }

    /// Mounts the endpoint at `prefix` and `prefix/` on `router`.
    ///
    /// `prefix` is either empty (mount at the root) or starts with `/` and has
    /// no trailing slash.
    pub fn mount(self: Arc<Self>, router: Router, prefix: &str) -> Router {
        let router = router.get(&format!("{prefix}/"), with_state(Arc::clone(&self), lookup));
        if prefix.is_empty() {
            router
        } else {
            router.get(prefix, with_state(self, lookup))
        }
    }
}

async fn lookup(state: Arc<OnAir>, req: Request) -> Response {
    let params = match req.query_params::<OnAirQuery>() {
        Ok(params) => params,
        Err(e) => return QueryError::from(e).into_response(),
    };
    match state.query(&params) {
        Ok(body) => Json(body).into_response(),
        Err(e) => e.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::catalog::tests::item;

    fn onair() -> OnAir {
        OnAir::new(
            Catalog::build(vec![
                item("a", &[("bangumi", "100")]),
                item("b", &[("bangumi", "101")]),
                item("c", &[("bangumi", "103")]),
            ])
            .unwrap(),
        )
    }

    fn ids(response: &OnAirResponse<'_>) -> Vec<Option<i64>> {
        response.data.iter().map(|row| row.0).collect()
    }

    fn query(q: Option<&str>, t: Option<&str>) -> OnAirQuery {
        OnAirQuery { q: q.map(str::to_owned), t: t.map(str::to_owned) }
    }

    #[test]
    fn absent_query_is_empty() {
        let onair = onair();
        let response = onair.query(&OnAirQuery::default()).unwrap();
        assert!(response.data.is_empty());
        assert_eq!(serde_json::to_value(&response).unwrap(), json!({ "data": [] }));
    }

    #[test]
    fn decimal_and_delta_forms_resolve_the_same_entries() {
        let onair = onair();
        let plain = onair.query(&query(Some("100,101,103"), None)).unwrap();
        let delta = onair.query(&query(Some("2s,1,2"), Some("1"))).unwrap();
        assert_eq!(ids(&plain), vec![Some(100), Some(101), Some(103)]);
        assert_eq!(plain.data, delta.data);
        assert!(plain.data.iter().all(|row| row.1.is_some()));
    }

    #[test]
    fn unknown_ids_resolve_to_null() {
        let onair = onair();
        let response = onair.query(&query(Some("999999999"), None)).unwrap();
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({ "data": [[999_999_999, null]] }),
        );
    }

    #[test]
    fn duplicates_and_order_are_preserved() {
        let onair = onair();
        let response = onair.query(&query(Some("103,100,103"), None)).unwrap();
        assert_eq!(ids(&response), vec![Some(103), Some(100), Some(103)]);
        let titles: Vec<_> = response
            .data
            .iter()
            .map(|row| row.1.unwrap().fields["title"].clone())
            .collect();
        assert_eq!(titles, vec![Value::from("c"), Value::from("a"), Value::from("c")]);
    }

    #[test]
    fn malformed_tokens_are_null_rows() {
        let onair = onair();
        let response = onair.query(&query(Some("abc,100"), None)).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["data"][0], json!([null, null]));
        assert_eq!(value["data"][1][0], json!(100));
    }

    #[test]
    fn id_limit_is_enforced() {
        let onair = onair().with_max_ids(2);
        assert!(onair.query(&query(Some("100,101"), None)).is_ok());
        let err = onair.query(&query(Some("100,101,103"), None)).unwrap_err();
        assert!(matches!(err, QueryError::TooManyIds { count: 3, limit: 2 }));

        let response = err.into_response();
        assert_eq!(response.status_code(), 400);
        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "too many ids: 3 requested, at most 2 allowed");
    }
}
