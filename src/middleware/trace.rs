//! Per-request tracing span.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tracing::{Instrument, info, info_span};

use crate::request::Request;
use crate::response::Response;
use crate::router::Router;

/// Routes `req` inside a span and logs the outcome once the response is built.
pub(crate) async fn traced(router: &Router, req: Request, peer: SocketAddr) -> Response {
    let span = info_span!("request", method = %req.method(), path = %req.path(), %peer);
    async move {
        let started = Instant::now();
        let response = router.handle(req).await;
        info!(
            status = response.status_code(),
            latency_us = micros(started.elapsed()),
            "request handled",
        );
        response
    }
    .instrument(span)
    .await
}

/// Whole microseconds in `elapsed`, saturating at `u64::MAX`.
fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
