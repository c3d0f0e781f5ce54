//! Middleware layer.
//!
//! Cross-cutting concerns that wrap every request regardless of route:
//!
//! - [`cors`] — browser cross-origin headers and preflight answers
//! - [`trace`] — per-request span with method, path, peer, status, latency

pub mod cors;
pub(crate) mod trace;
