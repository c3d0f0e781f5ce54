//! # onair
//!
//! Resolves [bangumi](https://bgm.tv) subject ids into entries of the
//! [bangumi-data](https://github.com/bangumi-data/bangumi-data) catalog over
//! HTTP.
//!
//! ```text
//! GET /onair?q=100,101,103        → {"data": [[100, {...}], [101, {...}], [103, null]]}
//! GET /onair?q=2s,1,2&t=1         → the same ids, written as base-36 deltas
//! ```
//!
//! The dataset is read once at startup and indexed by bangumi id
//! ([`Catalog`]); after that every request is a pure read.
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use onair::{Catalog, OnAir, Router, Server, dataset, health, middleware::cors::Cors};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), onair::Error> {
//!     let catalog = Catalog::build(dataset::load("data.json").await?)?;
//!     let app = Arc::new(OnAir::new(catalog))
//!         .mount(Router::new(), "/onair")
//!         .get("/healthz", health::liveness)
//!         .with_cors(Cors::default());
//!
//!     Server::bind("0.0.0.0:4080".parse().unwrap()).serve(app).await
//! }
//! ```

mod error;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod handler;
pub mod health;
pub mod middleware;
pub mod onair;
pub mod query;

pub use catalog::Catalog;
pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use onair::OnAir;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::{Server, serve_on};
pub use status::Status;
