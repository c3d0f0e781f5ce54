//! Entrypoint of the onair binary.
//!
//! Run with:
//!   onair --data-file data.json
//!
//! Try:
//!   curl 'http://localhost:4080/onair?q=100,101,103'
//!   curl 'http://localhost:4080/onair?q=2s,1,2&t=1'
//!   curl http://localhost:4080/healthz

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use onair::middleware::cors::Cors;
use onair::{Catalog, Config, OnAir, Router, Server, dataset, health};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(&config.log_filter);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(filter: &str) {
    let (filter, invalid) = match EnvFilter::try_new(filter) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new("info"), Some(e)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if let Some(e) = invalid {
        warn!("invalid log filter, falling back to `info`: {e}");
    }
}

async fn run(config: Config) -> Result<(), onair::Error> {
    let items = dataset::load(&config.data_file).await?;
    let catalog = Catalog::build(items)?;
    info!(
        path = %config.data_file.display(),
        entries = catalog.len(),
        indexed = catalog.indexed(),
        "catalog loaded",
    );

    let mut onair = OnAir::new(catalog);
    if let Some(limit) = config.max_query_ids {
        onair = onair.with_max_ids(limit);
    }

    let app = Arc::new(onair)
        .mount(Router::new(), &config.mount_prefix())
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
        .with_cors(Cors::default());

    Server::bind(config.http_bind_address).serve(app).await
}
