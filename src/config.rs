//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// The default address the service listens on.
pub const DEFAULT_HTTP_BIND_ADDR: &str = "0.0.0.0:4080";

#[derive(Debug, Clone, clap::Parser)]
#[clap(
    name = "onair",
    version,
    about = "Resolves bangumi ids into bangumi-data entries over HTTP",
    long_about = r#"Resolves bangumi ids into bangumi-data entries over HTTP

Examples:
    # Serve a downloaded bangumi-data distribution
    onair --data-file data.json

    # Look up three ids, plainly and in the compact delta form
    curl 'http://localhost:4080/onair?q=100,101,103'
    curl 'http://localhost:4080/onair?q=2s,1,2&t=1'
"#
)]
pub struct Config {
    /// The address on which onair serves HTTP requests.
    #[clap(
        long = "http-bind",
        env = "ONAIR_HTTP_BIND",
        default_value = DEFAULT_HTTP_BIND_ADDR,
        action
    )]
    pub http_bind_address: SocketAddr,

    /// Path to the bangumi-data JSON file loaded at startup.
    #[clap(long = "data-file", env = "ONAIR_DATA_FILE", action)]
    pub data_file: PathBuf,

    /// Path prefix the lookup endpoint is mounted under.
    #[clap(
        long = "mount",
        env = "ONAIR_MOUNT",
        default_value = "/onair",
        value_parser = parse_mount,
        action
    )]
    pub mount: String,

    /// Reject lookups asking for more ids than this. Unlimited when unset.
    #[clap(long = "max-query-ids", env = "ONAIR_MAX_QUERY_IDS", action)]
    pub max_query_ids: Option<usize>,

    /// Log filter directives, e.g. `info` or `onair=debug,hyper=warn`.
    #[clap(long = "log-filter", env = "LOG_FILTER", default_value = "info", action)]
    pub log_filter: String,
}

impl Config {
    /// The mount prefix as a route: leading slash, no trailing slash, and
    /// empty for the root.
    pub fn mount_prefix(&self) -> String {
        let trimmed = self.mount.trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{trimmed}")
        }
    }
}

/// Characters the router reads as route syntax, or that cannot appear in a
/// request path at all.
const RESERVED_MOUNT_CHARS: &[char] = &['{', '}', '*', '?', '#'];

/// Paths the service claims for itself.
const RESERVED_MOUNTS: &[&str] = &["healthz", "readyz"];

fn parse_mount(s: &str) -> Result<String, String> {
    if let Some(c) = s.chars().find(|c| RESERVED_MOUNT_CHARS.contains(c)) {
        return Err(format!("mount path may not contain `{c}`"));
    }
    let trimmed = s.trim_matches('/');
    if RESERVED_MOUNTS.contains(&trimmed) {
        return Err(format!("`/{trimmed}` is reserved for health checks"));
    }
    Ok(s.to_owned())
}
