//! Unified error type.

use std::path::PathBuf;

use crate::catalog::CatalogError;

/// The error type returned by onair's fallible startup and serving operations.
///
/// Application-level errors (400, 404, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type surfaces
/// failures that stop the process: a dataset that cannot be read or indexed,
/// or a listener that cannot be bound.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read dataset {}: {source}", path.display())]
    ReadDataset {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse dataset {}: {source}", path.display())]
    ParseDataset {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to build catalog index: {0}")]
    Catalog(#[from] CatalogError),
}
