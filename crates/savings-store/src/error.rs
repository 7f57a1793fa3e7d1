//! Error types for savings-store.

use std::path::PathBuf;

use crate::store::StorePhase;

/// Result type for savings-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading a tabular source file.
///
/// Any of these is fatal for startup: a dataset is either fully loaded or
/// not loaded at all.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The source file does not exist.
    #[error("Data file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The source file exists but could not be opened.
    #[error("Failed to open data file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The stream failed or was malformed part-way through.
    #[error("Failed to read data file {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    /// The blocking read task panicked or was cancelled.
    #[error("Load task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Errors that can occur in savings-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Loading one of the source tables failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// `load` was called on a store that is not uninitialized.
    #[error("Dataset store is already {0}")]
    AlreadyInitialized(StorePhase),
}
