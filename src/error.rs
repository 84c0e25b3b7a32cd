//! Centralized error handling for hostfetch

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for hostfetch operations
#[derive(Debug, Error)]
pub enum HostfetchError {
    /// I/O errors (file reading, command execution)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Parsing errors (invalid data format)
    #[error("Parse error: {0}")]
    Parse(String),
    /// Configuration errors (bad values, conflicting flags)
    #[error("Config error: {0}")]
    Config(String),
    /// An item id that is not in the catalog
    #[error("Config error: invalid item: {0}")]
    UnknownItem(String),
    /// The long-lived cache exists but cannot be used
    #[error("Error reading cache file {}: {source}", path.display())]
    CacheRead { path: PathBuf, source: CacheError },
    /// A cache file could not be written at the end of the run
    #[error("Error writing cache file {}: {source}", path.display())]
    CacheWrite { path: PathBuf, source: io::Error },
    /// The bulk inventory call failed; nothing from the run can be trusted
    #[error("Error fetching system profiler: {0}")]
    BulkFetch(String),
    /// System detection errors
    #[error("Detection error: {0}")]
    Detection(String),
    /// The worker pool for a run could not be started
    #[error("Cannot start fetch workers: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),
    /// HTTP errors from the network collectors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure modes of a persisted cache read.
///
/// `NotFound` and `Empty` are expected on first run and trigger repopulation;
/// the others are real failures.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache file does not exist")]
    NotFound,
    #[error("cache file is empty")]
    Empty,
    #[error("cache file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{0}")]
    Io(io::Error),
}

impl CacheError {
    /// True for the cases that mean "no cache yet" rather than a failure.
    pub fn is_missing(&self) -> bool {
        matches!(self, CacheError::NotFound | CacheError::Empty)
    }
}

impl From<io::Error> for CacheError {
    fn from(error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::NotFound {
            CacheError::NotFound
        } else {
            CacheError::Io(error)
        }
    }
}

/// Type alias for Results in hostfetch
pub type Result<T> = std::result::Result<T, HostfetchError>;
