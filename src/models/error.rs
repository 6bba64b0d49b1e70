use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a task ended up `Failed`. Kept on the task for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// The server answered with a status outside 2xx.
    #[error("HTTP {0}")]
    Rejected(u16),
    /// No response was obtained.
    #[error("Network error: {0}")]
    Transport(String),
}

impl From<TransferError> for UploadError {
    fn from(err: TransferError) -> Self {
        UploadError::Transport(err.to_string())
    }
}

/// Fault raised by a [`Transport`](crate::transport::Transport) before any
/// response was received.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Aborted(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid concurrency limit '{0}': expected a positive integer")]
    InvalidConcurrency(String),
    #[error("invalid endpoint '{0}': expected an http:// or https:// URL")]
    InvalidEndpoint(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
