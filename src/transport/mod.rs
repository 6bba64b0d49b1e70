pub mod http;

use std::sync::Arc;

use crate::models::error::TransferError;
use crate::models::task::FileSource;

pub use http::HttpTransport;

/// One progress report from a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub loaded: u64,
    pub total: u64,
    /// When false the report carries no usable total and is ignored.
    pub length_computable: bool,
}

impl TransferProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        Self {
            loaded,
            total,
            length_computable: true,
        }
    }

    pub fn indeterminate(loaded: u64) -> Self {
        Self {
            loaded,
            total: 0,
            length_computable: false,
        }
    }
}

pub trait ProgressListener: Send + Sync {
    fn on_progress(&self, progress: TransferProgress);
}

/// Sends one file and returns the response status code.
///
/// Implementations block the calling thread until the response arrives; the
/// executor gives every transfer its own thread.
pub trait Transport: Send + Sync {
    fn upload(
        &self,
        file: &FileSource,
        progress: Arc<dyn ProgressListener>,
    ) -> Result<u16, TransferError>;
}
