//! Client-side upload queue: files are queued in submission order, at most a
//! configured number transfer at once, and per-task and overall progress can be
//! read at any time.

pub mod app;
pub mod config;
pub mod manager;
pub mod models;
pub mod transport;
mod worker;

pub use config::UploaderConfig;
pub use manager::progress::UploadSummary;
pub use manager::upload_store::UploadStore;
pub use models::error::{ConfigError, TransferError, UploadError};
pub use models::task::{Content, FileSource, TaskId, UploadStatus, UploadTask};
pub use transport::{HttpTransport, ProgressListener, TransferProgress, Transport};
