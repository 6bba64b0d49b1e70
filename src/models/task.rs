use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::manager::progress::percent;
use crate::models::error::UploadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the bytes of a submitted file live.
#[derive(Debug, Clone)]
pub enum Content {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// A file handed to [`UploadStore::add_files`](crate::UploadStore::add_files).
#[derive(Debug, Clone)]
pub struct FileSource {
    pub name: String,
    pub size: u64,
    pub content: Content,
}

impl FileSource {
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size: metadata.len(),
            content: Content::Path(path.to_path_buf()),
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            content: Content::Memory(bytes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Failed)
    }
}

#[derive(Debug, Clone)]
pub struct UploadTask {
    pub id: TaskId,
    pub name: String,
    pub total_bytes: u64,
    pub uploaded_bytes: u64,
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<UploadError>,
    pub source: FileSource,
}

impl UploadTask {
    pub fn new(id: TaskId, source: FileSource) -> Self {
        Self {
            id,
            name: source.name.clone(),
            total_bytes: source.size,
            uploaded_bytes: 0,
            progress: 0,
            status: UploadStatus::Pending,
            error: None,
            source,
        }
    }

    /// Records a transport progress report. Returns false if the task is not
    /// uploading.
    ///
    /// Bytes are clamped to `total_bytes` and never move backwards.
    pub fn record_progress(&mut self, loaded: u64) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        let loaded = loaded.min(self.total_bytes);
        if loaded > self.uploaded_bytes {
            self.uploaded_bytes = loaded;
            self.progress = percent(self.uploaded_bytes, self.total_bytes);
        }
        true
    }

    /// Moves an uploading task into its terminal state. Returns false if the
    /// task was not uploading.
    pub fn finish(&mut self, outcome: Result<(), UploadError>) -> bool {
        if self.status != UploadStatus::Uploading {
            return false;
        }
        match outcome {
            Ok(()) => {
                self.status = UploadStatus::Completed;
                self.uploaded_bytes = self.total_bytes;
                self.progress = 100;
            }
            Err(error) => {
                self.status = UploadStatus::Failed;
                self.error = Some(error);
            }
        }
        true
    }
}
