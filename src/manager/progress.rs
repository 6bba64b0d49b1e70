//! Values derived from the task list on every read. Nothing here is cached.

use crate::models::task::{UploadStatus, UploadTask};

/// `round(done / total * 100)`, half rounded up; 0 when `total` is 0.
pub fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let done = u128::from(done.min(total));
    let total = u128::from(total);
    ((done * 100 + total / 2) / total) as u8
}

pub fn is_uploading(tasks: &[UploadTask]) -> bool {
    tasks.iter().any(|t| t.status == UploadStatus::Uploading)
}

pub fn overall_progress(tasks: &[UploadTask]) -> u8 {
    let (done, total) = tasks.iter().fold((0u64, 0u64), |(done, total), t| {
        (
            done.saturating_add(t.uploaded_bytes),
            total.saturating_add(t.total_bytes),
        )
    });
    percent(done, total)
}

/// Snapshot handed to front-ends.
#[derive(Debug, Clone)]
pub struct UploadSummary {
    pub tasks: Vec<UploadTask>,
    pub is_uploading: bool,
    pub overall_progress: u8,
}

impl UploadSummary {
    pub fn from_tasks(tasks: &[UploadTask]) -> Self {
        Self {
            tasks: tasks.to_vec(),
            is_uploading: is_uploading(tasks),
            overall_progress: overall_progress(tasks),
        }
    }

    pub fn count(&self, status: UploadStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }
}
