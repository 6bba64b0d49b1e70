use std::num::NonZeroUsize;

use log::info;

use crate::models::task::{FileSource, TaskId, UploadStatus, UploadTask};

/// A task promoted to `Uploading` by a pass, ready to be handed to the
/// executor once the store lock is released.
#[derive(Debug, Clone)]
pub struct Admission {
    pub id: TaskId,
    pub source: FileSource,
}

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    limit: NonZeroUsize,
}

impl Scheduler {
    pub fn new(limit: NonZeroUsize) -> Self {
        Scheduler { limit }
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    /// Promotes the oldest `Pending` tasks to `Uploading` until the limit is
    /// reached. Must run under the store lock.
    pub fn run_pass(&self, tasks: &mut [UploadTask]) -> Vec<Admission> {
        let mut active = tasks
            .iter()
            .filter(|t| t.status == UploadStatus::Uploading)
            .count();
        let mut admitted = Vec::new();

        for task in tasks.iter_mut() {
            if active >= self.limit.get() {
                break;
            }
            if task.status != UploadStatus::Pending {
                continue;
            }
            task.status = UploadStatus::Uploading;
            active += 1;
            info!("Task '{}' ({}) admitted, {} active.", task.id, task.name, active);
            admitted.push(Admission {
                id: task.id,
                source: task.source.clone(),
            });
        }

        admitted
    }
}
