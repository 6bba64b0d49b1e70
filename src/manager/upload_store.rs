use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

use crossbeam_channel::{unbounded, Sender};
use log::{debug, error, info};

use crate::config::UploaderConfig;
use crate::manager::progress::{self, UploadSummary};
use crate::manager::scheduler::{Admission, Scheduler};
use crate::models::message::UploadMessage;
use crate::models::task::{FileSource, TaskId, UploadStatus, UploadTask};
use crate::transport::Transport;
use crate::worker::executor::Executor;
use crate::worker::worker::spawn_worker_thread;

pub(crate) struct Queue {
    pub(crate) tasks: Vec<UploadTask>,
    next_id: u64,
}

/// State shared between the store handle and the event worker.
pub(crate) struct Shared {
    queue: Mutex<Queue>,
    scheduler: Scheduler,
    shutting_down: AtomicBool,
}

impl Shared {
    pub(crate) fn new(scheduler: Scheduler) -> Self {
        Shared {
            queue: Mutex::new(Queue {
                tasks: Vec::new(),
                next_id: 0,
            }),
            scheduler,
            shutting_down: AtomicBool::new(false),
        }
    }

    /// Once set, outcomes are still recorded but no new transfer is started.
    pub(crate) fn request_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn schedule(&self, queue: &mut Queue) -> Vec<Admission> {
        self.scheduler.run_pass(&mut queue.tasks)
    }
}

/// Ordered upload queue with bounded concurrency.
///
/// All task mutation happens under one lock; transfer progress and outcomes
/// are applied by a dedicated worker thread.
pub struct UploadStore {
    shared: Arc<Shared>,
    executor: Executor,
    sender: Sender<UploadMessage>,
    worker: Option<JoinHandle<()>>,
}

impl UploadStore {
    pub fn new(config: &UploaderConfig, transport: Arc<dyn Transport>) -> Self {
        let (sender, receiver) = unbounded();
        let shared = Arc::new(Shared::new(Scheduler::new(config.concurrency)));
        let executor = Executor::new(transport, sender.clone());
        let worker = spawn_worker_thread(receiver, Arc::clone(&shared), executor.clone());

        UploadStore {
            shared,
            executor,
            sender,
            worker: Some(worker),
        }
    }

    /// Queues every file as a new `Pending` task and starts as many as the
    /// concurrency limit allows.
    pub fn add_files<I>(&self, files: I) -> Vec<TaskId>
    where
        I: IntoIterator<Item = FileSource>,
    {
        let (ids, admitted) = {
            let mut queue = self.shared.lock();
            let mut ids = Vec::new();
            for file in files {
                queue.next_id += 1;
                let id = TaskId(queue.next_id);
                info!("Task '{}' created for {} ({} bytes).", id, file.name, file.size);
                queue.tasks.push(UploadTask::new(id, file));
                ids.push(id);
            }
            let admitted = self.shared.schedule(&mut queue);
            (ids, admitted)
        };

        for admission in admitted {
            self.executor.dispatch(admission);
        }
        ids
    }

    /// Removes completed tasks. Failed ones stay visible.
    pub fn clear_completed(&self) -> usize {
        let mut queue = self.shared.lock();
        let before = queue.tasks.len();
        queue.tasks.retain(|t| t.status != UploadStatus::Completed);
        let removed = before - queue.tasks.len();
        if removed > 0 {
            info!("Cleared {} completed task(s).", removed);
        }
        removed
    }

    pub fn tasks(&self) -> Vec<UploadTask> {
        self.shared.lock().tasks.clone()
    }

    pub fn task(&self, id: TaskId) -> Option<UploadTask> {
        self.shared.lock().tasks.iter().find(|t| t.id == id).cloned()
    }

    pub fn is_uploading(&self) -> bool {
        progress::is_uploading(&self.shared.lock().tasks)
    }

    pub fn overall_progress(&self) -> u8 {
        progress::overall_progress(&self.shared.lock().tasks)
    }

    pub fn summary(&self) -> UploadSummary {
        UploadSummary::from_tasks(&self.shared.lock().tasks)
    }

    pub fn concurrency_limit(&self) -> usize {
        self.shared.scheduler.limit()
    }
}

impl Drop for UploadStore {
    fn drop(&mut self) {
        self.shared.request_shutdown();
        if self.sender.send(UploadMessage::Shutdown).is_err() {
            debug!("Upload worker already stopped.");
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Upload worker panicked.");
            }
        }
    }
}
