use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Receiver;
use log::{debug, error, info, warn};

use crate::manager::upload_store::Shared;
use crate::models::error::UploadError;
use crate::models::message::UploadMessage;
use crate::models::task::TaskId;
use crate::transport::TransferProgress;
use crate::worker::executor::Executor;

pub(crate) fn spawn_worker_thread(
    receiver: Receiver<UploadMessage>,
    shared: Arc<Shared>,
    executor: Executor,
) -> JoinHandle<()> {
    thread::spawn(move || loop {
        match receiver.recv() {
            Ok(message) => match message {
                UploadMessage::Progress(id, progress) => handle_progress(id, progress, &shared),
                UploadMessage::Finished(id, outcome) => {
                    handle_finished(id, outcome, &shared, &executor)
                }
                UploadMessage::Shutdown => {
                    debug!("Upload worker shutting down.");
                    break;
                }
            },
            Err(e) => {
                error!("Failed to receive message: {}", e);
                break;
            }
        }
    })
}

fn handle_progress(id: TaskId, progress: TransferProgress, shared: &Shared) {
    if !progress.length_computable {
        debug!("Task '{}': progress without a known total ignored.", id);
        return;
    }
    let mut queue = shared.lock();
    match queue.tasks.iter_mut().find(|t| t.id == id) {
        Some(task) => {
            if task.record_progress(progress.loaded) {
                debug!(
                    "Task '{}': {}/{} bytes ({}%).",
                    id, task.uploaded_bytes, task.total_bytes, task.progress
                );
            } else {
                debug!("Task '{}': late progress ignored ({:?}).", id, task.status);
            }
        }
        None => debug!("Task '{}': progress for unknown task ignored.", id),
    }
}

fn handle_finished(
    id: TaskId,
    outcome: Result<(), UploadError>,
    shared: &Shared,
    executor: &Executor,
) {
    let admitted = {
        let mut queue = shared.lock();
        match queue.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                let failure = outcome.as_ref().err().cloned();
                if task.finish(outcome) {
                    match failure {
                        None => info!("Task '{}' ({}) completed.", id, task.name),
                        Some(err) => warn!("Task '{}' ({}) failed: {}", id, task.name, err),
                    }
                } else {
                    debug!("Task '{}': duplicate outcome ignored ({:?}).", id, task.status);
                }
            }
            None => debug!("Task '{}': outcome for unknown task ignored.", id),
        }
        if shared.is_shutting_down() {
            debug!("Store dropped, not starting further transfers.");
            return;
        }
        shared.schedule(&mut queue)
    };

    for admission in admitted {
        executor.dispatch(admission);
    }
}
