use std::sync::Arc;
use std::thread;

use crossbeam_channel::Sender;
use log::{debug, error};

use crate::manager::scheduler::Admission;
use crate::models::error::UploadError;
use crate::models::message::UploadMessage;
use crate::models::task::TaskId;
use crate::transport::{ProgressListener, TransferProgress, Transport};

/// Runs each admitted task's transfer on its own thread and reports back
/// through the worker channel.
#[derive(Clone)]
pub(crate) struct Executor {
    transport: Arc<dyn Transport>,
    sender: Sender<UploadMessage>,
}

impl Executor {
    pub fn new(transport: Arc<dyn Transport>, sender: Sender<UploadMessage>) -> Self {
        Executor { transport, sender }
    }

    /// Starts the transfer and returns immediately.
    pub fn dispatch(&self, admission: Admission) {
        let id = admission.id;
        let transport = Arc::clone(&self.transport);
        let sender = self.sender.clone();

        let spawned = thread::Builder::new()
            .name(format!("upload-{}", id))
            .spawn(move || {
                let mut guard = FinishGuard {
                    id,
                    sender: sender.clone(),
                    reported: false,
                };
                let listener = Arc::new(TaskProgress { id, sender });
                let outcome = match transport.upload(&admission.source, listener) {
                    Ok(status) if (200..300).contains(&status) => Ok(()),
                    Ok(status) => Err(UploadError::Rejected(status)),
                    Err(e) => Err(UploadError::from(e)),
                };
                guard.report(outcome);
            });

        if let Err(e) = spawned {
            error!("Failed to start transfer thread for task '{}': {}", id, e);
            let outcome = Err(UploadError::Transport(format!("failed to start transfer: {}", e)));
            send(&self.sender, UploadMessage::Finished(id, outcome));
        }
    }
}

fn send(sender: &Sender<UploadMessage>, message: UploadMessage) {
    if let Err(e) = sender.send(message) {
        debug!("Dropping transfer event, worker stopped: {:?}", e.into_inner());
    }
}

struct TaskProgress {
    id: TaskId,
    sender: Sender<UploadMessage>,
}

impl ProgressListener for TaskProgress {
    fn on_progress(&self, progress: TransferProgress) {
        send(&self.sender, UploadMessage::Progress(self.id, progress));
    }
}

/// Reports a failure if the transfer thread unwinds before an outcome is sent,
/// so the slot is always released.
struct FinishGuard {
    id: TaskId,
    sender: Sender<UploadMessage>,
    reported: bool,
}

impl FinishGuard {
    fn report(&mut self, outcome: Result<(), UploadError>) {
        self.reported = true;
        send(&self.sender, UploadMessage::Finished(self.id, outcome));
    }
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        if !self.reported {
            let outcome = Err(UploadError::Transport("transfer aborted".to_string()));
            send(&self.sender, UploadMessage::Finished(self.id, outcome));
        }
    }
}
