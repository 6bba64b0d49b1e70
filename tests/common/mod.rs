#![allow(dead_code)]

pub mod upload_server;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};

use upload_queue::{
    FileSource, ProgressListener, TransferError, TransferProgress, Transport, UploadStatus,
    UploadStore, UploaderConfig,
};

const GATE_TIMEOUT: Duration = Duration::from_secs(10);
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// What a gated transfer does next.
#[derive(Debug, Clone)]
pub enum Step {
    Progress(TransferProgress),
    Respond(u16),
    Fault(String),
    Panic,
}

/// Transport whose transfers block until the test releases them by file name.
#[derive(Default)]
pub struct GatedTransport {
    gates: Mutex<HashMap<String, (Sender<Step>, Receiver<Step>)>>,
    started: Mutex<Vec<String>>,
}

impl GatedTransport {
    fn gate(&self, name: &str) -> (Sender<Step>, Receiver<Step>) {
        self.gates
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_insert_with(unbounded)
            .clone()
    }

    pub fn step(&self, name: &str, step: Step) {
        self.gate(name).0.send(step).unwrap();
    }

    pub fn respond(&self, name: &str, status: u16) {
        self.step(name, Step::Respond(status));
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }
}

impl Transport for GatedTransport {
    fn upload(
        &self,
        file: &FileSource,
        progress: Arc<dyn ProgressListener>,
    ) -> Result<u16, TransferError> {
        self.started.lock().unwrap().push(file.name.clone());
        let (_, gate) = self.gate(&file.name);
        loop {
            match gate.recv_timeout(GATE_TIMEOUT) {
                Ok(Step::Progress(p)) => progress.on_progress(p),
                Ok(Step::Respond(status)) => return Ok(status),
                Ok(Step::Fault(msg)) => return Err(TransferError::Aborted(msg)),
                Ok(Step::Panic) => panic!("transport blew up on {}", file.name),
                Err(_) => return Err(TransferError::Aborted("gate timed out".into())),
            }
        }
    }
}

/// Transport that answers 200 after a short delay and records the peak
/// number of simultaneous transfers.
#[derive(Default)]
pub struct CountingTransport {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl CountingTransport {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Transport for CountingTransport {
    fn upload(
        &self,
        file: &FileSource,
        progress: Arc<dyn ProgressListener>,
    ) -> Result<u16, TransferError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        progress.on_progress(TransferProgress::new(file.size / 2, file.size));
        thread::sleep(Duration::from_millis(1 + file.size % 7));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(if file.size % 5 == 0 { 500 } else { 200 })
    }
}

pub fn store_with<T: Transport + 'static>(limit: usize, transport: Arc<T>) -> UploadStore {
    let config = UploaderConfig::default().with_concurrency(limit).unwrap();
    UploadStore::new(&config, transport)
}

pub fn file(name: &str, size: usize) -> FileSource {
    FileSource::from_bytes(name, vec![0u8; size])
}

pub fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::sleep(Duration::from_millis(5));
    }
}

pub fn wait_for_started(transport: &GatedTransport, count: usize) {
    wait_until("transfers to start", || transport.started().len() >= count);
}

pub fn statuses(store: &UploadStore) -> Vec<UploadStatus> {
    store.tasks().iter().map(|t| t.status).collect()
}

pub fn count(store: &UploadStore, status: UploadStatus) -> usize {
    store.tasks().iter().filter(|t| t.status == status).count()
}
