use super::error::UploadError;
use super::task::TaskId;
use crate::transport::TransferProgress;

#[derive(Debug)]
pub enum UploadMessage {
    Progress(TaskId, TransferProgress),
    Finished(TaskId, Result<(), UploadError>),
    Shutdown,
}
