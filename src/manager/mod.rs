pub mod progress;
pub mod scheduler;
pub mod upload_store;
