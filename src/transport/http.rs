use std::fs::File;
use std::io::{self, Cursor, Read};
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use super::{ProgressListener, TransferProgress, Transport};
use crate::config::UploaderConfig;
use crate::models::error::{ConfigError, TransferError};
use crate::models::task::{Content, FileSource};

/// Multipart POST of each file to a fixed endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    field_name: String,
}

impl HttpTransport {
    pub fn new(config: &UploaderConfig) -> Result<Self, ConfigError> {
        // Uploads run until the server answers; the blocking client would
        // otherwise give up after 30 seconds.
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            field_name: config.field_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn upload(
        &self,
        file: &FileSource,
        progress: Arc<dyn ProgressListener>,
    ) -> Result<u16, TransferError> {
        let reader: Box<dyn Read + Send> = match &file.content {
            Content::Path(path) => {
                let f = File::open(path).map_err(|source| TransferError::Open {
                    path: path.clone(),
                    source,
                })?;
                Box::new(f)
            }
            Content::Memory(bytes) => Box::new(Cursor::new(Arc::clone(bytes))),
        };

        let body = ProgressReader {
            inner: reader,
            loaded: 0,
            total: file.size,
            listener: progress,
        };
        let part = Part::reader_with_length(body, file.size).file_name(file.name.clone());
        let form = Form::new().part(self.field_name.clone(), part);

        debug!("POST {} ({}, {} bytes)", self.endpoint, file.name, file.size);
        let response = self.client.post(&self.endpoint).multipart(form).send()?;
        Ok(response.status().as_u16())
    }
}

/// Reports how much of the file body has been handed to the client.
struct ProgressReader {
    inner: Box<dyn Read + Send>,
    loaded: u64,
    total: u64,
    listener: Arc<dyn ProgressListener>,
}

impl Read for ProgressReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.loaded += n as u64;
            self.listener
                .on_progress(TransferProgress::new(self.loaded, self.total));
        }
        Ok(n)
    }
}
