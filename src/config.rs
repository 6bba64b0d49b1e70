use std::env;
use std::num::NonZeroUsize;

use crate::models::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/photos/";
pub const DEFAULT_FIELD: &str = "file";
pub const DEFAULT_CONCURRENCY: usize = 3;

pub const ENDPOINT_VAR: &str = "UPLOADER_ENDPOINT";
pub const FIELD_VAR: &str = "UPLOADER_FIELD";
pub const CONCURRENCY_VAR: &str = "UPLOADER_CONCURRENCY";

#[derive(Debug, Clone)]
pub struct UploaderConfig {
    /// Where every file is POSTed.
    pub endpoint: String,
    /// Multipart field carrying the file bytes.
    pub field_name: String,
    /// Maximum number of simultaneous transfers.
    pub concurrency: NonZeroUsize,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            field_name: DEFAULT_FIELD.to_string(),
            concurrency: NonZeroUsize::MIN.saturating_add(DEFAULT_CONCURRENCY - 1),
        }
    }
}

impl UploaderConfig {
    /// Defaults overridden by `UPLOADER_ENDPOINT`, `UPLOADER_FIELD` and
    /// `UPLOADER_CONCURRENCY` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(endpoint) = lookup(ENDPOINT_VAR) {
            config = config.with_endpoint(endpoint)?;
        }
        if let Some(field) = lookup(FIELD_VAR) {
            config.field_name = field;
        }
        if let Some(raw) = lookup(CONCURRENCY_VAR) {
            config.concurrency = parse_concurrency(&raw)?;
        }
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(endpoint));
        }
        self.endpoint = endpoint;
        Ok(self)
    }

    pub fn with_concurrency(mut self, limit: usize) -> Result<Self, ConfigError> {
        self.concurrency =
            NonZeroUsize::new(limit).ok_or_else(|| ConfigError::InvalidConcurrency(limit.to_string()))?;
        Ok(self)
    }
}

fn parse_concurrency(raw: &str) -> Result<NonZeroUsize, ConfigError> {
    raw.trim()
        .parse::<NonZeroUsize>()
        .map_err(|_| ConfigError::InvalidConcurrency(raw.to_string()))
}
