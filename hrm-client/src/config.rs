//! Client configuration

use std::str::FromStr;
use thiserror::Error;

use crate::store::{InsertPosition, ReadErrorPolicy};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Client configuration for connecting to the HR backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// What stores do when a list fetch fails
    pub read_error_policy: ReadErrorPolicy,

    /// Where stores put newly created records
    pub insert_position: InsertPosition,

    /// Page size used when the URL does not specify one
    pub default_page_size: u32,

    /// Push channel TCP address (realtime disabled when unset)
    pub push_addr: Option<String>,

    /// Buffered push events per subscriber
    pub push_channel_capacity: usize,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            read_error_policy: ReadErrorPolicy::default(),
            insert_position: InsertPosition::default(),
            default_page_size: shared::request::DEFAULT_PAGE_SIZE,
            push_addr: None,
            push_channel_capacity: 256,
        }
    }

    /// Load configuration from environment variables (and `.env` if present)
    ///
    /// | Variable            | Default                 |
    /// |---------------------|-------------------------|
    /// | `HRM_API_BASE_URL`  | `http://localhost:8080` |
    /// | `HRM_HTTP_TIMEOUT`  | `30`                    |
    /// | `HRM_READ_ERRORS`   | `notify`                |
    /// | `HRM_INSERT`        | `append`                |
    /// | `HRM_PAGE_SIZE`     | `10`                    |
    /// | `HRM_PUSH_ADDR`     | unset                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::new(
            std::env::var("HRM_API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
        );
        if let Some(timeout) = parse_env("HRM_HTTP_TIMEOUT")? {
            config.timeout = timeout;
        }
        if let Some(policy) = parse_env("HRM_READ_ERRORS")? {
            config.read_error_policy = policy;
        }
        if let Some(position) = parse_env("HRM_INSERT")? {
            config.insert_position = position;
        }
        if let Some(page_size) = parse_env::<u32>("HRM_PAGE_SIZE")? {
            if page_size == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "HRM_PAGE_SIZE",
                    value: page_size.to_string(),
                });
            }
            config.default_page_size = page_size;
        }
        config.push_addr = std::env::var("HRM_PUSH_ADDR").ok().filter(|s| !s.is_empty());
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the read error policy
    pub fn with_read_error_policy(mut self, policy: ReadErrorPolicy) -> Self {
        self.read_error_policy = policy;
        self
    }

    /// Set where created records are inserted
    pub fn with_insert_position(mut self, position: InsertPosition) -> Self {
        self.insert_position = position;
        self
    }

    /// Set the push channel address
    pub fn with_push_addr(mut self, addr: impl Into<String>) -> Self {
        self.push_addr = Some(addr.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

fn parse_env<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        _ => Ok(None),
    }
}
