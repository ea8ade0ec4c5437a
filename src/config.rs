use std::env;
use std::num::NonZeroUsize;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_bind_addr: String,
    /// Bound on the recent-block list; `None` keeps every observed block.
    pub recent_blocks_capacity: Option<NonZeroUsize>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("RECENT_BLOCKS_CAPACITY is not a non-negative integer: {0:?}")]
    InvalidCapacity(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_bind_addr = env::var("HTTP_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

        // 0 and unset both mean unbounded.
        let recent_blocks_capacity = match env::var("RECENT_BLOCKS_CAPACITY") {
            Ok(raw) => {
                let n: usize = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidCapacity(raw.clone()))?;
                NonZeroUsize::new(n)
            }
            Err(_) => None,
        };

        Ok(Self {
            http_bind_addr,
            recent_blocks_capacity,
        })
    }
}
