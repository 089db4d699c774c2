//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading `stencil.toml`, reported like [`BuildError`](crate::error::BuildError)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}: cannot read config", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("{}: invalid config", .0.display())]
    Toml(PathBuf, #[source] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}
