//! Errors raised while loading or checking `gpumon.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not valid gpumon TOML: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// A value parsed but is unusable, e.g. a zero poll interval
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
