use aag_core::error::DecodeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("AAG directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("Invalid {key}: {reason}")]
    Invalid {
        key: &'static str,
        reason: std::string::String,
    },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error(transparent)]
    Registry(#[from] prometheus::Error),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("Encoded metrics are not UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("Blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
