//! Error types for the watering tracker core
//!
//! All errors use thiserror for structured error handling.
//! Storage write failures are the only errors callers must handle;
//! read and notification paths recover locally.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid time '{0}': expected HH:MM in 24-hour format")]
    InvalidTime(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
