//! Error types for opening the persistent storage area.

use thiserror::Error;

/// Errors that can occur while opening or initializing a [`FjallArea`](super::FjallArea).
///
/// Failures of individual reads and writes are reported as
/// [`PlatformError`](super::PlatformError) instead.
#[derive(Error, Debug)]
pub enum AreaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Storage area not initialized at {0}")]
    NotInitialized(String),
}
