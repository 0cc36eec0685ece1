//! Central error types for ChatIt.
//!
//! This module provides typed errors for better error handling across the codebase.
//! All errors implement `Serialize` for Tauri IPC compatibility.

use serde::Serialize;
use thiserror::Error;

/// Main error type for ChatIt operations.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Reading or writing the settings document failed
    #[error("Settings storage error: {0}")]
    StorageError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Window creation or manipulation failed
    #[error("Window error: {0}")]
    WindowError(String),

    /// Tray icon or menu operation failed
    #[error("Tray error: {0}")]
    TrayError(String),

    /// A proxy endpoint could not be turned into a usable URL
    #[error("Invalid proxy endpoint: {0}")]
    InvalidProxy(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Implement Serialize for Tauri IPC compatibility.
/// Tauri requires errors to be serializable to send to the frontend.
impl Serialize for ShellError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<tauri::Error> for ShellError {
    fn from(err: tauri::Error) -> Self {
        ShellError::WindowError(err.to_string())
    }
}

impl From<String> for ShellError {
    fn from(msg: String) -> Self {
        ShellError::Other(msg)
    }
}

impl From<&str> for ShellError {
    fn from(msg: &str) -> Self {
        ShellError::Other(msg.to_string())
    }
}

/// Type alias for Results using ShellError.
pub type ShellResult<T> = Result<T, ShellError>;
