use std::io;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),
}

impl BoardError {
    /// Classifies an I/O error raised while touching the attachment `name`.
    ///
    /// `NotFound` and `PermissionDenied` keep their own variants so callers can
    /// tell them apart from genuine disk failures.
    pub fn from_io(err: io::Error, name: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => BoardError::NotFound(name.to_string()),
            io::ErrorKind::PermissionDenied => BoardError::PermissionDenied(name.to_string()),
            _ => BoardError::Io(err),
        }
    }
}

/// Failure to hand a file over to the host's default application.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("no application found to open the file ({0})")]
    HandlerMissing(String),

    #[error("not allowed to open the file ({0})")]
    PermissionDenied(String),

    #[error("launcher '{program}' exited with {status}")]
    Failed { program: String, status: ExitStatus },

    #[error("failed to run launcher: {0}")]
    Spawn(io::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;
