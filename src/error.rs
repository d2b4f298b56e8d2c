//! Unified error type hierarchy for the BL602 setup tool
//!
//! Provides structured error handling with ConfigError for settings files and
//! SetupError for everything that can abort the setup run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration file parsing and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Every way a setup run can fail.
///
/// All variants are fatal: the binary prints `user_message()` and exits 1.
#[derive(Error, Debug)]
pub enum SetupError {
    /// External command ran but exited non-zero (or was killed)
    #[error("Command '{cmd}' failed: {reason}")]
    CommandFailed { cmd: String, reason: String },

    /// External command could not be spawned because the program is missing
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// SDK directory does not exist
    #[error("SDK not found at {}", path.display())]
    SdkMissing { path: PathBuf, clone_url: String },

    /// SDK checkout points at a different remote
    #[error("SDK remote mismatch: expected {expected}")]
    RemoteMismatch { expected: String, found: String },

    #[error("Project directory not found: {}", .0.display())]
    ProjectMissing(PathBuf),

    #[error("Makefile not found: {}", .0.display())]
    MakefileMissing(PathBuf),

    #[error("project.mk not found: {}", .0.display())]
    ProjectMkMissing(PathBuf),

    /// Invalid input (e.g., package name with shell chars)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SetupError {
    /// Get a user-facing error message suitable for terminal output
    pub fn user_message(&self) -> String {
        match self {
            SetupError::CommandFailed { cmd, reason } => {
                format!("Failed to execute '{}': {}", cmd, reason)
            }
            SetupError::CommandNotFound(program) => format!(
                "'{}' is not installed or not on PATH. Install it and run the setup again.",
                program
            ),
            SetupError::SdkMissing { path, clone_url } => format!(
                "SDK is not installed at {}. Download and extract it there manually, or run:\n    git clone {} {}",
                path.display(),
                clone_url,
                path.display()
            ),
            SetupError::RemoteMismatch { expected, found } => format!(
                "SDK remote is incorrect. Make sure the remote points to {}.\nCurrent remotes:\n{}",
                expected,
                found.trim_end()
            ),
            SetupError::ProjectMissing(path) => format!(
                "Project path {} does not exist. Create the project directory first.",
                path.display()
            ),
            SetupError::MakefileMissing(path) => format!(
                "Makefile not found at {}. Make sure the project directory contains a Makefile.",
                path.display()
            ),
            SetupError::ProjectMkMissing(path) => format!(
                "project.mk not found. Check manually whether {} exists.",
                path.display()
            ),
            SetupError::InvalidInput(msg) => format!("Invalid input: {}", msg),
            SetupError::InvalidTransition { from, to } => {
                format!("Internal error: cannot move from {} to {}", from, to)
            }
            SetupError::Config(e) => format!("Configuration error: {}", e),
            SetupError::Io(e) => format!("File operation failed: {}", e),
        }
    }

    /// Process exit code for this failure. Every failure maps to 1.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Top-level result type for operations that may fail.
pub type Result<T> = std::result::Result<T, SetupError>;
