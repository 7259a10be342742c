//! Shared CLI plumbing: error type, exit codes and the per-invocation context.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::services::{AdminServices, FileRejection, InvalidInput};
use crate::store::StoreError;

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command succeeded
    Success = 0,
    /// Input was rejected (bad file, empty name, unknown ID)
    ValidationError = 1,
    /// Reading or writing data failed
    IoError = 2,
}

impl ExitCode {
    /// Numeric process exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// A failed command: what went wrong and which exit code to report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CliError {
    /// Exit code category
    pub kind: ExitCode,
    /// Message printed to stderr
    pub message: String,
}

impl CliError {
    /// An I/O or storage failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::IoError,
            message: message.into(),
        }
    }

    /// A rejected input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::ValidationError,
            message: message.into(),
        }
    }

    /// Classifies a service error by its root cause.
    #[must_use]
    pub fn from_service(context: &str, error: &anyhow::Error) -> Self {
        let rejected = error.downcast_ref::<FileRejection>().is_some()
            || error.downcast_ref::<InvalidInput>().is_some()
            || matches!(
                error.downcast_ref::<StoreError>(),
                Some(StoreError::RecordNotFound { .. })
            );

        let message = format!("{context}: {error:#}");
        if rejected {
            Self::validation(message)
        } else {
            Self::io(message)
        }
    }

    /// Numeric process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.kind.code()
    }
}

/// Result type for command handlers.
pub type CliResult<T> = Result<T, CliError>;

/// Settings resolved once per invocation.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Loaded configuration
    pub config: Config,
    /// Data directory after `--data-dir` override
    pub data_dir: PathBuf,
}

impl CliContext {
    /// Resolves the data directory from the override or the config.
    pub fn new(config: Config, data_dir: Option<PathBuf>) -> CliResult<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => config
                .data_dir()
                .map_err(|e| CliError::io(format!("Failed to resolve data directory: {e}")))?,
        };
        Ok(Self { config, data_dir })
    }

    /// Opens the admin services over the data directory.
    pub fn services(&self) -> CliResult<AdminServices> {
        AdminServices::open(&self.config, &self.data_dir)
            .map_err(|e| CliError::io(format!("Failed to open data directory: {e:#}")))
    }
}

/// Prints `value` as a single JSON line.
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?;
    println!("{json}");
    Ok(())
}
