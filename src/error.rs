//! Domain-specific error types for the enablement engine.
//!
//! Internal modules return typed errors built with [`thiserror`]; command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! EnablementError
//! ├── Filesystem(FilesystemError): available/enabled directory unreadable
//! ├── AfterObservation { FilesystemError, .. }: state unreadable once the tool ran
//! └── Execution { ExecError, .. }: toggle tool could not be run to completion
//!
//! ConfigError: configuration loading and validation
//! ```
//!
//! A toggle tool that runs and exits non-zero is *not* an error at this
//! level: it is reported through the reconciliation result or the
//! single-toggle status.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::enablement::EnablementState;

/// A path consulted during observation could not be read.
#[derive(Error, Debug)]
#[error("cannot read {}: {source}", .path.display())]
pub struct FilesystemError {
    /// Path that could not be listed or inspected.
    pub path: PathBuf,
    /// Underlying I/O error.
    pub source: io::Error,
}

impl FilesystemError {
    /// Build an error for `path`.
    #[must_use]
    pub fn new(path: &Path, source: io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Errors raised when an external command could not be run to completion.
///
/// These never carry an exit code: a process that ran and exited, whatever
/// its status, is reported through [`ExecResult`](crate::exec::ExecResult).
#[derive(Error, Debug)]
pub enum ExecError {
    /// The process could not be started (missing executable, permission denied).
    #[error("failed to execute: {program}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error from the spawn attempt.
        source: io::Error,
    },

    /// The process started but waiting on it or collecting its output failed.
    #[error("failed to collect output of {program}")]
    Wait {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The process did not exit within the configured timeout and was killed.
    #[error("{program} timed out after {} seconds", .timeout.as_secs())]
    TimedOut {
        /// Program that was invoked.
        program: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },
}

impl ExecError {
    /// Name of the program the failure relates to.
    #[must_use]
    pub fn program(&self) -> &str {
        match self {
            Self::Spawn { program, .. }
            | Self::Wait { program, .. }
            | Self::TimedOut { program, .. } => program,
        }
    }
}

/// Top-level error type for observation and toggle operations.
#[derive(Error, Debug)]
pub enum EnablementError {
    /// Observation failed; never reported as an empty state.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// The toggle tool ran but the state could not be observed afterwards.
    #[error("cannot observe state after toggle")]
    AfterObservation {
        /// Why the second observation failed.
        source: FilesystemError,
        /// State observed before the tool ran.
        before: EnablementState,
    },

    /// The toggle tool could not be run to completion.
    #[error("toggle command did not complete")]
    Execution {
        /// Why the command did not complete.
        source: ExecError,
        /// State observed before the command was attempted, when one was taken.
        before: Option<EnablementState>,
    },
}

impl EnablementError {
    /// State observed before a failed toggle command, if any.
    #[must_use]
    pub const fn before(&self) -> Option<&EnablementState> {
        match self {
            Self::Execution {
                before: Some(state),
                ..
            }
            | Self::AfterObservation { before: state, .. } => Some(state),
            _ => None,
        }
    }
}

impl From<ExecError> for EnablementError {
    fn from(source: ExecError) -> Self {
        Self::Execution {
            source,
            before: None,
        }
    }
}

/// Errors that arise from configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The config file is not valid TOML or does not match the schema.
    #[error("invalid TOML in {path}: {source}")]
    Parse {
        /// Path to the file that could not be parsed.
        path: String,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// The merged configuration failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
