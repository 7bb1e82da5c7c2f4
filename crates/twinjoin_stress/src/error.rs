//! # Stress Harness Error Types
//!
//! All errors that can occur while configuring or running a stress run. The
//! join itself is infallible; these cover the harness around it.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in the stress harness.
#[derive(Error, Debug)]
pub enum StressError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for the harness.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The effective configuration could not be rendered back to TOML.
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    /// The configuration parsed but describes an impossible run.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A trial produced a claim count other than exactly one.
    #[error("trial {trial} claimed {claims} times, expected exactly once")]
    InvariantViolated {
        /// Zero-based trial index.
        trial: usize,
        /// Number of signals that returned `true`.
        claims: usize,
    },

    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker thread in trial {trial}: {source}")]
    Spawn {
        /// Zero-based trial index.
        trial: usize,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// A worker thread panicked during a trial.
    ///
    /// Only reachable in unwinding builds. The release profile sets
    /// `panic = "abort"`, so there a worker panic aborts the process instead.
    #[error("worker thread panicked in trial {trial}")]
    WorkerPanicked {
        /// Zero-based trial index.
        trial: usize,
    },
}

/// Result type for stress harness operations.
pub type StressResult<T> = Result<T, StressError>;
