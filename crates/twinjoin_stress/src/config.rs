//! # Stress Run Configuration
//!
//! Loaded once at startup from TOML. Every key is optional.
//!
//! ```toml
//! implementation = "atomic"
//! trials = 50000
//! threads-per-party = 2
//! calls-per-thread = 4
//! seed = 7
//! ```

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{StressError, StressResult};

/// Upper bound on `threads-per-party`; a trial spawns twice this many threads.
pub const MAX_THREADS_PER_PARTY: usize = 256;

/// Upper bound on `calls-per-thread`.
pub const MAX_CALLS_PER_THREAD: usize = 1_000_000;

/// Which join implementation a run exercises.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Implementation {
    /// `CompletionJoin`, three flags behind a mutex.
    #[default]
    Mutex,
    /// `AtomicCompletionJoin`, one CAS over a packed byte.
    Atomic,
}

impl fmt::Display for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mutex => f.write_str("mutex"),
            Self::Atomic => f.write_str("atomic"),
        }
    }
}

/// Configuration for a stress run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct StressConfig {
    /// Join implementation under test.
    pub implementation: Implementation,
    /// Number of independent joins to exercise.
    pub trials: usize,
    /// Threads signaling each party per trial.
    pub threads_per_party: usize,
    /// Signals sent by each thread.
    pub calls_per_thread: usize,
    /// Seed for the per-trial spawn order shuffle.
    pub seed: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            implementation: Implementation::Mutex,
            trials: 10_000,
            threads_per_party: 1,
            calls_per_thread: 1,
            seed: 0x5EED,
        }
    }
}

impl StressConfig {
    /// Quick config for smoke runs: few trials, a little contention.
    #[must_use]
    pub const fn smoke(implementation: Implementation) -> Self {
        Self {
            implementation,
            trials: 200,
            threads_per_party: 2,
            calls_per_thread: 3,
            seed: 0x5EED,
        }
    }

    /// Parses a config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::Parse`] for malformed TOML or unknown keys and
    /// [`StressError::InvalidConfig`] if validation fails.
    pub fn from_toml_str(text: &str) -> StressResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::Io`] if the file cannot be read, otherwise the
    /// errors of [`StressConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> StressResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StressError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded stress config");
        Self::from_toml_str(&text)
    }

    /// Rejects configs that cannot produce a meaningful run.
    ///
    /// `threads-per-party` must be in `1..=MAX_THREADS_PER_PARTY` and
    /// `calls-per-thread` in `1..=MAX_CALLS_PER_THREAD`.
    ///
    /// # Errors
    ///
    /// Returns [`StressError::InvalidConfig`] naming the first offending key.
    pub fn validate(&self) -> StressResult<()> {
        if self.trials == 0 {
            return Err(StressError::InvalidConfig("trials must be at least 1".into()));
        }
        if !(1..=MAX_THREADS_PER_PARTY).contains(&self.threads_per_party) {
            return Err(StressError::InvalidConfig(format!(
                "threads-per-party must be between 1 and {MAX_THREADS_PER_PARTY}, got {}",
                self.threads_per_party
            )));
        }
        if !(1..=MAX_CALLS_PER_THREAD).contains(&self.calls_per_thread) {
            return Err(StressError::InvalidConfig(format!(
                "calls-per-thread must be between 1 and {MAX_CALLS_PER_THREAD}, got {}",
                self.calls_per_thread
            )));
        }
        Ok(())
    }

    /// Total threads spawned per trial. Saturates on configs that have not
    /// been validated.
    #[must_use]
    pub const fn threads_per_trial(&self) -> usize {
        self.threads_per_party.saturating_mul(2)
    }
}
