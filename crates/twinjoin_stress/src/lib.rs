//! # TWINJOIN Stress
//!
//! Exercises a two-party join from many threads, one fresh join per trial,
//! and checks that every trial claims exactly once.
//!
//! ## Example
//!
//! ```rust,no_run
//! use twinjoin_stress::{run, Implementation, StressConfig};
//!
//! let config = StressConfig {
//!     implementation: Implementation::Atomic,
//!     threads_per_party: 4,
//!     ..StressConfig::default()
//! };
//! let report = run(&config)?;
//! assert_eq!(report.claims, report.trials);
//! # Ok::<(), twinjoin_stress::StressError>(())
//! ```

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod runner;

pub use config::{
    Implementation, StressConfig, MAX_CALLS_PER_THREAD, MAX_THREADS_PER_PARTY,
};
pub use error::{StressError, StressResult};
pub use runner::{run, run_with, StressReport};
