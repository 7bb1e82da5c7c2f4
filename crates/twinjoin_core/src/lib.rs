//! # TWINJOIN Core
//!
//! A one-shot join for two operations that finish independently:
//! - Either side may finish first, or both concurrently
//! - Exactly one signal is told "both are done"
//! - Extra signals are absorbed, never reported twice
//!
//! ## Rules
//!
//! 1. **Never blocks** - a signal holds a bounded critical section or runs a bounded CAS loop
//! 2. **Never fails** - misuse degrades to "never fires" or "fires once"
//! 3. **Never resets** - a new pair of operations needs a new join
//!
//! ## Example
//!
//! ```rust
//! use twinjoin_core::{CompletionJoin, TwoPartyJoin};
//!
//! let join = CompletionJoin::new();
//! if join.signal_second() {
//!     unreachable!("first side has not finished yet");
//! }
//! assert!(join.signal_first());
//! assert!(TwoPartyJoin::is_claimed(&join));
//! ```

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod sync;

pub use sync::{AtomicCompletionJoin, CompletionJoin, JoinState, JoinedAction, Party, TwoPartyJoin};
