//! # Two-Party Completion Join
//!
//! ## The Problem
//!
//! ```text
//! Task A (init):    ...work... done ──┐
//! Task B (render):  ...work...... done ┴──> run the code that needs both
//!
//! Either task can finish first, or both at the same instant.
//! Check-then-set without exclusion: BOTH see "other not done" → nobody runs
//!                                   BOTH see "other done"     → runs twice
//! ```
//!
//! ## The Solution
//!
//! Each side signals its own completion. The signal that observes both sides
//! done, and no earlier claim, is told to proceed. The observation and the
//! update happen in one atomic step:
//!
//! - [`CompletionJoin`]: one `parking_lot::Mutex` over three flags
//! - [`AtomicCompletionJoin`]: one CAS over a packed byte
//!
//! Both implement [`TwoPartyJoin`]. [`JoinedAction`] runs a closure on the
//! claiming call.

mod atomic_join;
mod completion_join;
mod join;
mod joined_action;
mod state;

pub use atomic_join::AtomicCompletionJoin;
pub use completion_join::CompletionJoin;
pub use join::TwoPartyJoin;
pub use joined_action::JoinedAction;
pub use state::{JoinState, Party};
