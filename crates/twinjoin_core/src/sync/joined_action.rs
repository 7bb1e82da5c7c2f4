//! # Joined Action
//!
//! Pairs a join with the work that must wait for both parties.
//!
//! ```text
//!   party A finishes ──┐
//!                      ├──> join ──(claim)──> action runs once
//!   party B finishes ──┘
//! ```
//!
//! Typical use is two lifecycle callbacks that can complete in either order,
//! each calling its `*_finished` method as its last step.

use std::fmt;

use parking_lot::Mutex;

use super::completion_join::CompletionJoin;
use super::join::TwoPartyJoin;
use super::state::{JoinState, Party};

/// Runs an action exactly once, on whichever party finishes second.
///
/// ## Usage
///
/// ```rust
/// use twinjoin_core::JoinedAction;
///
/// let ready = JoinedAction::new(|| "both sides loaded");
///
/// assert_eq!(ready.second_finished(), None);
/// assert_eq!(ready.first_finished(), Some("both sides loaded"));
/// assert_eq!(ready.first_finished(), None);
/// ```
pub struct JoinedAction<F, J = CompletionJoin> {
    join: J,
    action: Mutex<Option<F>>,
}

impl<F, R> JoinedAction<F, CompletionJoin>
where
    F: FnOnce() -> R,
{
    /// Creates a joined action over a fresh [`CompletionJoin`].
    #[must_use]
    pub fn new(action: F) -> Self {
        Self::with_join(CompletionJoin::new(), action)
    }
}

impl<F, R, J> JoinedAction<F, J>
where
    F: FnOnce() -> R,
    J: TwoPartyJoin,
{
    /// Creates a joined action over the given join.
    ///
    /// The join should be fresh; if it has already been claimed the action
    /// never runs.
    #[must_use]
    pub fn with_join(join: J, action: F) -> Self {
        Self {
            join,
            action: Mutex::new(Some(action)),
        }
    }

    /// Records that the first party has finished.
    ///
    /// Returns the action's result if this call completed the join.
    pub fn first_finished(&self) -> Option<R> {
        self.finished(Party::First)
    }

    /// Records that the second party has finished.
    ///
    /// Returns the action's result if this call completed the join.
    pub fn second_finished(&self) -> Option<R> {
        self.finished(Party::Second)
    }

    /// Records that `party` has finished.
    ///
    /// The action runs on the calling thread, after the join's own critical
    /// section has been released.
    pub fn finished(&self, party: Party) -> Option<R> {
        if !self.join.signal(party) {
            return None;
        }
        // Only the claiming call gets here, so the lock is uncontended.
        let action = self.action.lock().take();
        action.map(|action| action())
    }

    /// Returns whether both parties have finished and the action has been
    /// claimed.
    ///
    /// This reports the claim, not the action's return: the claiming thread
    /// may still be running it. Use the `Some` result of the claiming
    /// `*_finished` call to observe the action's completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.join.is_claimed()
    }

    /// Returns a snapshot of the underlying join state.
    #[must_use]
    pub fn state(&self) -> JoinState {
        self.join.state()
    }
}

impl<F, J: fmt::Debug> fmt::Debug for JoinedAction<F, J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinedAction")
            .field("join", &self.join)
            .field("pending", &self.action.lock().is_some())
            .finish()
    }
}
