//! # Lock-Based Completion Join
//!
//! Three monotonic flags behind one `parking_lot::Mutex`.
//!
//! ## Thread Safety
//!
//! Both entry points take the same lock for the whole read-modify-write:
//! "mark mine done, check the other side and the claim, maybe claim". Two
//! overlapping calls are therefore serialized and the second one in lock
//! order is the only one that can see both flags set.

use parking_lot::Mutex;

use super::join::TwoPartyJoin;
use super::state::{JoinState, Party};

/// The three flags guarded by the join's lock.
#[derive(Debug, Default)]
struct JoinFlags {
    first_done: bool,
    second_done: bool,
    claimed: bool,
}

impl JoinFlags {
    #[inline]
    fn state(&self) -> JoinState {
        JoinState::from_flags(self.first_done, self.second_done, self.claimed)
    }
}

/// Two-party completion join built on a mutex.
///
/// ## Usage
///
/// ```rust
/// use twinjoin_core::CompletionJoin;
///
/// let join = CompletionJoin::new();
///
/// // Whichever side finishes second gets `true`, exactly once.
/// assert!(!join.signal_first());
/// assert!(join.signal_second());
///
/// // Extra signals are absorbed.
/// assert!(!join.signal_first());
/// assert!(!join.signal_second());
/// ```
#[derive(Debug, Default)]
pub struct CompletionJoin {
    flags: Mutex<JoinFlags>,
}

impl CompletionJoin {
    /// Creates a join with neither party signaled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the first party has finished.
    ///
    /// Returns `true` if the second party had already signaled and no earlier
    /// call has claimed completion.
    #[inline]
    pub fn signal_first(&self) -> bool {
        self.signal(Party::First)
    }

    /// Records that the second party has finished.
    ///
    /// Returns `true` if the first party had already signaled and no earlier
    /// call has claimed completion.
    #[inline]
    pub fn signal_second(&self) -> bool {
        self.signal(Party::Second)
    }

    /// Records that `party` has finished.
    pub fn signal(&self, party: Party) -> bool {
        let (before, claimed) = {
            let mut flags = self.flags.lock();
            let before = flags.state();
            let (after, claimed) = before.advance(party);

            // Only ever sets flags, never clears them.
            let (first_done, second_done, claim) = after.flags();
            flags.first_done |= first_done;
            flags.second_done |= second_done;
            flags.claimed |= claim;

            (before, claimed)
        };

        if claimed {
            tracing::trace!(target: "twinjoin::join", %party, implementation = "mutex", "join claimed");
        } else if before.is_claimed() {
            tracing::trace!(target: "twinjoin::join", %party, implementation = "mutex", "signal after claim absorbed");
        }

        claimed
    }

    /// Returns a snapshot of the join state.
    #[must_use]
    pub fn state(&self) -> JoinState {
        self.flags.lock().state()
    }

    /// Returns whether `party` has signaled.
    #[must_use]
    pub fn is_done(&self, party: Party) -> bool {
        let flags = self.flags.lock();
        match party {
            Party::First => flags.first_done,
            Party::Second => flags.second_done,
        }
    }

    /// Returns whether completion has been claimed.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.flags.lock().claimed
    }
}

impl TwoPartyJoin for CompletionJoin {
    #[inline]
    fn signal(&self, party: Party) -> bool {
        CompletionJoin::signal(self, party)
    }

    #[inline]
    fn state(&self) -> JoinState {
        CompletionJoin::state(self)
    }

    #[inline]
    fn is_done(&self, party: Party) -> bool {
        CompletionJoin::is_done(self, party)
    }

    #[inline]
    fn is_claimed(&self) -> bool {
        CompletionJoin::is_claimed(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_then_second() {
        let join = CompletionJoin::new();
        assert!(!join.signal_first());
        assert_eq!(join.state(), JoinState::OnlyFirst);
        assert!(join.signal_second());
        assert_eq!(join.state(), JoinState::BothClaimed);
    }

    #[test]
    fn test_second_then_first() {
        let join = CompletionJoin::new();
        assert!(!join.signal_second());
        assert_eq!(join.state(), JoinState::OnlySecond);
        assert!(join.signal_first());
        assert!(join.is_claimed());
    }

    #[test]
    fn test_repeated_calls_fire_once() {
        let join = CompletionJoin::new();
        assert!(!join.signal_first());
        assert!(!join.signal_first());
        assert!(join.signal_second());
        assert!(!join.signal_second());
        assert!(!join.signal_first());
    }

    #[test]
    fn test_single_party_never_claims() {
        let join = CompletionJoin::new();
        for _ in 0..100 {
            assert!(!join.signal_first());
        }
        assert!(join.is_done(Party::First));
        assert!(!join.is_done(Party::Second));
        assert!(!join.is_claimed());
    }

    #[test]
    fn test_single_call_leaves_join_open() {
        let join = CompletionJoin::default();
        assert!(!join.signal(Party::First));
        assert_eq!(join.state(), JoinState::OnlyFirst);
        assert!(!join.is_claimed());
    }

    #[test]
    fn test_fresh_join_is_neither() {
        let join = CompletionJoin::new();
        assert_eq!(join.state(), JoinState::Neither);
        assert!(!join.is_done(Party::First));
        assert!(!join.is_done(Party::Second));
    }
}
