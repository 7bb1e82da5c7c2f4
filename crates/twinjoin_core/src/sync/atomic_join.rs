//! # Lock-Free Completion Join
//!
//! The same state machine as [`CompletionJoin`](super::CompletionJoin), packed
//! into one `AtomicU8` and advanced with compare-and-swap.
//!
//! ## Layout
//!
//! ```text
//!   bit 2      bit 1        bit 0
//! ┌─────────┬────────────┬───────────┐
//! │ claimed │ second done│ first done│
//! └─────────┴────────────┴───────────┘
//! ```
//!
//! The byte only ever moves along `JoinState::advance`, so it changes at most
//! twice over the life of the join. A signal retries its CAS only when the
//! other party moved the byte first (or on a spurious weak failure).

use std::sync::atomic::{AtomicU8, Ordering};

use super::join::TwoPartyJoin;
use super::state::{JoinState, Party};

/// Two-party completion join built on a single atomic byte.
///
/// ## Usage
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use twinjoin_core::AtomicCompletionJoin;
///
/// let join = Arc::new(AtomicCompletionJoin::new());
/// let other = Arc::clone(&join);
///
/// let worker = thread::spawn(move || other.signal_second());
/// let mine = join.signal_first();
/// let theirs = worker.join().unwrap();
///
/// // Exactly one side proceeds.
/// assert!(mine ^ theirs);
/// ```
#[derive(Debug, Default)]
pub struct AtomicCompletionJoin {
    bits: AtomicU8,
}

impl AtomicCompletionJoin {
    /// Creates a join with neither party signaled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bits: AtomicU8::new(JoinState::Neither.bits()),
        }
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
        let mut current = self.bits.load(Ordering::Acquire);
        loop {
            let before = decode(current);
            let (after, claimed) = before.advance(party);

            if after == before {
                if before.is_claimed() {
                    tracing::trace!(target: "twinjoin::join", %party, implementation = "atomic", "signal after claim absorbed");
                }
                return false;
            }

            match self.bits.compare_exchange_weak(
                current,
                after.bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if claimed {
                        tracing::trace!(target: "twinjoin::join", %party, implementation = "atomic", "join claimed");
                    }
                    return claimed;
                }
                Err(observed) => current = observed,
            }
        }
    }

    /// Returns a snapshot of the join state.
    #[must_use]
    pub fn state(&self) -> JoinState {
        decode(self.bits.load(Ordering::Acquire))
    }

    /// Returns whether `party` has signaled.
    #[must_use]
    pub fn is_done(&self, party: Party) -> bool {
        self.state().is_done(party)
    }

    /// Returns whether completion has been claimed.
    #[must_use]
    pub fn is_claimed(&self) -> bool {
        self.state().is_claimed()
    }
}

/// Decodes the stored byte. Only `JoinState` layouts are ever stored.
#[inline]
fn decode(bits: u8) -> JoinState {
    match JoinState::from_bits(bits) {
        Some(state) => state,
        None => {
            debug_assert!(false, "corrupt join state {bits:#05b}");
            JoinState::BothClaimed
        }
    }
}

impl TwoPartyJoin for AtomicCompletionJoin {
    #[inline]
    fn signal(&self, party: Party) -> bool {
        AtomicCompletionJoin::signal(self, party)
    }

    #[inline]
    fn state(&self) -> JoinState {
        AtomicCompletionJoin::state(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_then_second() {
        let join = AtomicCompletionJoin::new();
        assert!(!join.signal_first());
        assert_eq!(join.state(), JoinState::OnlyFirst);
        assert!(join.signal_second());
        assert_eq!(join.state(), JoinState::BothClaimed);
    }

    #[test]
    fn test_second_then_first() {
        let join = AtomicCompletionJoin::new();
        assert!(!join.signal_second());
        assert!(join.signal_first());
        assert!(join.is_claimed());
    }

    #[test]
    fn test_repeated_calls_fire_once() {
        let join = AtomicCompletionJoin::new();
        assert!(!join.signal_first());
        assert!(!join.signal_first());
        assert!(join.signal_second());
        assert!(!join.signal_second());
        assert!(!join.signal_first());
    }

    #[test]
    fn test_single_party_never_claims() {
        let join = AtomicCompletionJoin::new();
        for _ in 0..100 {
            assert!(!join.signal_second());
        }
        assert!(join.is_done(Party::Second));
        assert!(!join.is_done(Party::First));
        assert!(!join.is_claimed());
    }

    #[test]
    fn test_const_construction() {
        static JOIN: AtomicCompletionJoin = AtomicCompletionJoin::new();
        assert_eq!(JOIN.state(), JoinState::Neither);
    }

    #[test]
    fn test_stored_byte_matches_state() {
        let join = AtomicCompletionJoin::new();
        join.signal_second();
        assert_eq!(join.bits.load(Ordering::Relaxed), JoinState::OnlySecond.bits());
        join.signal_first();
        assert_eq!(join.bits.load(Ordering::Relaxed), 0b111);
    }
}
