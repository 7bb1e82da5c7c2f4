//! The interface shared by every two-party join.

use std::sync::Arc;

use super::state::{JoinState, Party};

/// A one-shot join of two independently finishing parties.
///
/// Each party may signal any number of times, from any thread, in any order.
/// Across the whole life of the join exactly one `signal` call returns `true`:
/// the first call to observe that both parties have signaled. Every other call
/// returns `false`.
pub trait TwoPartyJoin: Send + Sync {
    /// Records that `party` has finished.
    ///
    /// Returns `true` only on the call that claims completion.
    fn signal(&self, party: Party) -> bool;

    /// Returns a snapshot of the join state.
    ///
    /// The snapshot can be stale as soon as it is returned and never takes
    /// part in the claim decision.
    fn state(&self) -> JoinState;

    /// Records that the first party has finished.
    #[inline]
    fn signal_first(&self) -> bool {
        self.signal(Party::First)
    }

    /// Records that the second party has finished.
    #[inline]
    fn signal_second(&self) -> bool {
        self.signal(Party::Second)
    }

    /// Returns whether `party` has signaled.
    #[inline]
    fn is_done(&self, party: Party) -> bool {
        self.state().is_done(party)
    }

    /// Returns whether completion has been claimed.
    #[inline]
    fn is_claimed(&self) -> bool {
        self.state().is_claimed()
    }
}

impl<J: TwoPartyJoin + ?Sized> TwoPartyJoin for Arc<J> {
    #[inline]
    fn signal(&self, party: Party) -> bool {
        (**self).signal(party)
    }

    #[inline]
    fn state(&self) -> JoinState {
        (**self).state()
    }
}

impl<J: TwoPartyJoin + ?Sized> TwoPartyJoin for &J {
    #[inline]
    fn signal(&self, party: Party) -> bool {
        (**self).signal(party)
    }

    #[inline]
    fn state(&self) -> JoinState {
        (**self).state()
    }
}
