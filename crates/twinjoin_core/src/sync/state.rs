//! # Join State Machine
//!
//! The transition table shared by every join implementation.
//!
//! ```text
//!              first                second
//!   Neither ─────────> OnlyFirst ──────────> BothClaimed  (claim)
//!      │                                         ▲
//!      │ second                                  │
//!      └──────────> OnlySecond ──────────────────┘
//!                               first (claim)
//! ```
//!
//! Every other `(state, party)` pair maps back to the same state and does
//! not claim. `BothClaimed` is absorbing.

use std::fmt;

/// Bit set once the first party has signaled.
pub(crate) const FIRST_BIT: u8 = 0b001;
/// Bit set once the second party has signaled.
pub(crate) const SECOND_BIT: u8 = 0b010;
/// Bit set by the call that claims completion.
pub(crate) const CLAIMED_BIT: u8 = 0b100;

/// One of the two parties taking part in a join.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Party {
    /// The party signaling through `signal_first`.
    First,
    /// The party signaling through `signal_second`.
    Second,
}

impl Party {
    /// Both parties, in declaration order.
    pub const ALL: [Party; 2] = [Party::First, Party::Second];

    /// Returns the complementary party.
    #[inline]
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    /// Returns the state bit recording this party's signal.
    #[inline]
    pub(crate) const fn bit(self) -> u8 {
        match self {
            Self::First => FIRST_BIT,
            Self::Second => SECOND_BIT,
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Second => f.write_str("second"),
        }
    }
}

/// Observable state of a two-party join.
///
/// The discriminants are the packed flag layout used by
/// [`AtomicCompletionJoin`](crate::AtomicCompletionJoin): bit 0 is the first
/// party, bit 1 the second party, bit 2 the claim. "Both signaled but not
/// claimed" has no variant because the claim is taken in the same step that
/// records the second signal.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JoinState {
    /// No party has signaled yet.
    #[default]
    Neither = 0,
    /// Only the first party has signaled.
    OnlyFirst = FIRST_BIT,
    /// Only the second party has signaled.
    OnlySecond = SECOND_BIT,
    /// Both parties have signaled and completion has been claimed.
    BothClaimed = FIRST_BIT | SECOND_BIT | CLAIMED_BIT,
}

impl JoinState {
    /// Applies a signal from `party`.
    ///
    /// Returns the successor state and whether this signal is the one that
    /// claims completion. The claim is `true` for exactly the two transitions
    /// into [`JoinState::BothClaimed`].
    #[inline]
    #[must_use]
    pub const fn advance(self, party: Party) -> (Self, bool) {
        match (self, party) {
            (Self::Neither, Party::First) => (Self::OnlyFirst, false),
            (Self::Neither, Party::Second) => (Self::OnlySecond, false),
            (Self::OnlyFirst, Party::Second) | (Self::OnlySecond, Party::First) => {
                (Self::BothClaimed, true)
            }
            (state, _) => (state, false),
        }
    }

    /// Builds the state from the three flags of a lock-based join.
    ///
    /// `claimed` is implied by the other two; a join never exposes both
    /// signals without the claim.
    #[inline]
    #[must_use]
    pub fn from_flags(first_done: bool, second_done: bool, claimed: bool) -> Self {
        debug_assert_eq!(
            claimed,
            first_done && second_done,
            "claim must be taken in the step that records the second signal"
        );
        match (first_done, second_done) {
            (false, false) => Self::Neither,
            (true, false) => Self::OnlyFirst,
            (false, true) => Self::OnlySecond,
            (true, true) => Self::BothClaimed,
        }
    }

    /// Returns `(first_done, second_done, claimed)`.
    #[inline]
    #[must_use]
    pub const fn flags(self) -> (bool, bool, bool) {
        let bits = self as u8;
        (
            bits & FIRST_BIT != 0,
            bits & SECOND_BIT != 0,
            bits & CLAIMED_BIT != 0,
        )
    }

    /// Decodes a packed state byte. Returns `None` for layouts no join can
    /// reach.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Neither),
            FIRST_BIT => Some(Self::OnlyFirst),
            SECOND_BIT => Some(Self::OnlySecond),
            0b111 => Some(Self::BothClaimed),
            _ => None,
        }
    }

    /// Returns the packed state byte.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Returns whether `party` has signaled in this state.
    #[inline]
    #[must_use]
    pub const fn is_done(self, party: Party) -> bool {
        self.bits() & party.bit() != 0
    }

    /// Returns whether completion has been claimed.
    #[inline]
    #[must_use]
    pub const fn is_claimed(self) -> bool {
        matches!(self, Self::BothClaimed)
    }
}

impl fmt::Display for JoinState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Neither => "neither",
            Self::OnlyFirst => "only-first",
            Self::OnlySecond => "only-second",
            Self::BothClaimed => "both-claimed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [JoinState; 4] = [
        JoinState::Neither,
        JoinState::OnlyFirst,
        JoinState::OnlySecond,
        JoinState::BothClaimed,
    ];

    #[test]
    fn test_transition_table() {
        assert_eq!(
            JoinState::Neither.advance(Party::First),
            (JoinState::OnlyFirst, false)
        );
        assert_eq!(
            JoinState::Neither.advance(Party::Second),
            (JoinState::OnlySecond, false)
        );
        assert_eq!(
            JoinState::OnlyFirst.advance(Party::Second),
            (JoinState::BothClaimed, true)
        );
        assert_eq!(
            JoinState::OnlySecond.advance(Party::First),
            (JoinState::BothClaimed, true)
        );
    }

    #[test]
    fn test_repeats_are_absorbed() {
        assert_eq!(
            JoinState::OnlyFirst.advance(Party::First),
            (JoinState::OnlyFirst, false)
        );
        assert_eq!(
            JoinState::OnlySecond.advance(Party::Second),
            (JoinState::OnlySecond, false)
        );
        for party in Party::ALL {
            assert_eq!(
                JoinState::BothClaimed.advance(party),
                (JoinState::BothClaimed, false)
            );
        }
    }

    #[test]
    fn test_claim_only_enters_both_claimed() {
        for state in ALL_STATES {
            for party in Party::ALL {
                let (next, claimed) = state.advance(party);
                if claimed {
                    assert_ne!(state, JoinState::BothClaimed);
                    assert_eq!(next, JoinState::BothClaimed);
                }
            }
        }
    }

    #[test]
    fn test_flags_are_monotonic() {
        for state in ALL_STATES {
            for party in Party::ALL {
                let (next, _) = state.advance(party);
                assert_eq!(next.bits() & state.bits(), state.bits());
                assert!(next.is_done(party));
            }
        }
    }

    #[test]
    fn test_bits_decode() {
        for state in ALL_STATES {
            assert_eq!(JoinState::from_bits(state.bits()), Some(state));
            let (first, second, claimed) = state.flags();
            assert_eq!(JoinState::from_flags(first, second, claimed), state);
        }
        assert_eq!(JoinState::from_bits(0b011), None);
        assert_eq!(JoinState::from_bits(0b100), None);
    }

    #[test]
    fn test_party_other() {
        assert_eq!(Party::First.other(), Party::Second);
        assert_eq!(Party::Second.other(), Party::First);
        assert_eq!(Party::First.to_string(), "first");
        assert_eq!(JoinState::BothClaimed.to_string(), "both-claimed");
    }
}
