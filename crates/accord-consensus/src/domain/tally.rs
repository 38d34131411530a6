//! Weight-based quorum tallying.

use accord_types::{UnitState, Weight};
use serde::{Deserialize, Serialize};

/// A consensus vote on a proposed block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vote {
    Yes,
    No,
}

/// Accumulated vote weight against a group's total active weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightTally {
    pub yes: Weight,
    pub no: Weight,
    pub total: Weight,
}

/// What a tally implies for the block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TallyOutcome {
    /// Quorum still reachable, not yet reached.
    Pending,
    /// Yes weight reached the Byzantine quorum.
    Finalize,
    /// Yes quorum can no longer be reached.
    Reject,
}

impl WeightTally {
    pub fn new(total: Weight) -> Self {
        Self { yes: 0, no: 0, total }
    }

    pub fn add(&mut self, vote: Vote, weight: Weight) {
        match vote {
            Vote::Yes => self.yes = self.yes.saturating_add(weight),
            Vote::No => self.no = self.no.saturating_add(weight),
        }
    }

    /// Byzantine quorum: ⌈2/3 · total⌉, widened to u128 so large stakes
    /// cannot overflow the multiplication.
    pub fn required(&self) -> u128 {
        (2 * u128::from(self.total)).div_ceil(3)
    }

    /// Evaluate the tally.
    ///
    /// Finalize wins ties with Reject: if yes already reached quorum the
    /// block is final regardless of accumulated no weight. Rejection
    /// triggers exactly when the weight not yet voting no can no longer
    /// reach the quorum (for an all-active electorate this is the moment
    /// no-weight exceeds ⌊total/3⌋).
    ///
    /// An empty electorate (total weight 0) stays Pending forever:
    /// zero-weight voters never decide a block on a vacuous quorum.
    pub fn outcome(&self) -> TallyOutcome {
        if self.total == 0 {
            return TallyOutcome::Pending;
        }
        let required = self.required();
        if u128::from(self.yes) >= required {
            return TallyOutcome::Finalize;
        }
        let reachable = u128::from(self.total.saturating_sub(self.no));
        if reachable < required {
            return TallyOutcome::Reject;
        }
        TallyOutcome::Pending
    }
}

/// Result of casting a consensus vote, surfaced to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// Vote recorded; quorum not yet decided.
    Recorded { tally: WeightTally },
    /// This participant already voted; nothing was counted again.
    Duplicate,
    /// This vote finalized the block.
    Finalized { tally: WeightTally },
    /// This vote made the quorum unreachable; block rejected.
    Rejected { tally: WeightTally },
    /// The block was already in a terminal state; the vote was kept for
    /// audit only.
    AlreadyDecided { state: UnitState },
}
