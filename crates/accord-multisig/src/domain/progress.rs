//! Signature counting toward the wallet threshold.

use accord_types::{Ballot, BallotKind, ParticipantId, UnitState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How far a wallet transaction is from execution.
///
/// Thresholds count distinct owners. Signatures from participants no
/// longer in the owner set stop counting, the same way a deregistered
/// voter's consensus weight does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureProgress {
    /// Distinct owner signatures recorded.
    pub signatures: usize,
    /// Signatures required to execute.
    pub threshold: usize,
}

impl SignatureProgress {
    /// Count signature ballots from current owners.
    pub fn from_ballots(ballots: &[Ballot], owners: &[ParticipantId], threshold: usize) -> Self {
        let owners: HashSet<&ParticipantId> = owners.iter().collect();
        let signatures = ballots
            .iter()
            .filter(|b| b.kind == BallotKind::Signature && owners.contains(&b.participant))
            .count();
        Self {
            signatures,
            threshold,
        }
    }

    pub fn is_met(&self) -> bool {
        self.signatures >= self.threshold
    }
}

/// Outcome of submitting a signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignOutcome {
    /// Signature recorded; the threshold is not met yet.
    Recorded { progress: SignatureProgress },
    /// The owner already signed this transaction; counted once.
    Duplicate,
    /// This signature met the threshold and executed the transaction.
    Executed { progress: SignatureProgress },
    /// The transaction already settled; the signature is audit-only.
    AlreadyExecuted { state: UnitState },
}
