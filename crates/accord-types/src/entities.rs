//! Core agreement entities.
//!
//! These are plain records: external collaborators receive clones of them
//! for logging and rendering, and nothing here carries behavior beyond
//! small state predicates. Lifecycle transitions are owned by the ledger.

use crate::ids::{GroupId, ParticipantId, UnitId, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default prepare-phase timeout for commit groups, in milliseconds.
pub const DEFAULT_COMMIT_TIMEOUT_MS: u64 = 30_000;

/// Whether a participant currently counts toward quorums.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ParticipantStatus {
    #[default]
    Active,
    Inactive,
}

/// A registered member of a group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub group: GroupId,
    pub weight: Weight,
    pub status: ParticipantStatus,
    /// Unix millis at first registration. Re-registration keeps this.
    pub registered_at: u64,
}

impl Participant {
    pub fn is_active(&self) -> bool {
        self.status == ParticipantStatus::Active
    }
}

/// Proposer election algorithm for consensus groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ConsensusAlgorithm {
    /// Probability proportional to registered weight.
    #[default]
    StakeWeighted,
    /// Block number modulo active participant count, registration order.
    RoundRobin,
}

/// Protocol parameters fixed at group creation.
///
/// The variant determines which protocol may create units in the group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupParams {
    /// A consensus network.
    Consensus { algorithm: ConsensusAlgorithm },
    /// A two-phase-commit coordinator set.
    Commit { timeout_ms: u64 },
    /// A multi-signature wallet requiring `threshold` distinct signatures.
    Wallet { threshold: usize },
}

impl GroupParams {
    pub fn consensus() -> Self {
        Self::Consensus {
            algorithm: ConsensusAlgorithm::StakeWeighted,
        }
    }

    pub fn commit() -> Self {
        Self::Commit {
            timeout_ms: DEFAULT_COMMIT_TIMEOUT_MS,
        }
    }

    pub fn wallet(threshold: usize) -> Self {
        Self::Wallet { threshold }
    }
}

/// The thing being agreed on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitKind {
    /// A consensus block proposal.
    Block {
        number: u64,
        payload: Vec<u8>,
        proposer: ParticipantId,
    },
    /// A two-phase-commit transaction.
    Transaction {
        to: String,
        value: u64,
        payload: Vec<u8>,
    },
    /// A wallet transaction awaiting threshold signatures.
    WalletTransaction {
        to: String,
        value: u64,
        payload: Vec<u8>,
    },
}

/// Lifecycle state of an agreement unit.
///
/// Transitions are applied only through the ledger's compare-and-swap;
/// terminal states have no outgoing transitions, which is what makes
/// finalize/commit/execute happen exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitState {
    /// Wallet transaction awaiting signatures.
    Pending,
    /// Block awaiting votes.
    Proposed,
    /// Transaction in its prepare round.
    Active,
    /// Block reached the yes-weight quorum. Terminal.
    Finalized,
    /// Block can no longer reach quorum. Terminal.
    Rejected,
    /// Transaction committed unanimously. Terminal.
    Committed,
    /// Transaction aborted (a no vote, a timeout, or cancellation). Terminal.
    Aborted,
    /// Wallet transaction reached its signature threshold. Terminal.
    Executed,
}

impl UnitState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Finalized | Self::Rejected | Self::Committed | Self::Aborted | Self::Executed
        )
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Proposed => "proposed",
            Self::Active => "active",
            Self::Finalized => "finalized",
            Self::Rejected => "rejected",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
            Self::Executed => "executed",
        };
        f.write_str(s)
    }
}

/// An agreement unit: a block, a transaction, or a wallet transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementUnit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub state: UnitState,
    /// Unix millis at creation. Immutable.
    pub created_at: u64,
}

impl AgreementUnit {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// What a ballot expresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotKind {
    /// Consensus yes/no vote.
    Vote,
    /// Two-phase-commit prepare acknowledgment.
    PrepareAck,
    /// Wallet owner signature.
    Signature,
}

/// The value carried by a ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotValue {
    Yes,
    No,
    /// Opaque signature blob supplied by the caller; never verified here.
    Signature(Vec<u8>),
}

impl BallotValue {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// A recorded vote, prepare ack, or signature.
///
/// At most one ballot exists per (unit, participant); the ledger absorbs
/// duplicates so resubmission is never double-counted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub unit: UnitId,
    pub participant: ParticipantId,
    pub kind: BallotKind,
    pub value: BallotValue,
    /// Unix millis when first recorded.
    pub cast_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        for s in [
            UnitState::Finalized,
            UnitState::Rejected,
            UnitState::Committed,
            UnitState::Aborted,
            UnitState::Executed,
        ] {
            assert!(s.is_terminal(), "{s} should be terminal");
        }
        for s in [UnitState::Pending, UnitState::Proposed, UnitState::Active] {
            assert!(!s.is_terminal(), "{s} should not be terminal");
        }
    }

    #[test]
    fn default_commit_params_use_thirty_seconds() {
        assert_eq!(
            GroupParams::commit(),
            GroupParams::Commit { timeout_ms: 30_000 }
        );
    }

    #[test]
    fn unit_roundtrips_serde() {
        let unit = AgreementUnit {
            id: UnitId::new(GroupId::from("net"), 0),
            kind: UnitKind::Block {
                number: 0,
                payload: b"genesis".to_vec(),
                proposer: ParticipantId::from("a"),
            },
            state: UnitState::Proposed,
            created_at: 1,
        };
        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(serde_json::from_str::<AgreementUnit>(&json).unwrap(), unit);
    }
}
