//! Error types for the consensus protocol.

use accord_ledger::LedgerError;
use accord_types::{GroupId, ParticipantId, UnitId};
use thiserror::Error;

/// Consensus protocol errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsensusError {
    /// The group was never created or is not a consensus group.
    #[error("Unknown consensus group: {group}")]
    UnknownGroup { group: GroupId },

    /// Proposer election needs at least one active participant with
    /// positive total weight.
    #[error("No active participants in group {group}")]
    NoActiveParticipants { group: GroupId },

    /// The voter is not an active participant of the block's group.
    #[error("Unauthorized voter {participant} on unit {unit}")]
    UnauthorizedVoter {
        unit: UnitId,
        participant: ParticipantId,
    },

    /// The unit exists but is not a consensus block.
    #[error("Unit {unit} is not a block")]
    NotABlock { unit: UnitId },

    /// Ledger lookup or transition failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for consensus operations.
pub type ConsensusResult<T> = Result<T, ConsensusError>;
