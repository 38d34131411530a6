//! Error types for the commit protocol.

use accord_ledger::LedgerError;
use accord_types::{GroupId, ParticipantId, UnitId};
use thiserror::Error;

/// Commit protocol errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommitError {
    /// The group was never created or is not a commit group.
    #[error("Unknown commit group: {group}")]
    UnknownGroup { group: GroupId },

    /// A named cohort member is not a registered participant.
    #[error("Unknown participant {participant} in group {group}")]
    UnknownParticipant {
        group: GroupId,
        participant: ParticipantId,
    },

    /// A transaction needs at least one participant to prepare.
    #[error("Empty cohort for transaction in group {group}")]
    EmptyCohort { group: GroupId },

    /// The participant is not part of this transaction's cohort.
    #[error("Participant {participant} is not in the cohort of {unit}")]
    NotInCohort {
        unit: UnitId,
        participant: ParticipantId,
    },

    /// The unit exists but is not a commit transaction.
    #[error("Unit {unit} is not a transaction")]
    NotATransaction { unit: UnitId },

    /// No prepare round is tracked for this unit (engine restarted
    /// without a durable decision log).
    #[error("No prepare round for {unit}")]
    NoPrepareRound { unit: UnitId },

    /// Ledger lookup or transition failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for commit operations.
pub type CommitResult<T> = Result<T, CommitError>;
