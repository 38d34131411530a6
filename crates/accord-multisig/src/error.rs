//! Error types for the multisig protocol.

use accord_ledger::LedgerError;
use accord_types::{GroupId, ParticipantId, UnitId};
use thiserror::Error;

/// Multisig protocol errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MultisigError {
    /// The group was never created or is not a wallet group.
    #[error("Unknown wallet group: {group}")]
    UnknownGroup { group: GroupId },

    /// The signer is not a registered owner of the wallet.
    #[error("Participant {participant} is not an owner of the wallet behind {unit}")]
    UnauthorizedSigner {
        unit: UnitId,
        participant: ParticipantId,
    },

    /// The unit exists but is not a wallet transaction.
    #[error("Unit {unit} is not a wallet transaction")]
    NotAWalletTransaction { unit: UnitId },

    /// Ledger lookup or transition failure.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for multisig operations.
pub type MultisigResult<T> = Result<T, MultisigError>;
