//! Unified error surface for the engine facade.

use accord_commit::CommitError;
use accord_consensus::ConsensusError;
use accord_ledger::LedgerError;
use accord_multisig::MultisigError;
use accord_registry::RegistryError;
use thiserror::Error;

/// Any error an engine operation can surface.
///
/// Callers that care which subsystem failed match the variant; everyone
/// else forwards the `Display` rendering of the inner error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Consensus(#[from] ConsensusError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    Multisig(#[from] MultisigError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
