//! Error types for the agreement ledger.

use accord_types::{UnitId, UnitState};
use thiserror::Error;

/// Ledger errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No unit with this ID exists.
    #[error("Unit not found: {unit}")]
    UnitNotFound { unit: UnitId },

    /// Compare-and-swap guard tripped: the unit is not in the expected
    /// state. The caller lost a race or holds a stale view; re-read the
    /// unit; do not resubmit the same transition.
    #[error("Invalid transition on {unit}: expected {expected}, found {actual}")]
    InvalidTransition {
        unit: UnitId,
        expected: UnitState,
        actual: UnitState,
    },
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
