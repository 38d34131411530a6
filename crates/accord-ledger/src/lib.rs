//! # Agreement Ledger
//!
//! Append-only store of agreement units and their ballots. Two duties:
//!
//! 1. **Sequence assignment**: unit IDs get a per-group monotonic
//!    sequence number, starting at 0.
//! 2. **Lifecycle serialization**: [`AgreementLedger::transition`] is an
//!    atomic compare-and-swap on the unit's state. Every protocol's
//!    "exactly once" guarantee reduces to this one guard: of any number of
//!    racing callers, exactly one observes the successful swap and may
//!    fire side effects.
//!
//! Ballots are unique per (unit, participant); duplicates are absorbed and
//! reported, never double-stored. Ballots are still accepted after a unit
//! reaches a terminal state, for audit.

pub mod error;
mod ledger;

pub use error::{LedgerError, LedgerResult};
pub use ledger::{AgreementLedger, BallotOutcome};
