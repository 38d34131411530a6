//! # Consensus Protocol
//!
//! Proof-of-stake style agreement on proposed blocks:
//!
//! - **Proposer election**: a stake-weighted random draw over the group's
//!   active participants (or round-robin), behind an injectable
//!   [`EntropySource`](domain::EntropySource) so tests elect
//!   deterministically from a fixed seed.
//! - **Weight-quorum finality**: a block finalizes the instant accumulated
//!   yes-vote weight reaches ⌈2/3 · total⌉, and is rejected the instant the
//!   quorum becomes unreachable. Thresholds are weight-based, never vote
//!   counts: one dominant-stake participant can finalize alone.
//!
//! The terminal transition goes through the ledger's compare-and-swap, so
//! a decisive vote racing itself finalizes exactly once.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{
    elect_proposer, EntropySource, SeededEntropy, ThreadRngEntropy, Vote, VoteOutcome, WeightTally,
};
pub use error::{ConsensusError, ConsensusResult};
pub use ports::{ConsensusApi, MembershipProvider};
pub use service::ConsensusService;
