//! Domain logic for two-phase commit.

pub mod round;

pub use round::{
    AbortReason, Decision, PrepareOutcome, PrepareRound, PrepareVote, RecordOutcome, Settlement,
};
