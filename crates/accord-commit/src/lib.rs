//! # Commit Protocol
//!
//! Two-phase-commit coordination over a named cohort:
//!
//! - **Phase 1 (prepare)**: every cohort member is solicited for a
//!   prepare vote; [`run_prepare`](ports::CommitApi::run_prepare) blocks
//!   (bounded by the group's timeout) until the cohort has answered or the
//!   deadline passes. A missing vote counts as a no.
//! - **Decision**: unanimity. One no vote, one timeout, or a
//!   cancellation forces abort; partial agreement is never sufficient.
//! - **Phase 2 (commit/abort)**: the decision is applied through the
//!   ledger's compare-and-swap and recorded for every participant.
//!   Participants that timed out still acknowledge the abort; the
//!   acknowledgment is idempotent.
//!
//! The decision derives purely from recorded prepare votes
//! ([`PrepareRound::from_ballots`](domain::PrepareRound::from_ballots)),
//! and every vote and decision flows through the [`DecisionLog`]
//! (ports::DecisionLog) outbound port. A durable deployment implements
//! that port; a recovering coordinator then re-derives the decision from
//! the log instead of re-soliciting participants that already answered.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{AbortReason, Decision, PrepareOutcome, PrepareRound, PrepareVote, Settlement};
pub use error::{CommitError, CommitResult};
pub use ports::{CohortMembership, CommitApi, DecisionLog, LogEntry, NullDecisionLog};
pub use service::CommitService;
