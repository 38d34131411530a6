//! Driving port (API) for the commit protocol.

use crate::domain::{PrepareOutcome, PrepareVote, Settlement};
use crate::error::CommitResult;
use accord_types::{AgreementUnit, Ballot, GroupId, ParticipantId, UnitId};
use async_trait::async_trait;

/// The two-phase-commit operations exposed to the engine facade.
#[async_trait]
pub trait CommitApi: Send + Sync {
    /// Create a transaction in `Active` and open its prepare round.
    ///
    /// Every cohort member must be a registered participant of the group,
    /// and the cohort must not be empty.
    async fn begin_transaction(
        &self,
        group: &GroupId,
        to: String,
        value: u64,
        payload: Vec<u8>,
        cohort: Vec<ParticipantId>,
    ) -> CommitResult<AgreementUnit>;

    /// Record a cohort member's prepare vote.
    ///
    /// Duplicates are absorbed (the first answer stands). A no vote
    /// settles the transaction as `Aborted` immediately; a vote arriving
    /// after settlement is treated as a decision acknowledgment.
    async fn submit_prepare_vote(
        &self,
        unit: &UnitId,
        participant: &ParticipantId,
        vote: PrepareVote,
    ) -> CommitResult<PrepareOutcome>;

    /// Block until the transaction settles, bounded by the group's
    /// prepare timeout. Missing votes at the deadline force abort.
    ///
    /// Concurrent callers all observe the same decision; at most one of
    /// them reports having settled it.
    async fn run_prepare(&self, unit: &UnitId) -> CommitResult<Settlement>;

    /// Abort the transaction if it has not settled yet.
    ///
    /// Returns the decision in force afterwards, which is the earlier
    /// decision when the transaction already settled.
    async fn cancel_transaction(&self, unit: &UnitId) -> CommitResult<Settlement>;

    /// Fetch a transaction and its recorded prepare votes.
    async fn get_transaction(&self, unit: &UnitId)
        -> CommitResult<(AgreementUnit, Vec<Ballot>)>;
}
