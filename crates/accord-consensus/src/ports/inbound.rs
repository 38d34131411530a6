//! Driving port (API) for the consensus protocol.

use crate::domain::{Vote, VoteOutcome};
use crate::error::ConsensusResult;
use accord_types::{AgreementUnit, Ballot, GroupId, ParticipantId, UnitId};
use async_trait::async_trait;

/// The consensus operations exposed to the engine facade.
#[async_trait]
pub trait ConsensusApi: Send + Sync {
    /// Elect a proposer and create a block in `Proposed`.
    ///
    /// Fails with `NoActiveParticipants` when the group's total active
    /// weight is zero.
    async fn propose_block(
        &self,
        group: &GroupId,
        payload: Vec<u8>,
    ) -> ConsensusResult<AgreementUnit>;

    /// Cast a yes/no vote on a proposed block.
    ///
    /// Duplicate votes are absorbed; the decisive vote transitions the
    /// block exactly once.
    async fn cast_vote(
        &self,
        unit: &UnitId,
        participant: &ParticipantId,
        vote: Vote,
    ) -> ConsensusResult<VoteOutcome>;

    /// Fetch a block and its recorded votes.
    async fn get_block(&self, unit: &UnitId) -> ConsensusResult<(AgreementUnit, Vec<Ballot>)>;
}
