//! Driven ports (outbound dependencies) for the consensus protocol.

use crate::error::ConsensusResult;
use accord_types::{ConsensusAlgorithm, GroupId, Participant, ParticipantId, Weight};
use async_trait::async_trait;

/// Membership and weight queries answered by the participant registry.
///
/// Quorum math must see accurate weights: the tally is recomputed against
/// this provider on every vote rather than cached across votes.
#[async_trait]
pub trait MembershipProvider: Send + Sync {
    /// Active participants in registration order (the tie-break order for
    /// the stake-weighted walk).
    async fn active_participants(&self, group: &GroupId) -> ConsensusResult<Vec<Participant>>;

    /// Total active weight of the group.
    async fn total_weight(&self, group: &GroupId) -> ConsensusResult<Weight>;

    /// Whether the participant is registered and active in the group.
    async fn is_active(
        &self,
        group: &GroupId,
        participant: &ParticipantId,
    ) -> ConsensusResult<bool>;

    /// The group's configured election algorithm.
    async fn algorithm(&self, group: &GroupId) -> ConsensusResult<ConsensusAlgorithm>;
}
