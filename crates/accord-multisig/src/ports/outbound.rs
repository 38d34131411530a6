//! Driven ports (outbound dependencies) for the multisig protocol.

use crate::error::MultisigResult;
use accord_types::{GroupId, ParticipantId};
use async_trait::async_trait;

/// Owner-set and threshold queries answered by the participant registry.
#[async_trait]
pub trait WalletMembership: Send + Sync {
    /// Active owners of the wallet, in registration order.
    async fn owners(&self, group: &GroupId) -> MultisigResult<Vec<ParticipantId>>;

    /// Whether the participant is an active owner.
    async fn is_owner(&self, group: &GroupId, participant: &ParticipantId)
        -> MultisigResult<bool>;

    /// The wallet's configured signature threshold.
    async fn threshold(&self, group: &GroupId) -> MultisigResult<usize>;
}
