//! Registry-backed implementations of the protocol membership ports.
//!
//! Each protocol asks its own questions of group membership; this adapter
//! answers all of them from the one `ParticipantRegistry`, translating
//! registry errors into each protocol's vocabulary. A group whose
//! parameters belong to a different protocol is reported as unknown to
//! the protocol asking, so a wallet can never host a block and a
//! consensus network can never host a wallet transaction.

use accord_commit::{CohortMembership, CommitError, CommitResult};
use accord_consensus::{ConsensusError, ConsensusResult, MembershipProvider};
use accord_multisig::{MultisigError, MultisigResult, WalletMembership};
use accord_registry::{ParticipantRegistry, RegistryError};
use accord_types::{ConsensusAlgorithm, GroupId, GroupParams, Participant, ParticipantId, Weight};
use async_trait::async_trait;
use std::sync::Arc;

/// The registry viewed through the protocols' membership ports.
#[derive(Clone)]
pub struct RegistryMembership {
    registry: Arc<ParticipantRegistry>,
}

impl RegistryMembership {
    pub fn new(registry: Arc<ParticipantRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl MembershipProvider for RegistryMembership {
    async fn active_participants(&self, group: &GroupId) -> ConsensusResult<Vec<Participant>> {
        self.registry
            .list_active(group)
            .map_err(|_| ConsensusError::UnknownGroup {
                group: group.clone(),
            })
    }

    async fn total_weight(&self, group: &GroupId) -> ConsensusResult<Weight> {
        self.registry
            .total_weight(group)
            .map_err(|_| ConsensusError::UnknownGroup {
                group: group.clone(),
            })
    }

    async fn is_active(
        &self,
        group: &GroupId,
        participant: &ParticipantId,
    ) -> ConsensusResult<bool> {
        self.registry
            .is_active(group, participant)
            .map_err(|_| ConsensusError::UnknownGroup {
                group: group.clone(),
            })
    }

    async fn algorithm(&self, group: &GroupId) -> ConsensusResult<ConsensusAlgorithm> {
        match self.registry.params(group) {
            Ok(GroupParams::Consensus { algorithm }) => Ok(algorithm),
            // Exists but parameterized for another protocol.
            Ok(_) | Err(_) => Err(ConsensusError::UnknownGroup {
                group: group.clone(),
            }),
        }
    }
}

#[async_trait]
impl CohortMembership for RegistryMembership {
    async fn is_registered(
        &self,
        group: &GroupId,
        participant: &ParticipantId,
    ) -> CommitResult<bool> {
        self.timeout_ms(group).await?;
        match self.registry.get(group, participant) {
            Ok(_) => Ok(true),
            Err(RegistryError::UnknownParticipant { .. }) => Ok(false),
            Err(_) => Err(CommitError::UnknownGroup {
                group: group.clone(),
            }),
        }
    }

    async fn timeout_ms(&self, group: &GroupId) -> CommitResult<u64> {
        match self.registry.params(group) {
            Ok(GroupParams::Commit { timeout_ms }) => Ok(timeout_ms),
            Ok(_) | Err(_) => Err(CommitError::UnknownGroup {
                group: group.clone(),
            }),
        }
    }
}

#[async_trait]
impl WalletMembership for RegistryMembership {
    async fn owners(&self, group: &GroupId) -> MultisigResult<Vec<ParticipantId>> {
        self.threshold(group).await?;
        self.registry
            .list_active(group)
            .map(|members| members.into_iter().map(|p| p.id).collect())
            .map_err(|_| MultisigError::UnknownGroup {
                group: group.clone(),
            })
    }

    async fn is_owner(
        &self,
        group: &GroupId,
        participant: &ParticipantId,
    ) -> MultisigResult<bool> {
        self.threshold(group).await?;
        self.registry
            .is_active(group, participant)
            .map_err(|_| MultisigError::UnknownGroup {
                group: group.clone(),
            })
    }

    async fn threshold(&self, group: &GroupId) -> MultisigResult<usize> {
        match self.registry.params(group) {
            Ok(GroupParams::Wallet { threshold }) => Ok(threshold),
            Ok(_) | Err(_) => Err(MultisigError::UnknownGroup {
                group: group.clone(),
            }),
        }
    }
}
