//! The registry service: a lock-guarded map of groups.

use crate::error::{RegistryError, RegistryResult};
use crate::group::Group;
use accord_types::{GroupId, GroupParams, Participant, ParticipantId, Weight};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

/// In-memory participant registry.
///
/// Construct one per engine; there is no ambient global instance. Reads
/// return cloned snapshots so callers never hold the lock.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    groups: RwLock<HashMap<GroupId, Group>>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group with no initial members.
    ///
    /// Wallet groups are validated against their initial membership, so a
    /// wallet created this way only passes with `threshold == 0`; use
    /// [`create_group_with_members`](Self::create_group_with_members) for
    /// real wallets.
    pub fn create_group(&self, group: GroupId, params: GroupParams) -> RegistryResult<()> {
        self.create_group_with_members(group, params, &[])
    }

    /// Create a group with its initial members registered atomically.
    ///
    /// Rejects wallet parameterizations whose threshold exceeds the
    /// membership count: a wallet that could never execute anything is a
    /// caller bug surfaced at creation time, not at signing time.
    pub fn create_group_with_members(
        &self,
        group: GroupId,
        params: GroupParams,
        members: &[(ParticipantId, Weight)],
    ) -> RegistryResult<()> {
        if let GroupParams::Wallet { threshold } = params {
            if threshold > members.len() {
                return Err(RegistryError::ThresholdExceedsMembership {
                    threshold,
                    members: members.len(),
                });
            }
        }

        let mut groups = self.groups.write();
        if groups.contains_key(&group) {
            return Err(RegistryError::GroupExists { group });
        }

        let mut g = Group::new(group.clone(), params);
        for (id, weight) in members {
            g.upsert(id.clone(), *weight);
        }
        info!(group = %group, members = members.len(), "Group created");
        groups.insert(group, g);
        Ok(())
    }

    /// Register a participant, updating weight idempotently on repeat.
    pub fn register(
        &self,
        group: &GroupId,
        participant: ParticipantId,
        weight: Weight,
    ) -> RegistryResult<Participant> {
        let mut groups = self.groups.write();
        let g = groups
            .get_mut(group)
            .ok_or_else(|| RegistryError::UnknownGroup {
                group: group.clone(),
            })?;
        let member = g.upsert(participant, weight);
        debug!(
            group = %group,
            participant = %member.id,
            weight,
            total_weight = g.total_active_weight(),
            "Participant registered"
        );
        Ok(member)
    }

    /// Remove a participant from a group.
    pub fn deregister(&self, group: &GroupId, participant: &ParticipantId) -> RegistryResult<()> {
        let mut groups = self.groups.write();
        let g = groups
            .get_mut(group)
            .ok_or_else(|| RegistryError::UnknownGroup {
                group: group.clone(),
            })?;
        g.remove(participant)
            .ok_or_else(|| RegistryError::UnknownParticipant {
                group: group.clone(),
                participant: participant.clone(),
            })?;
        debug!(group = %group, participant = %participant, "Participant deregistered");
        Ok(())
    }

    pub fn get(
        &self,
        group: &GroupId,
        participant: &ParticipantId,
    ) -> RegistryResult<Participant> {
        let groups = self.groups.read();
        let g = groups.get(group).ok_or_else(|| RegistryError::UnknownGroup {
            group: group.clone(),
        })?;
        g.get(participant)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownParticipant {
                group: group.clone(),
                participant: participant.clone(),
            })
    }

    /// Active participants in registration order.
    pub fn list_active(&self, group: &GroupId) -> RegistryResult<Vec<Participant>> {
        self.with_group(group, Group::active_members)
    }

    /// Cached total active weight for quorum math.
    pub fn total_weight(&self, group: &GroupId) -> RegistryResult<Weight> {
        self.with_group(group, Group::total_active_weight)
    }

    pub fn params(&self, group: &GroupId) -> RegistryResult<GroupParams> {
        self.with_group(group, |g| g.params.clone())
    }

    /// Whether the participant is registered and active in the group.
    pub fn is_active(&self, group: &GroupId, participant: &ParticipantId) -> RegistryResult<bool> {
        self.with_group(group, |g| g.is_active(participant))
    }

    pub fn group_exists(&self, group: &GroupId) -> bool {
        self.groups.read().contains_key(group)
    }

    /// Clear every group atomically (test teardown).
    pub fn reset(&self) {
        self.groups.write().clear();
    }

    fn with_group<T>(&self, group: &GroupId, f: impl FnOnce(&Group) -> T) -> RegistryResult<T> {
        let groups = self.groups.read();
        groups
            .get(group)
            .map(f)
            .ok_or_else(|| RegistryError::UnknownGroup {
                group: group.clone(),
            })
    }
}
