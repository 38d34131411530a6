//! Group entity: ordered membership with a cached active-weight total.

use accord_types::{
    now_millis, GroupId, GroupParams, Participant, ParticipantId, ParticipantStatus, Weight,
};
use std::collections::HashMap;

/// A group of participants sharing one protocol parameterization.
///
/// Members are kept in registration order; the index map gives O(1)
/// lookup by ID. The active-weight total is maintained incrementally so
/// quorum math never rescans membership.
#[derive(Clone, Debug)]
pub struct Group {
    pub id: GroupId,
    pub params: GroupParams,
    members: Vec<Participant>,
    lookup: HashMap<ParticipantId, usize>,
    total_active_weight: Weight,
}

impl Group {
    pub fn new(id: GroupId, params: GroupParams) -> Self {
        Self {
            id,
            params,
            members: Vec::new(),
            lookup: HashMap::new(),
            total_active_weight: 0,
        }
    }

    /// Register or re-register a participant.
    ///
    /// Idempotent by ID: re-registering updates the weight in place and
    /// keeps the original registration slot and timestamp, so tie-break
    /// order is stable across weight updates.
    pub fn upsert(&mut self, participant: ParticipantId, weight: Weight) -> Participant {
        if let Some(&idx) = self.lookup.get(&participant) {
            let member = &mut self.members[idx];
            if member.status == ParticipantStatus::Active {
                self.total_active_weight = self
                    .total_active_weight
                    .saturating_sub(member.weight)
                    .saturating_add(weight);
            }
            member.weight = weight;
            return member.clone();
        }

        let member = Participant {
            id: participant.clone(),
            group: self.id.clone(),
            weight,
            status: ParticipantStatus::Active,
            registered_at: now_millis(),
        };
        self.lookup.insert(participant, self.members.len());
        self.total_active_weight = self.total_active_weight.saturating_add(weight);
        self.members.push(member.clone());
        member
    }

    /// Remove a participant entirely.
    ///
    /// Returns the removed record, or `None` if the ID was never
    /// registered. Later members keep their relative order.
    pub fn remove(&mut self, participant: &ParticipantId) -> Option<Participant> {
        let idx = self.lookup.remove(participant)?;
        let member = self.members.remove(idx);
        if member.status == ParticipantStatus::Active {
            self.total_active_weight = self.total_active_weight.saturating_sub(member.weight);
        }
        // Reindex the tail.
        for (i, m) in self.members.iter().enumerate().skip(idx) {
            self.lookup.insert(m.id.clone(), i);
        }
        Some(member)
    }

    pub fn get(&self, participant: &ParticipantId) -> Option<&Participant> {
        self.lookup.get(participant).map(|&idx| &self.members[idx])
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.lookup.contains_key(participant)
    }

    /// Whether the participant is registered and active.
    pub fn is_active(&self, participant: &ParticipantId) -> bool {
        self.get(participant).is_some_and(Participant::is_active)
    }

    /// Active members in registration order.
    pub fn active_members(&self) -> Vec<Participant> {
        self.members
            .iter()
            .filter(|m| m.is_active())
            .cloned()
            .collect()
    }

    /// All member IDs in registration order, active or not.
    pub fn member_ids(&self) -> Vec<ParticipantId> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Cached sum of active members' weights.
    pub fn total_active_weight(&self) -> Weight {
        self.total_active_weight
    }
}
