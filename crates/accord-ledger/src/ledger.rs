//! Ledger implementation.

use crate::error::{LedgerError, LedgerResult};
use accord_types::{
    now_millis, AgreementUnit, Ballot, GroupId, ParticipantId, UnitId, UnitKind, UnitState,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Result of recording a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallotOutcome {
    /// First ballot from this participant on this unit.
    Recorded,
    /// The participant already has a ballot on this unit; nothing changed.
    Duplicate,
}

#[derive(Debug, Default)]
struct LedgerState {
    units: HashMap<UnitId, AgreementUnit>,
    /// Next sequence number per group.
    sequences: HashMap<GroupId, u64>,
    /// Insertion-ordered ballots per unit.
    ballots: HashMap<UnitId, Vec<Ballot>>,
    /// Participants with a ballot per unit, for O(1) duplicate checks.
    voters: HashMap<UnitId, HashSet<ParticipantId>>,
}

/// In-memory agreement ledger.
///
/// One write lock serializes creation, ballots, and transitions; reads
/// return cloned snapshots. Construct one per engine.
#[derive(Debug, Default)]
pub struct AgreementLedger {
    state: RwLock<LedgerState>,
}

impl AgreementLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a unit, assigning the group's next sequence number.
    pub fn create(
        &self,
        group: GroupId,
        kind: UnitKind,
        initial_state: UnitState,
    ) -> AgreementUnit {
        let mut state = self.state.write();
        let seq = state.sequences.entry(group.clone()).or_insert(0);
        let id = UnitId::new(group, *seq);
        *seq += 1;

        let unit = AgreementUnit {
            id: id.clone(),
            kind,
            state: initial_state,
            created_at: now_millis(),
        };
        debug!(unit = %id, state = %initial_state, "Unit created");
        state.units.insert(id, unit.clone());
        unit
    }

    pub fn get(&self, unit: &UnitId) -> LedgerResult<AgreementUnit> {
        self.state
            .read()
            .units
            .get(unit)
            .cloned()
            .ok_or_else(|| LedgerError::UnitNotFound { unit: unit.clone() })
    }

    /// Number of units created in a group so far (the next sequence).
    pub fn unit_count(&self, group: &GroupId) -> u64 {
        self.state.read().sequences.get(group).copied().unwrap_or(0)
    }

    /// Atomic compare-and-swap on the unit's lifecycle state.
    ///
    /// Succeeds only while the unit is still in `from`; of concurrent
    /// callers racing toward the same transition, exactly one gets the
    /// updated record back and the rest get `InvalidTransition`.
    pub fn transition(
        &self,
        unit: &UnitId,
        from: UnitState,
        to: UnitState,
    ) -> LedgerResult<AgreementUnit> {
        let mut state = self.state.write();
        let record = state
            .units
            .get_mut(unit)
            .ok_or_else(|| LedgerError::UnitNotFound { unit: unit.clone() })?;

        if record.state != from {
            return Err(LedgerError::InvalidTransition {
                unit: unit.clone(),
                expected: from,
                actual: record.state,
            });
        }

        record.state = to;
        info!(unit = %unit, from = %from, to = %to, "Unit transitioned");
        Ok(record.clone())
    }

    /// Record a ballot, absorbing duplicates.
    ///
    /// A second ballot from the same participant on the same unit is a
    /// no-op reported as [`BallotOutcome::Duplicate`]; at-least-once
    /// delivery from collaborators must never double-count.
    pub fn record_ballot(&self, ballot: Ballot) -> LedgerResult<BallotOutcome> {
        let mut state = self.state.write();
        if !state.units.contains_key(&ballot.unit) {
            return Err(LedgerError::UnitNotFound {
                unit: ballot.unit.clone(),
            });
        }

        let voters = state.voters.entry(ballot.unit.clone()).or_default();
        if !voters.insert(ballot.participant.clone()) {
            debug!(unit = %ballot.unit, participant = %ballot.participant, "Duplicate ballot absorbed");
            return Ok(BallotOutcome::Duplicate);
        }

        state.ballots.entry(ballot.unit.clone()).or_default().push(ballot);
        Ok(BallotOutcome::Recorded)
    }

    /// Ballots for a unit in the order they were first recorded.
    pub fn ballots(&self, unit: &UnitId) -> Vec<Ballot> {
        self.state
            .read()
            .ballots
            .get(unit)
            .cloned()
            .unwrap_or_default()
    }

    /// Whether a participant already has a ballot on a unit.
    pub fn has_ballot(&self, unit: &UnitId, participant: &ParticipantId) -> bool {
        self.state
            .read()
            .voters
            .get(unit)
            .is_some_and(|v| v.contains(participant))
    }

    /// Clear all units, sequences, and ballots atomically (test teardown).
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.units.clear();
        state.sequences.clear();
        state.ballots.clear();
        state.voters.clear();
    }
}
