//! Driven ports (outbound dependencies) for the commit protocol.

use crate::domain::Decision;
use crate::error::CommitResult;
use accord_types::{GroupId, ParticipantId, UnitId};
use async_trait::async_trait;

/// Membership and timeout queries answered by the participant registry.
#[async_trait]
pub trait CohortMembership: Send + Sync {
    /// Whether the participant is registered in the group (active or not;
    /// an inactive member can still hold up a transaction it is named in).
    async fn is_registered(
        &self,
        group: &GroupId,
        participant: &ParticipantId,
    ) -> CommitResult<bool>;

    /// The group's configured prepare timeout in milliseconds.
    async fn timeout_ms(&self, group: &GroupId) -> CommitResult<u64>;
}

/// One entry in the coordinator's decision log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEntry {
    /// A prepare round opened for this cohort.
    RoundOpened {
        unit: UnitId,
        cohort: Vec<ParticipantId>,
    },
    /// A prepare vote was recorded.
    VoteRecorded {
        unit: UnitId,
        participant: ParticipantId,
        prepared: bool,
    },
    /// The binding decision was reached.
    DecisionReached { unit: UnitId, decision: Decision },
}

/// Write-ahead record of prepare votes and decisions.
///
/// The in-memory coordinator keeps every fact this log carries in the
/// ledger as well; the port exists so a durable deployment can persist
/// the round and re-derive the decision after a restart.
#[async_trait]
pub trait DecisionLog: Send + Sync {
    async fn append(&self, entry: LogEntry);
}

/// Discards every entry. The default log for in-memory engines.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDecisionLog;

#[async_trait]
impl DecisionLog for NullDecisionLog {
    async fn append(&self, _entry: LogEntry) {}
}
