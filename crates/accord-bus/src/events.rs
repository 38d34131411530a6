//! Agreement lifecycle events.
//!
//! Each event carries the plain unit record and a correlation ID so a
//! collaborator can tie a decisive transition back to the request that
//! caused it. Duplicate submissions and audit-only ballots never produce
//! events; only state transitions do.

use accord_types::{AgreementUnit, ParticipantId, Weight};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// All events published by the agreement engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AgreementEvent {
    // =========================================================================
    // CONSENSUS PROTOCOL
    // =========================================================================
    /// A block was created and a proposer elected. Informational.
    UnitProposed {
        correlation_id: Uuid,
        unit: AgreementUnit,
        proposer: ParticipantId,
    },

    /// A block reached the yes-weight quorum.
    UnitFinalized {
        correlation_id: Uuid,
        unit: AgreementUnit,
        yes_weight: Weight,
        total_weight: Weight,
    },

    /// A block can no longer reach quorum.
    UnitRejected {
        correlation_id: Uuid,
        unit: AgreementUnit,
        no_weight: Weight,
        total_weight: Weight,
    },

    // =========================================================================
    // COMMIT PROTOCOL
    // =========================================================================
    /// A transaction committed: every cohort member prepared in time.
    UnitCommitted {
        correlation_id: Uuid,
        unit: AgreementUnit,
    },

    /// A transaction aborted: a no vote, a timeout, or cancellation.
    UnitAborted {
        correlation_id: Uuid,
        unit: AgreementUnit,
        reason: String,
    },

    // =========================================================================
    // THRESHOLD AUTHORIZATION PROTOCOL
    // =========================================================================
    /// A wallet transaction reached its signature threshold.
    UnitExecuted {
        correlation_id: Uuid,
        unit: AgreementUnit,
        signatures: usize,
    },
}

impl AgreementEvent {
    /// Topic for subscription filtering.
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::UnitProposed { .. }
            | Self::UnitFinalized { .. }
            | Self::UnitRejected { .. } => EventTopic::Consensus,
            Self::UnitCommitted { .. } | Self::UnitAborted { .. } => EventTopic::Commit,
            Self::UnitExecuted { .. } => EventTopic::Multisig,
        }
    }

    /// The unit record the event carries.
    pub fn unit(&self) -> &AgreementUnit {
        match self {
            Self::UnitProposed { unit, .. }
            | Self::UnitFinalized { unit, .. }
            | Self::UnitRejected { unit, .. }
            | Self::UnitCommitted { unit, .. }
            | Self::UnitAborted { unit, .. }
            | Self::UnitExecuted { unit, .. } => unit,
        }
    }
}

/// Event categories for coarse-grained subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    Consensus,
    Commit,
    Multisig,
    /// Matches everything.
    All,
}

/// A subscription filter over event topics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFilter {
    pub topics: Vec<EventTopic>,
}

impl EventFilter {
    /// Match every event.
    pub fn all() -> Self {
        Self {
            topics: vec![EventTopic::All],
        }
    }

    /// Match only the given topics.
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self { topics }
    }

    /// Whether an event passes this filter.
    pub fn matches(&self, event: &AgreementEvent) -> bool {
        self.topics.contains(&EventTopic::All) || self.topics.contains(&event.topic())
    }
}
