//! Error types for the participant registry.

use accord_types::{GroupId, ParticipantId};
use thiserror::Error;

/// Registry errors. All are scoped to a single operation; none are fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The group was never created.
    #[error("Unknown group: {group}")]
    UnknownGroup { group: GroupId },

    /// A group with this ID already exists.
    #[error("Group already exists: {group}")]
    GroupExists { group: GroupId },

    /// The participant is not registered in the group.
    #[error("Unknown participant {participant} in group {group}")]
    UnknownParticipant {
        group: GroupId,
        participant: ParticipantId,
    },

    /// Wallet threshold exceeds the membership it is created with.
    #[error("Threshold {threshold} exceeds membership of {members}")]
    ThresholdExceedsMembership { threshold: usize, members: usize },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
