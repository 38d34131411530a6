//! Logical identifiers for groups, participants, and agreement units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a group (a consensus network, a commit cohort, or a
/// multi-signature wallet).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of a participant (node, 2PC participant, or wallet owner)
/// within a group.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of an agreement unit.
///
/// The sequence number is assigned by the ledger, monotonically per group
/// starting at 0, so unit IDs double as creation-order evidence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId {
    pub group: GroupId,
    pub seq: u64,
}

impl UnitId {
    pub fn new(group: GroupId, seq: u64) -> Self {
        Self { group, seq }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.group, self.seq)
    }
}

/// Trust weight of a participant: stake for consensus, vote right for the
/// commit cohort, owner flag for wallets. Zero means non-voting.
pub type Weight = u64;
