//! Prepare-round bookkeeping and the unanimity decision rule.

use accord_types::{Ballot, BallotKind, BallotValue, ParticipantId, UnitState};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A participant's answer in the prepare phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrepareVote {
    /// Ready to commit.
    Yes,
    /// Unable to commit.
    No,
}

/// Result of recording a prepare vote into a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// The participant already answered; first answer stands.
    Duplicate,
}

/// Outcome surfaced for a submitted prepare vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrepareOutcome {
    Recorded,
    /// This vote completed or broke the round and settled the transaction.
    Settled { decision: Decision },
    Duplicate,
    /// The transaction already settled; the submission is an
    /// acknowledgment, not a vote.
    AlreadyDecided { state: UnitState },
}

/// The coordinator's binding decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Commit,
    Abort { reason: AbortReason },
}

/// Why a transaction aborted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// A cohort member voted no.
    Declined { participant: ParticipantId },
    /// These cohort members did not answer before the deadline.
    Timeout { missing: Vec<ParticipantId> },
    /// The caller cancelled the transaction.
    Cancelled,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declined { participant } => write!(f, "declined by {participant}"),
            Self::Timeout { missing } => {
                let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
                write!(f, "prepare timeout, no answer from {}", names.join(", "))
            }
            Self::Cancelled => f.write_str("cancelled by caller"),
        }
    }
}

/// The decision in force after a settling call, and whether this call
/// performed the settling transition. At most one call per transaction
/// observes `settled_now`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub decision: Decision,
    pub settled_now: bool,
}

/// State of one transaction's prepare phase.
///
/// Pure bookkeeping: the decision rule reads only the cohort, the
/// recorded votes, and the flags, which is what lets a recovered
/// coordinator rebuild a round from logged ballots and re-derive the
/// same decision.
#[derive(Clone, Debug)]
pub struct PrepareRound {
    cohort: Vec<ParticipantId>,
    votes: HashMap<ParticipantId, PrepareVote>,
    acks: HashSet<ParticipantId>,
    cancelled: bool,
}

impl PrepareRound {
    pub fn new(cohort: Vec<ParticipantId>) -> Self {
        Self {
            cohort,
            votes: HashMap::new(),
            acks: HashSet::new(),
            cancelled: false,
        }
    }

    /// Rebuild a round from prepare ballots recorded in the ledger (or a
    /// durable decision log). Non-prepare ballots are ignored.
    pub fn from_ballots(cohort: Vec<ParticipantId>, ballots: &[Ballot]) -> Self {
        let mut round = Self::new(cohort);
        for ballot in ballots {
            if ballot.kind != BallotKind::PrepareAck {
                continue;
            }
            let vote = match ballot.value {
                BallotValue::Yes => PrepareVote::Yes,
                BallotValue::No => PrepareVote::No,
                BallotValue::Signature(_) => continue,
            };
            let _ = round.record(&ballot.participant, vote);
        }
        round
    }

    pub fn cohort(&self) -> &[ParticipantId] {
        &self.cohort
    }

    pub fn in_cohort(&self, participant: &ParticipantId) -> bool {
        self.cohort.contains(participant)
    }

    /// Record a vote. First answer per participant stands.
    pub fn record(&mut self, participant: &ParticipantId, vote: PrepareVote) -> RecordOutcome {
        if self.votes.contains_key(participant) {
            return RecordOutcome::Duplicate;
        }
        self.votes.insert(participant.clone(), vote);
        RecordOutcome::Recorded
    }

    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    /// Idempotent decision acknowledgment; returns false on repeats.
    pub fn acknowledge(&mut self, participant: &ParticipantId) -> bool {
        self.acks.insert(participant.clone())
    }

    /// Cohort members with no recorded vote, in cohort order.
    pub fn missing(&self) -> Vec<ParticipantId> {
        self.cohort
            .iter()
            .filter(|p| !self.votes.contains_key(*p))
            .cloned()
            .collect()
    }

    /// The unanimity rule.
    ///
    /// Cancellation and any no vote decide immediately; unanimous yes
    /// commits; otherwise the round stays open until the deadline, at
    /// which point missing votes count as no.
    pub fn derive_decision(&self, deadline_passed: bool) -> Option<Decision> {
        if self.cancelled {
            return Some(Decision::Abort {
                reason: AbortReason::Cancelled,
            });
        }
        if let Some((participant, _)) = self
            .cohort
            .iter()
            .filter_map(|p| self.votes.get(p).map(|v| (p, *v)))
            .find(|(_, v)| *v == PrepareVote::No)
        {
            return Some(Decision::Abort {
                reason: AbortReason::Declined {
                    participant: participant.clone(),
                },
            });
        }
        let missing = self.missing();
        if missing.is_empty() {
            return Some(Decision::Commit);
        }
        if deadline_passed {
            return Some(Decision::Abort {
                reason: AbortReason::Timeout { missing },
            });
        }
        None
    }
}
