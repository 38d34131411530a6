//! Commit service - two-phase-commit coordinator.

use crate::domain::{
    AbortReason, Decision, PrepareOutcome, PrepareRound, PrepareVote, RecordOutcome, Settlement,
};
use crate::error::{CommitError, CommitResult};
use crate::ports::{CohortMembership, CommitApi, DecisionLog, LogEntry};
use accord_ledger::{AgreementLedger, BallotOutcome, LedgerError};
use accord_types::{
    now_millis, AgreementUnit, Ballot, BallotKind, BallotValue, GroupId, ParticipantId, UnitId,
    UnitKind, UnitState,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Live prepare round plus its wakeup channel.
///
/// `decided` is written exactly once, under the rounds lock and only by
/// the caller that won the ledger's compare-and-swap; everyone else reads
/// it to learn the decision in force.
struct RoundEntry {
    round: PrepareRound,
    decided: Option<Decision>,
    notify: watch::Sender<()>,
}

impl RoundEntry {
    fn new(cohort: Vec<ParticipantId>) -> Self {
        let (notify, _) = watch::channel(());
        Self {
            round: PrepareRound::new(cohort),
            decided: None,
            notify,
        }
    }
}

/// Two-phase-commit coordinator service.
///
/// Generic over the membership port; prepare rounds live in memory and
/// the shared ledger is the serialization point for settlement, so of
/// any set of racing settlers (a no vote, the deadline, a cancellation)
/// exactly one decision binds.
pub struct CommitService<M: CohortMembership> {
    membership: Arc<M>,
    ledger: Arc<AgreementLedger>,
    log: Arc<dyn DecisionLog>,
    rounds: RwLock<HashMap<UnitId, RoundEntry>>,
}

impl<M: CohortMembership> CommitService<M> {
    pub fn new(
        membership: Arc<M>,
        ledger: Arc<AgreementLedger>,
        log: Arc<dyn DecisionLog>,
    ) -> Self {
        Self {
            membership,
            ledger,
            log,
            rounds: RwLock::new(HashMap::new()),
        }
    }

    /// Drop all in-memory prepare rounds (test teardown).
    pub fn reset(&self) {
        self.rounds.write().clear();
    }

    fn transaction(&self, unit: &UnitId) -> CommitResult<AgreementUnit> {
        let record = self.ledger.get(unit)?;
        if !matches!(record.kind, UnitKind::Transaction { .. }) {
            return Err(CommitError::NotATransaction { unit: unit.clone() });
        }
        Ok(record)
    }

    /// Apply a decision through the ledger's compare-and-swap.
    ///
    /// The swap arbitrates every race: a vote-driven settle, the deadline,
    /// and a cancellation may all reach here concurrently, and whichever
    /// wins the `Active` transition publishes its decision. Losers get the
    /// winner's decision back. Returns the decision in force and whether
    /// this call won.
    fn settle(&self, unit: &UnitId, decision: Decision) -> CommitResult<(Decision, bool)> {
        let to = match decision {
            Decision::Commit => UnitState::Committed,
            Decision::Abort { .. } => UnitState::Aborted,
        };

        // The rounds lock spans the swap so `decided` is stored before any
        // loser looks for it.
        let mut rounds = self.rounds.write();
        match self.ledger.transition(unit, UnitState::Active, to) {
            Ok(updated) => {
                if let Some(entry) = rounds.get_mut(unit) {
                    entry.decided = Some(decision.clone());
                    let _ = entry.notify.send(());
                }
                info!(unit = %unit, state = %updated.state, ?decision, "Transaction settled");
                Ok((decision, true))
            }
            Err(LedgerError::InvalidTransition { actual, .. }) => {
                let earlier = rounds
                    .get(unit)
                    .and_then(|entry| entry.decided.clone())
                    .ok_or_else(|| LedgerError::InvalidTransition {
                        unit: unit.clone(),
                        expected: UnitState::Active,
                        actual,
                    })?;
                Ok((earlier, false))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Settle and write the decision to the log when this call won.
    async fn settle_logged(&self, unit: &UnitId, decision: Decision) -> CommitResult<Settlement> {
        let (in_force, won) = self.settle(unit, decision)?;
        if won {
            self.log
                .append(LogEntry::DecisionReached {
                    unit: unit.clone(),
                    decision: in_force.clone(),
                })
                .await;
        }
        Ok(Settlement {
            decision: in_force,
            settled_now: won,
        })
    }
}

#[async_trait]
impl<M: CohortMembership> CommitApi for CommitService<M> {
    async fn begin_transaction(
        &self,
        group: &GroupId,
        to: String,
        value: u64,
        payload: Vec<u8>,
        cohort: Vec<ParticipantId>,
    ) -> CommitResult<AgreementUnit> {
        // First occurrence wins; a member named twice prepares once.
        let mut deduped: Vec<ParticipantId> = Vec::with_capacity(cohort.len());
        for participant in cohort {
            if !deduped.contains(&participant) {
                deduped.push(participant);
            }
        }
        if deduped.is_empty() {
            return Err(CommitError::EmptyCohort {
                group: group.clone(),
            });
        }
        for participant in &deduped {
            if !self.membership.is_registered(group, participant).await? {
                return Err(CommitError::UnknownParticipant {
                    group: group.clone(),
                    participant: participant.clone(),
                });
            }
        }

        let unit = self.ledger.create(
            group.clone(),
            UnitKind::Transaction { to, value, payload },
            UnitState::Active,
        );
        self.rounds
            .write()
            .insert(unit.id.clone(), RoundEntry::new(deduped.clone()));
        info!(unit = %unit.id, cohort = deduped.len(), "Transaction begun");

        self.log
            .append(LogEntry::RoundOpened {
                unit: unit.id.clone(),
                cohort: deduped,
            })
            .await;
        Ok(unit)
    }

    async fn submit_prepare_vote(
        &self,
        unit: &UnitId,
        participant: &ParticipantId,
        vote: PrepareVote,
    ) -> CommitResult<PrepareOutcome> {
        let record = self.transaction(unit)?;

        let ballot = Ballot {
            unit: unit.clone(),
            participant: participant.clone(),
            kind: BallotKind::PrepareAck,
            value: match vote {
                PrepareVote::Yes => BallotValue::Yes,
                PrepareVote::No => BallotValue::No,
            },
            cast_at: now_millis(),
        };

        // Round mutations happen under the lock; the decision (if the
        // vote completes or breaks the round) settles after.
        let pending = {
            let mut rounds = self.rounds.write();
            let entry = rounds
                .get_mut(unit)
                .ok_or_else(|| CommitError::NoPrepareRound { unit: unit.clone() })?;
            if !entry.round.in_cohort(participant) {
                return Err(CommitError::NotInCohort {
                    unit: unit.clone(),
                    participant: participant.clone(),
                });
            }

            if record.state.is_terminal() || entry.decided.is_some() {
                // The decision is binding; a late vote is an acknowledgment.
                entry.round.acknowledge(participant);
                drop(rounds);
                let _ = self.ledger.record_ballot(ballot)?;
                let state = self.ledger.get(unit)?.state;
                debug!(unit = %unit, participant = %participant, "Late prepare vote acknowledged");
                return Ok(PrepareOutcome::AlreadyDecided { state });
            }

            if entry.round.record(participant, vote) == RecordOutcome::Duplicate {
                debug!(unit = %unit, participant = %participant, "Duplicate prepare vote ignored");
                return Ok(PrepareOutcome::Duplicate);
            }
            entry.round.derive_decision(false)
        };

        // The round and the ledger agree participant-for-participant; a
        // ledger duplicate here would mean a ballot recorded outside this
        // service.
        if self.ledger.record_ballot(ballot)? == BallotOutcome::Duplicate {
            warn!(unit = %unit, participant = %participant, "Prepare ballot already in ledger");
        }
        self.log
            .append(LogEntry::VoteRecorded {
                unit: unit.clone(),
                participant: participant.clone(),
                prepared: vote == PrepareVote::Yes,
            })
            .await;

        if let Some(decision) = pending {
            let settlement = self.settle_logged(unit, decision).await?;
            if settlement.settled_now {
                return Ok(PrepareOutcome::Settled {
                    decision: settlement.decision,
                });
            }
        }
        Ok(PrepareOutcome::Recorded)
    }

    async fn run_prepare(&self, unit: &UnitId) -> CommitResult<Settlement> {
        self.transaction(unit)?;
        let timeout_ms = self.membership.timeout_ms(&unit.group).await?;

        let mut changes = {
            let rounds = self.rounds.read();
            let entry = rounds
                .get(unit)
                .ok_or_else(|| CommitError::NoPrepareRound { unit: unit.clone() })?;
            if let Some(decision) = entry.decided.clone() {
                return Ok(Settlement {
                    decision,
                    settled_now: false,
                });
            }
            entry.notify.subscribe()
        };

        let wait = tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            loop {
                if changes.changed().await.is_err() {
                    // Round dropped underneath us; fall through to the
                    // deadline path for a final read.
                    return;
                }
                if self
                    .rounds
                    .read()
                    .get(unit)
                    .is_some_and(|entry| entry.decided.is_some())
                {
                    return;
                }
            }
        })
        .await;

        if wait.is_ok() {
            let decided = self
                .rounds
                .read()
                .get(unit)
                .and_then(|entry| entry.decided.clone());
            if let Some(decision) = decided {
                return Ok(Settlement {
                    decision,
                    settled_now: false,
                });
            }
            return Err(CommitError::NoPrepareRound { unit: unit.clone() });
        }

        // Deadline passed: missing votes count as no. The compare-and-swap
        // inside settle still lets a last-instant unanimous commit win.
        let decision = {
            let rounds = self.rounds.read();
            let entry = rounds
                .get(unit)
                .ok_or_else(|| CommitError::NoPrepareRound { unit: unit.clone() })?;
            match entry.round.derive_decision(true) {
                Some(decision) => decision,
                None => Decision::Abort {
                    reason: AbortReason::Timeout {
                        missing: entry.round.missing(),
                    },
                },
            }
        };
        warn!(unit = %unit, timeout_ms, "Prepare deadline passed");
        self.settle_logged(unit, decision).await
    }

    async fn cancel_transaction(&self, unit: &UnitId) -> CommitResult<Settlement> {
        self.transaction(unit)?;
        {
            let mut rounds = self.rounds.write();
            let entry = rounds
                .get_mut(unit)
                .ok_or_else(|| CommitError::NoPrepareRound { unit: unit.clone() })?;
            if let Some(decision) = entry.decided.clone() {
                return Ok(Settlement {
                    decision,
                    settled_now: false,
                });
            }
            entry.round.mark_cancelled();
        }
        self.settle_logged(
            unit,
            Decision::Abort {
                reason: AbortReason::Cancelled,
            },
        )
        .await
    }

    async fn get_transaction(
        &self,
        unit: &UnitId,
    ) -> CommitResult<(AgreementUnit, Vec<Ballot>)> {
        let record = self.transaction(unit)?;
        let ballots = self.ledger.ballots(unit);
        Ok((record, ballots))
    }
}
