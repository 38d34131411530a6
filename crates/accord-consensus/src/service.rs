//! Consensus service - core protocol logic.

use crate::domain::{elect_proposer, EntropySource, TallyOutcome, Vote, VoteOutcome, WeightTally};
use crate::error::{ConsensusError, ConsensusResult};
use crate::ports::{ConsensusApi, MembershipProvider};
use accord_ledger::{AgreementLedger, BallotOutcome, LedgerError};
use accord_types::{
    now_millis, AgreementUnit, Ballot, BallotKind, BallotValue, GroupId, ParticipantId, UnitId,
    UnitKind, UnitState, Weight,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Consensus protocol service.
///
/// Generic over the membership port; the ledger is the concrete
/// serialization point shared by all protocols.
pub struct ConsensusService<M: MembershipProvider> {
    membership: Arc<M>,
    ledger: Arc<AgreementLedger>,
    entropy: Mutex<Box<dyn EntropySource>>,
}

impl<M: MembershipProvider> ConsensusService<M> {
    pub fn new(
        membership: Arc<M>,
        ledger: Arc<AgreementLedger>,
        entropy: Box<dyn EntropySource>,
    ) -> Self {
        Self {
            membership,
            ledger,
            entropy: Mutex::new(entropy),
        }
    }

    /// Recompute the weight tally for a block from its recorded votes.
    ///
    /// Weights are read from current membership at evaluation time;
    /// ballots from since-deregistered participants simply stop counting.
    async fn tally(&self, unit: &UnitId) -> ConsensusResult<WeightTally> {
        let group = &unit.group;
        let total = self.membership.total_weight(group).await?;
        let weights: HashMap<ParticipantId, Weight> = self
            .membership
            .active_participants(group)
            .await?
            .into_iter()
            .map(|p| (p.id, p.weight))
            .collect();

        let mut tally = WeightTally::new(total);
        for ballot in self.ledger.ballots(unit) {
            if ballot.kind != BallotKind::Vote {
                continue;
            }
            let Some(&weight) = weights.get(&ballot.participant) else {
                continue;
            };
            match ballot.value {
                BallotValue::Yes => tally.add(Vote::Yes, weight),
                BallotValue::No => tally.add(Vote::No, weight),
                BallotValue::Signature(_) => {}
            }
        }
        Ok(tally)
    }

    /// Apply a decisive tally through the ledger's compare-and-swap.
    ///
    /// Exactly one racing voter wins the swap; losers re-read and report
    /// the already-decided state.
    fn decide(
        &self,
        unit: &UnitId,
        to: UnitState,
        tally: WeightTally,
    ) -> ConsensusResult<VoteOutcome> {
        match self.ledger.transition(unit, UnitState::Proposed, to) {
            Ok(updated) => {
                info!(
                    unit = %unit,
                    state = %updated.state,
                    yes_weight = tally.yes,
                    no_weight = tally.no,
                    total_weight = tally.total,
                    "Block decided"
                );
                Ok(match to {
                    UnitState::Finalized => VoteOutcome::Finalized { tally },
                    _ => VoteOutcome::Rejected { tally },
                })
            }
            Err(LedgerError::InvalidTransition { actual, .. }) => {
                // Lost the race; another decisive vote got there first.
                Ok(VoteOutcome::AlreadyDecided { state: actual })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl<M: MembershipProvider> ConsensusApi for ConsensusService<M> {
    async fn propose_block(
        &self,
        group: &GroupId,
        payload: Vec<u8>,
    ) -> ConsensusResult<AgreementUnit> {
        let algorithm = self.membership.algorithm(group).await?;
        let active = self.membership.active_participants(group).await?;
        let block_number = self.ledger.unit_count(group);

        let proposer = {
            let mut entropy = self.entropy.lock();
            elect_proposer(&active, algorithm, block_number, entropy.as_mut())
        }
        .ok_or_else(|| ConsensusError::NoActiveParticipants {
            group: group.clone(),
        })?;

        let unit = self.ledger.create(
            group.clone(),
            UnitKind::Block {
                number: block_number,
                payload,
                proposer: proposer.clone(),
            },
            UnitState::Proposed,
        );
        info!(unit = %unit.id, proposer = %proposer, ?algorithm, "Block proposed");
        Ok(unit)
    }

    async fn cast_vote(
        &self,
        unit: &UnitId,
        participant: &ParticipantId,
        vote: Vote,
    ) -> ConsensusResult<VoteOutcome> {
        let record = self.ledger.get(unit)?;
        if !matches!(record.kind, UnitKind::Block { .. }) {
            return Err(ConsensusError::NotABlock { unit: unit.clone() });
        }

        let group = &unit.group;
        if !self.membership.is_active(group, participant).await? {
            return Err(ConsensusError::UnauthorizedVoter {
                unit: unit.clone(),
                participant: participant.clone(),
            });
        }

        let ballot = Ballot {
            unit: unit.clone(),
            participant: participant.clone(),
            kind: BallotKind::Vote,
            value: match vote {
                Vote::Yes => BallotValue::Yes,
                Vote::No => BallotValue::No,
            },
            cast_at: now_millis(),
        };

        if record.state.is_terminal() {
            // Audit only; the outcome is settled.
            let _ = self.ledger.record_ballot(ballot)?;
            return Ok(VoteOutcome::AlreadyDecided {
                state: record.state,
            });
        }

        if self.ledger.record_ballot(ballot)? == BallotOutcome::Duplicate {
            debug!(unit = %unit, participant = %participant, "Duplicate vote ignored");
            return Ok(VoteOutcome::Duplicate);
        }

        let tally = self.tally(unit).await?;
        match tally.outcome() {
            TallyOutcome::Finalize => self.decide(unit, UnitState::Finalized, tally),
            TallyOutcome::Reject => self.decide(unit, UnitState::Rejected, tally),
            TallyOutcome::Pending => {
                debug!(
                    unit = %unit,
                    yes_weight = tally.yes,
                    no_weight = tally.no,
                    total_weight = tally.total,
                    "Vote recorded, quorum pending"
                );
                Ok(VoteOutcome::Recorded { tally })
            }
        }
    }

    async fn get_block(&self, unit: &UnitId) -> ConsensusResult<(AgreementUnit, Vec<Ballot>)> {
        let record = self.ledger.get(unit)?;
        if !matches!(record.kind, UnitKind::Block { .. }) {
            return Err(ConsensusError::NotABlock { unit: unit.clone() });
        }
        let ballots = self.ledger.ballots(unit);
        Ok((record, ballots))
    }
}
