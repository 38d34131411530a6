//! The engine facade.

use crate::adapters::RegistryMembership;
use crate::error::EngineResult;
use accord_bus::{AgreementEvent, EventFilter, EventPublisher, EventStream, InMemoryEventBus, Subscription};
use accord_commit::{
    CommitApi, CommitService, Decision, DecisionLog, NullDecisionLog, PrepareOutcome, PrepareVote,
    Settlement,
};
use accord_consensus::{
    ConsensusApi, ConsensusService, EntropySource, ThreadRngEntropy, Vote, VoteOutcome,
};
use accord_ledger::AgreementLedger;
use accord_multisig::{MultisigApi, MultisigService, SignOutcome};
use accord_registry::ParticipantRegistry;
use accord_types::{
    AgreementUnit, Ballot, GroupId, GroupParams, Participant, ParticipantId, UnitId, UnitKind,
    Weight,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// One self-contained agreement engine.
pub struct AgreementEngine {
    registry: Arc<ParticipantRegistry>,
    ledger: Arc<AgreementLedger>,
    bus: Arc<InMemoryEventBus>,
    consensus: ConsensusService<RegistryMembership>,
    commit: CommitService<RegistryMembership>,
    multisig: MultisigService<RegistryMembership>,
}

impl AgreementEngine {
    /// An engine with thread-RNG proposer election and no durable
    /// decision log.
    pub fn new() -> Self {
        Self::with_entropy(Box::new(ThreadRngEntropy))
    }

    /// An engine with injected election entropy, for deterministic tests.
    pub fn with_entropy(entropy: Box<dyn EntropySource>) -> Self {
        Self::with_parts(entropy, Arc::new(NullDecisionLog))
    }

    /// Full wiring control: election entropy plus the commit decision log.
    pub fn with_parts(entropy: Box<dyn EntropySource>, decision_log: Arc<dyn DecisionLog>) -> Self {
        let registry = Arc::new(ParticipantRegistry::new());
        let ledger = Arc::new(AgreementLedger::new());
        let membership = Arc::new(RegistryMembership::new(Arc::clone(&registry)));

        Self {
            consensus: ConsensusService::new(
                Arc::clone(&membership),
                Arc::clone(&ledger),
                entropy,
            ),
            commit: CommitService::new(
                Arc::clone(&membership),
                Arc::clone(&ledger),
                decision_log,
            ),
            multisig: MultisigService::new(membership, Arc::clone(&ledger)),
            bus: Arc::new(InMemoryEventBus::new()),
            registry,
            ledger,
        }
    }

    // =========================================================================
    // GROUPS AND PARTICIPANTS
    // =========================================================================

    pub fn create_group(&self, group: GroupId, params: GroupParams) -> EngineResult<()> {
        Ok(self.registry.create_group(group, params)?)
    }

    /// Create a group and register its initial members atomically. The
    /// only way to create a wallet with a nonzero threshold.
    pub fn create_group_with_members(
        &self,
        group: GroupId,
        params: GroupParams,
        members: &[(ParticipantId, Weight)],
    ) -> EngineResult<()> {
        Ok(self
            .registry
            .create_group_with_members(group, params, members)?)
    }

    pub fn register_participant(
        &self,
        group: &GroupId,
        participant: ParticipantId,
        weight: Weight,
    ) -> EngineResult<Participant> {
        Ok(self.registry.register(group, participant, weight)?)
    }

    pub fn deregister_participant(
        &self,
        group: &GroupId,
        participant: &ParticipantId,
    ) -> EngineResult<()> {
        Ok(self.registry.deregister(group, participant)?)
    }

    pub fn get_participant(
        &self,
        group: &GroupId,
        participant: &ParticipantId,
    ) -> EngineResult<Participant> {
        Ok(self.registry.get(group, participant)?)
    }

    pub fn list_participants(&self, group: &GroupId) -> EngineResult<Vec<Participant>> {
        Ok(self.registry.list_active(group)?)
    }

    pub fn total_weight(&self, group: &GroupId) -> EngineResult<Weight> {
        Ok(self.registry.total_weight(group)?)
    }

    pub fn group_params(&self, group: &GroupId) -> EngineResult<GroupParams> {
        Ok(self.registry.params(group)?)
    }

    // =========================================================================
    // CONSENSUS PROTOCOL
    // =========================================================================

    pub async fn propose_block(
        &self,
        group: &GroupId,
        payload: Vec<u8>,
    ) -> EngineResult<AgreementUnit> {
        let unit = self.consensus.propose_block(group, payload).await?;
        if let UnitKind::Block { proposer, .. } = &unit.kind {
            self.bus
                .publish(AgreementEvent::UnitProposed {
                    correlation_id: Uuid::new_v4(),
                    unit: unit.clone(),
                    proposer: proposer.clone(),
                })
                .await;
        }
        Ok(unit)
    }

    pub async fn cast_vote(
        &self,
        unit: &UnitId,
        participant: &ParticipantId,
        vote: Vote,
    ) -> EngineResult<VoteOutcome> {
        let outcome = self.consensus.cast_vote(unit, participant, vote).await?;
        match &outcome {
            VoteOutcome::Finalized { tally } => {
                let record = self.ledger.get(unit)?;
                self.bus
                    .publish(AgreementEvent::UnitFinalized {
                        correlation_id: Uuid::new_v4(),
                        unit: record,
                        yes_weight: tally.yes,
                        total_weight: tally.total,
                    })
                    .await;
            }
            VoteOutcome::Rejected { tally } => {
                let record = self.ledger.get(unit)?;
                self.bus
                    .publish(AgreementEvent::UnitRejected {
                        correlation_id: Uuid::new_v4(),
                        unit: record,
                        no_weight: tally.no,
                        total_weight: tally.total,
                    })
                    .await;
            }
            _ => debug!(unit = %unit, "Vote outcome without event"),
        }
        Ok(outcome)
    }

    pub async fn get_block(&self, unit: &UnitId) -> EngineResult<(AgreementUnit, Vec<Ballot>)> {
        Ok(self.consensus.get_block(unit).await?)
    }

    // =========================================================================
    // COMMIT PROTOCOL
    // =========================================================================

    pub async fn begin_transaction(
        &self,
        group: &GroupId,
        to: String,
        value: u64,
        payload: Vec<u8>,
        cohort: Vec<ParticipantId>,
    ) -> EngineResult<AgreementUnit> {
        Ok(self
            .commit
            .begin_transaction(group, to, value, payload, cohort)
            .await?)
    }

    pub async fn submit_prepare_vote(
        &self,
        unit: &UnitId,
        participant: &ParticipantId,
        vote: PrepareVote,
    ) -> EngineResult<PrepareOutcome> {
        let outcome = self.commit.submit_prepare_vote(unit, participant, vote).await?;
        if let PrepareOutcome::Settled { decision } = &outcome {
            self.publish_commit_decision(unit, decision).await?;
        }
        Ok(outcome)
    }

    /// Drive the prepare phase to its decision, bounded by the group's
    /// timeout.
    pub async fn run_prepare(&self, unit: &UnitId) -> EngineResult<Decision> {
        let Settlement {
            decision,
            settled_now,
        } = self.commit.run_prepare(unit).await?;
        if settled_now {
            self.publish_commit_decision(unit, &decision).await?;
        }
        Ok(decision)
    }

    pub async fn cancel_transaction(&self, unit: &UnitId) -> EngineResult<Decision> {
        let Settlement {
            decision,
            settled_now,
        } = self.commit.cancel_transaction(unit).await?;
        if settled_now {
            self.publish_commit_decision(unit, &decision).await?;
        }
        Ok(decision)
    }

    pub async fn get_transaction(
        &self,
        unit: &UnitId,
    ) -> EngineResult<(AgreementUnit, Vec<Ballot>)> {
        Ok(self.commit.get_transaction(unit).await?)
    }

    async fn publish_commit_decision(&self, unit: &UnitId, decision: &Decision) -> EngineResult<()> {
        let record = self.ledger.get(unit)?;
        let event = match decision {
            Decision::Commit => AgreementEvent::UnitCommitted {
                correlation_id: Uuid::new_v4(),
                unit: record,
            },
            Decision::Abort { reason } => AgreementEvent::UnitAborted {
                correlation_id: Uuid::new_v4(),
                unit: record,
                reason: reason.to_string(),
            },
        };
        self.bus.publish(event).await;
        Ok(())
    }

    // =========================================================================
    // MULTISIG PROTOCOL
    // =========================================================================

    pub async fn create_wallet_transaction(
        &self,
        group: &GroupId,
        to: String,
        value: u64,
        payload: Vec<u8>,
    ) -> EngineResult<AgreementUnit> {
        Ok(self
            .multisig
            .create_wallet_transaction(group, to, value, payload)
            .await?)
    }

    pub async fn sign(
        &self,
        unit: &UnitId,
        participant: &ParticipantId,
        signature: Vec<u8>,
    ) -> EngineResult<SignOutcome> {
        let outcome = self.multisig.sign(unit, participant, signature).await?;
        if let SignOutcome::Executed { progress } = &outcome {
            let record = self.ledger.get(unit)?;
            self.bus
                .publish(AgreementEvent::UnitExecuted {
                    correlation_id: Uuid::new_v4(),
                    unit: record,
                    signatures: progress.signatures,
                })
                .await;
        }
        Ok(outcome)
    }

    pub async fn get_wallet_transaction(
        &self,
        unit: &UnitId,
    ) -> EngineResult<(AgreementUnit, Vec<Ballot>)> {
        Ok(self.multisig.get_wallet_transaction(unit).await?)
    }

    // =========================================================================
    // EVENTS AND LIFECYCLE
    // =========================================================================

    /// Subscribe to lifecycle events matching a filter.
    pub fn events(&self, filter: EventFilter) -> Subscription {
        self.bus.subscribe(filter)
    }

    /// Subscribe as a `Stream`, for combinator-style consumers.
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        self.bus.event_stream(filter)
    }

    /// Total lifecycle events published so far.
    pub fn events_published(&self) -> u64 {
        self.bus.events_published()
    }

    /// Clear every group, unit, ballot, and live prepare round.
    /// Subscriptions survive; sequence numbers restart at zero.
    pub fn reset(&self) {
        self.registry.reset();
        self.ledger.reset();
        self.commit.reset();
    }
}

impl Default for AgreementEngine {
    fn default() -> Self {
        Self::new()
    }
}
