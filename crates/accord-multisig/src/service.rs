//! Multisig service - threshold authorization logic.

use crate::domain::{SignOutcome, SignatureProgress};
use crate::error::{MultisigError, MultisigResult};
use crate::ports::{MultisigApi, WalletMembership};
use accord_ledger::{AgreementLedger, BallotOutcome, LedgerError};
use accord_types::{
    now_millis, AgreementUnit, Ballot, BallotKind, BallotValue, GroupId, ParticipantId, UnitId,
    UnitKind, UnitState,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Multisig protocol service.
///
/// Stateless beyond its ports: signature progress is recomputed from
/// ledger ballots against the current owner set on every signature, and
/// the ledger's compare-and-swap makes execution exactly-once.
pub struct MultisigService<M: WalletMembership> {
    membership: Arc<M>,
    ledger: Arc<AgreementLedger>,
}

impl<M: WalletMembership> MultisigService<M> {
    pub fn new(membership: Arc<M>, ledger: Arc<AgreementLedger>) -> Self {
        Self { membership, ledger }
    }

    fn wallet_transaction(&self, unit: &UnitId) -> MultisigResult<AgreementUnit> {
        let record = self.ledger.get(unit)?;
        if !matches!(record.kind, UnitKind::WalletTransaction { .. }) {
            return Err(MultisigError::NotAWalletTransaction { unit: unit.clone() });
        }
        Ok(record)
    }

    async fn progress(&self, unit: &UnitId) -> MultisigResult<SignatureProgress> {
        let group = &unit.group;
        let owners = self.membership.owners(group).await?;
        let threshold = self.membership.threshold(group).await?;
        Ok(SignatureProgress::from_ballots(
            &self.ledger.ballots(unit),
            &owners,
            threshold,
        ))
    }
}

#[async_trait]
impl<M: WalletMembership> MultisigApi for MultisigService<M> {
    async fn create_wallet_transaction(
        &self,
        group: &GroupId,
        to: String,
        value: u64,
        payload: Vec<u8>,
    ) -> MultisigResult<AgreementUnit> {
        // Surfaces UnknownGroup before a unit is minted.
        let threshold = self.membership.threshold(group).await?;

        let unit = self.ledger.create(
            group.clone(),
            UnitKind::WalletTransaction { to, value, payload },
            UnitState::Pending,
        );
        info!(unit = %unit.id, threshold, "Wallet transaction created");
        Ok(unit)
    }

    async fn sign(
        &self,
        unit: &UnitId,
        participant: &ParticipantId,
        signature: Vec<u8>,
    ) -> MultisigResult<SignOutcome> {
        let record = self.wallet_transaction(unit)?;

        let group = &unit.group;
        if !self.membership.is_owner(group, participant).await? {
            return Err(MultisigError::UnauthorizedSigner {
                unit: unit.clone(),
                participant: participant.clone(),
            });
        }

        let ballot = Ballot {
            unit: unit.clone(),
            participant: participant.clone(),
            kind: BallotKind::Signature,
            value: BallotValue::Signature(signature),
            cast_at: now_millis(),
        };

        if record.state.is_terminal() {
            // Audit only; the transaction already executed.
            let _ = self.ledger.record_ballot(ballot)?;
            return Ok(SignOutcome::AlreadyExecuted {
                state: record.state,
            });
        }

        if self.ledger.record_ballot(ballot)? == BallotOutcome::Duplicate {
            debug!(unit = %unit, participant = %participant, "Duplicate signature ignored");
            return Ok(SignOutcome::Duplicate);
        }

        let progress = self.progress(unit).await?;
        if !progress.is_met() {
            debug!(
                unit = %unit,
                signatures = progress.signatures,
                threshold = progress.threshold,
                "Signature recorded, threshold pending"
            );
            return Ok(SignOutcome::Recorded { progress });
        }

        match self
            .ledger
            .transition(unit, UnitState::Pending, UnitState::Executed)
        {
            Ok(_) => {
                info!(
                    unit = %unit,
                    signatures = progress.signatures,
                    threshold = progress.threshold,
                    "Wallet transaction executed"
                );
                Ok(SignOutcome::Executed { progress })
            }
            Err(LedgerError::InvalidTransition { actual, .. }) => {
                // Lost the race; another decisive signature got there first.
                Ok(SignOutcome::AlreadyExecuted { state: actual })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_wallet_transaction(
        &self,
        unit: &UnitId,
    ) -> MultisigResult<(AgreementUnit, Vec<Ballot>)> {
        let record = self.wallet_transaction(unit)?;
        let ballots = self.ledger.ballots(unit);
        Ok((record, ballots))
    }
}
