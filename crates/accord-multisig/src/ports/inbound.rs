//! Driving port (API) for the multisig protocol.

use crate::domain::SignOutcome;
use crate::error::MultisigResult;
use accord_types::{AgreementUnit, Ballot, GroupId, ParticipantId, UnitId};
use async_trait::async_trait;

/// The multisig operations exposed to the engine facade.
#[async_trait]
pub trait MultisigApi: Send + Sync {
    /// Create a wallet transaction in `Pending`.
    async fn create_wallet_transaction(
        &self,
        group: &GroupId,
        to: String,
        value: u64,
        payload: Vec<u8>,
    ) -> MultisigResult<AgreementUnit>;

    /// Record an owner's signature.
    ///
    /// The signature blob is stored opaque. Duplicates from the same
    /// owner count once; the signature that meets the threshold executes
    /// the transaction exactly once.
    async fn sign(
        &self,
        unit: &UnitId,
        participant: &ParticipantId,
        signature: Vec<u8>,
    ) -> MultisigResult<SignOutcome>;

    /// Fetch a wallet transaction and its recorded signatures.
    async fn get_wallet_transaction(
        &self,
        unit: &UnitId,
    ) -> MultisigResult<(AgreementUnit, Vec<Ballot>)>;
}
