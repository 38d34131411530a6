//! # Multisig Protocol
//!
//! M-of-N threshold authorization for wallet transactions:
//!
//! - A wallet group fixes a signature threshold at creation, and the
//!   threshold never exceeds the owner count.
//! - A wallet transaction starts `Pending` and collects signatures from
//!   distinct owners; duplicates from the same owner count once.
//! - The M-th signature executes the transaction through the ledger's
//!   compare-and-swap, so two racing decisive signatures execute it
//!   exactly once. Signatures arriving after execution are kept for
//!   audit and change nothing.
//!
//! Thresholds here count heads, not stake, and signature blobs are
//! stored opaque; whether they verify against a key is a concern for the
//! caller supplying them.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{SignOutcome, SignatureProgress};
pub use error::{MultisigError, MultisigResult};
pub use ports::{MultisigApi, WalletMembership};
pub use service::MultisigService;
