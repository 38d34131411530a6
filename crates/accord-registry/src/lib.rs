//! # Participant Registry
//!
//! Tracks groups (consensus networks, commit cohorts, multi-signature
//! wallets) and their participants with trust weights. Membership order is
//! registration order, which downstream protocols use as the tie-break
//! order for proposer election.
//!
//! The registry has no protocol knowledge beyond one creation-time check:
//! a wallet's signature threshold may not exceed its initial membership.

pub mod error;
mod group;
mod registry;

pub use error::{RegistryError, RegistryResult};
pub use group::Group;
pub use registry::ParticipantRegistry;
