//! # Agreement Engine
//!
//! The facade over the whole stack: one engine owns a participant
//! registry, an agreement ledger, the three protocol services, and an
//! event bus, and exposes every operation callers need. Protocol
//! services stay pure request/response; the engine is the only place
//! that publishes lifecycle events, tagging each with a fresh
//! correlation ID.
//!
//! Engines are self-contained values. Two engines share nothing, so
//! tests construct as many as they like; there is no ambient global
//! instance anywhere in the stack.

pub mod adapters;
pub mod engine;
pub mod error;

pub use adapters::RegistryMembership;
pub use engine::AgreementEngine;
pub use error::{EngineError, EngineResult};
