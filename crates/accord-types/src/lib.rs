//! # Accord Shared Types
//!
//! Single source of truth for identifiers, entities, and lifecycle states
//! shared across the agreement subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every type that crosses a subsystem
//!   boundary lives here.
//! - **Opaque signatures**: signature payloads are raw byte blobs; no
//!   cryptographic verification happens inside the engine.
//! - **Logical addressing**: participants and groups are identified by
//!   caller-supplied string IDs, never by transport addresses.

pub mod entities;
pub mod ids;
pub mod time;

pub use entities::*;
pub use ids::*;
pub use time::now_millis;
