//! # Accord Bus: agreement lifecycle events
//!
//! The engine never calls back into UI or analytics collaborators; when a
//! unit reaches a decisive state it publishes an [`AgreementEvent`] here
//! and moves on. Collaborators subscribe with a topic filter and render or
//! log what they receive.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Protocol   │                    │ Collaborator │
//! │   service    │    publish()       │  (UI, logs)  │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{AgreementEvent, EventFilter, EventTopic};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, Subscription, SubscriptionError};

/// Maximum events buffered per subscriber before lagged drops.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
