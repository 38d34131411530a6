//! Cross-crate integration tests.

pub mod concurrency;
pub mod events;
pub mod flows;
