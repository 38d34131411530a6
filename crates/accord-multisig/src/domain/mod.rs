//! Domain logic for threshold authorization.

pub mod progress;

pub use progress::{SignOutcome, SignatureProgress};
