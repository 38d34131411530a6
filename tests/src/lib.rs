//! # Accord Test Suite
//!
//! Unified test crate covering behavior no single crate can see alone.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # End-to-end protocol scenarios through the engine
//!     ├── concurrency.rs  # Racing voters, signers, and settlers
//!     └── events.rs       # Lifecycle event choreography over the bus
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p accord-tests
//!
//! # By category
//! cargo test -p accord-tests integration::flows
//! cargo test -p accord-tests integration::concurrency
//! cargo test -p accord-tests integration::events
//! ```

#![allow(dead_code)]

pub mod integration;

/// Install a log subscriber for test runs.
///
/// Honors `RUST_LOG`; quiet by default. Safe to call from every test,
/// later calls are no-ops once a subscriber is installed.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
