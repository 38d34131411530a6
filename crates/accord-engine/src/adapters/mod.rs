//! Adapters layer (hexagonal architecture).

mod registry;

pub use registry::*;
