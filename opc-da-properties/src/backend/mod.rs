//! Data source adapter implementations.
//!
//! Each backend is gated behind a feature flag.

#[cfg(feature = "memory-backend")]
pub mod memory;
