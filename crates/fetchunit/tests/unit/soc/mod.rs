//! Register access back-end tests.

/// Volatile window over mapped registers.
pub mod mmio;
