//! Register access for the display processing unit.
//!
//! This module organizes the register I/O side of a fetch unit: the
//! [`RegisterPort`] capability injected into every controller, an in-memory
//! register file for simulation and tests, and a volatile window over a
//! mapped register block for real hardware.

/// Volatile access to a mapped register window.
pub mod mmio;

/// In-memory register file.
pub mod register_file;

/// Register port trait definition.
pub mod traits;

pub use mmio::MmioWindow;
pub use register_file::RegisterFile;
pub use traits::RegisterPort;
