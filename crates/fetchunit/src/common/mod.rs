//! Common types shared by the register map, geometry and controller code.
//!
//! This module provides:
//! 1. **Address Types:** A strong type for DMA (bus) addresses of source buffers.
//! 2. **Error Handling:** Configuration errors and the raw stream-id conversion error.

/// DMA address type definition.
pub mod addr;

/// Error types for configuration loading and raw value conversion.
pub mod error;

pub use addr::DmaAddr;
pub use error::{ConfigError, InvalidStreamId};
