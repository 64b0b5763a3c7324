//! Fetch-unit hardware abstraction for i.MX display processing units.
//!
//! A fetch unit is the DMA front-end of the DPU's pixel pipeline: it reads a
//! source buffer from memory and feeds it to the compositor. This crate
//! implements the following:
//! 1. **Geometry:** Burst length, stride and base-address derivation, including the
//!    prefetch-resolver tile corrections and the alignment errata workarounds.
//! 2. **Registers:** The shared fetch-unit register map as pure offset functions and field encoders.
//! 3. **Controller:** [`FetchUnit`], which programs one engine through an injected register port.
//! 4. **Configuration:** JSON description of the fetch engines of a DPU.

/// Common types (DMA addresses, errors).
pub mod common;
/// Fetch-unit configuration (defaults, per-unit entries, loading).
pub mod config;
/// Fetch-unit controller (variants, stream routing, prefetch companion).
pub mod fetchunit;
/// Pure fetch-geometry arithmetic.
pub mod geometry;
/// Register map (offsets and bit fields).
pub mod regs;
/// Register access (port trait, in-memory register file, MMIO window).
pub mod soc;

/// Root configuration type; deserialize with `Config::from_json` or `Config::load`.
pub use crate::config::Config;
/// Address type for source buffers.
pub use crate::common::DmaAddr;
/// Fetch-unit controller and its soft-state types.
pub use crate::fetchunit::{FetchUnit, FetchUnitKind, StreamId};
/// Register I/O capability injected into every controller.
pub use crate::soc::RegisterPort;
