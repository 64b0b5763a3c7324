//! In-memory register file.
//!
//! A sparse, word-addressed model of a fetch unit's register block. Registers
//! that were never written read as their reset value (zero unless preset).
//! It stands in for real hardware in simulation, in the CLI's register dumps
//! and in tests.

use std::collections::BTreeMap;

use crate::soc::traits::RegisterPort;

/// Sparse 32-bit register storage keyed by byte offset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    /// Current register values.
    values: BTreeMap<u64, u32>,
    /// Number of writes performed through the port.
    writes: u64,
}

impl RegisterFile {
    /// Creates an empty register file where every register resets to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Presets the register at `offset` to `val` without counting a write.
    #[must_use]
    pub fn with_value(mut self, offset: u64, val: u32) -> Self {
        self.poke(offset, val);
        self
    }

    /// Returns the register at `offset` without going through the port.
    pub fn peek(&self, offset: u64) -> u32 {
        self.values.get(&offset).copied().unwrap_or(0)
    }

    /// Sets the register at `offset` without going through the port.
    pub fn poke(&mut self, offset: u64, val: u32) {
        let _ = self.values.insert(offset, val);
    }

    /// Returns every register that holds a value, ordered by offset.
    pub fn dump(&self) -> Vec<(u64, u32)> {
        self.values.iter().map(|(&off, &val)| (off, val)).collect()
    }

    /// Returns the number of writes performed through the port.
    pub const fn write_count(&self) -> u64 {
        self.writes
    }
}

impl RegisterPort for RegisterFile {
    fn read_u32(&mut self, offset: u64) -> u32 {
        if offset % 4 != 0 {
            tracing::warn!("unaligned register read at {offset:#x}");
            return 0;
        }
        self.peek(offset)
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        if offset % 4 != 0 {
            tracing::warn!("unaligned register write at {offset:#x} dropped");
            return;
        }
        self.writes += 1;
        self.poke(offset, val);
    }
}
