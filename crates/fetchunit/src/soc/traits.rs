//! Register port trait.
//!
//! A fetch unit never touches the bus directly. It is handed a
//! [`RegisterPort`] covering its own register block and performs every access
//! through it. Offsets are relative to the start of that block.
//!
//! Ports are assumed to be synchronous and reliable: a read returns the
//! current register value and a write lands before the call returns. Bus
//! faults and absent hardware are the port implementor's concern.
//!
//! Implementors must be `Send` so a controller holding a port can be shared
//! between the threads that configure planes.

use std::sync::{Arc, Mutex, PoisonError};

/// 32-bit register I/O over one fetch unit's register block.
pub trait RegisterPort: Send {
    /// Reads the 32-bit register at `offset`.
    fn read_u32(&mut self, offset: u64) -> u32;
    /// Writes `val` to the 32-bit register at `offset`.
    fn write_u32(&mut self, offset: u64, val: u32);
}

impl<P: RegisterPort + ?Sized> RegisterPort for Box<P> {
    fn read_u32(&mut self, offset: u64) -> u32 {
        (**self).read_u32(offset)
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        (**self).write_u32(offset, val);
    }
}

impl<P: RegisterPort + ?Sized> RegisterPort for &mut P {
    fn read_u32(&mut self, offset: u64) -> u32 {
        (**self).read_u32(offset)
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        (**self).write_u32(offset, val);
    }
}

/// A port shared with an observer, e.g. a register dump that inspects a
/// simulated register file while a controller owns its clone of the handle.
///
/// Each individual access takes the inner lock; read-modify-write atomicity
/// still comes from the controller's own lock.
impl<P: RegisterPort> RegisterPort for Arc<Mutex<P>> {
    fn read_u32(&mut self, offset: u64) -> u32 {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .read_u32(offset)
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .write_u32(offset, val);
    }
}
