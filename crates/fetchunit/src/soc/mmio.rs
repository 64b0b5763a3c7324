//! Volatile register window.
//!
//! [`MmioWindow`] wraps a pointer to a fetch unit's mapped register block and
//! performs 32-bit volatile loads and stores through it. Mapping the block
//! (ioremap, `/dev/mem`, VFIO, ...) is the caller's business; the window only
//! borrows the mapping.

use std::fmt;
use std::ptr::NonNull;

use crate::soc::traits::RegisterPort;

/// A mapped register block accessed with volatile 32-bit operations.
pub struct MmioWindow {
    /// Start of the register block.
    base: NonNull<u8>,
    /// Size of the register block in bytes.
    size: usize,
}

impl fmt::Debug for MmioWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MmioWindow")
            .field("base", &format_args!("{:p}", self.base))
            .field("size", &format_args!("{:#x}", self.size))
            .finish()
    }
}

// SAFETY: Send - the window is a plain pointer into device memory that stays
// mapped for the window's lifetime (constructor contract). Device registers
// have no thread affinity; moving the window moves the only accessor.
unsafe impl Send for MmioWindow {}

impl MmioWindow {
    /// Creates a window over `size` bytes of mapped registers at `base`.
    ///
    /// # Safety
    ///
    /// * `base` must be 4-byte aligned and valid for volatile reads and writes
    ///   of `size` bytes for as long as the window exists.
    /// * No Rust reference may alias the block while the window is alive.
    pub const unsafe fn new(base: NonNull<u8>, size: usize) -> Self {
        Self { base, size }
    }

    /// Returns the size of the window in bytes.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the byte offset as `usize` if a 32-bit access there is in bounds and aligned.
    fn checked(&self, offset: u64) -> Option<usize> {
        let off = usize::try_from(offset).ok()?;
        (off % 4 == 0 && off.checked_add(4)? <= self.size).then_some(off)
    }
}

impl RegisterPort for MmioWindow {
    fn read_u32(&mut self, offset: u64) -> u32 {
        let Some(off) = self.checked(offset) else {
            tracing::warn!("register read at {offset:#x} outside window of {:#x} bytes", self.size);
            return 0;
        };
        // SAFETY: read_volatile necessary for MMIO - hardware can change the value.
        // Invariants: (1) base valid for size bytes (constructor contract);
        // (2) off + 4 <= size and off is 4-aligned (checked above).
        unsafe { self.base.as_ptr().add(off).cast::<u32>().read_volatile() }
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        let Some(off) = self.checked(offset) else {
            tracing::warn!("register write at {offset:#x} outside window of {:#x} bytes dropped", self.size);
            return;
        };
        // SAFETY: write_volatile necessary for MMIO - triggers hardware side effects.
        // Invariants: (1) base valid for size bytes (constructor contract);
        // (2) off + 4 <= size and off is 4-aligned (checked above).
        unsafe { self.base.as_ptr().add(off).cast::<u32>().write_volatile(val) }
    }
}
