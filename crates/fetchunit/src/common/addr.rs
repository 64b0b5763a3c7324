//! DMA address type.
//!
//! Fetch units read from bus addresses handed out by the DMA allocator. The
//! hardware only cares about two properties of such an address: its value and
//! its natural alignment (the lowest set bit), which bounds the burst size the
//! fetch engine may use.

use std::fmt;

/// A bus address of a source buffer as seen by the fetch engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DmaAddr(pub u64);

impl DmaAddr {
    /// Creates a new DMA address from a raw 64-bit value.
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Returns the largest power of two that divides this address.
    ///
    /// Address zero is aligned to everything; `None` is returned for it.
    pub const fn natural_alignment(self) -> Option<u64> {
        if self.0 == 0 {
            None
        } else {
            Some(1 << self.0.trailing_zeros())
        }
    }

    /// Returns the address advanced by `bytes`, wrapping on overflow like the bus does.
    #[inline]
    #[must_use]
    pub const fn offset(self, bytes: u64) -> Self {
        Self(self.0.wrapping_add(bytes))
    }

    /// Returns the low 32 bits, the part a base-address register can hold.
    #[inline]
    pub const fn low32(self) -> u32 {
        self.0 as u32
    }
}

impl From<u64> for DmaAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for DmaAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
