//! Fetch geometry: burst size, stride and base-address derivation.
//!
//! The fetch engine reads a source buffer in bursts. Two hardware errata
//! constrain how a buffer must be described when a prefetch resolver (PRG) sits
//! in front of it:
//!
//! 1. **TKT343664:** the base address must be aligned to the burst size, so the
//!    burst size is derived from the natural alignment of the address.
//! 2. **TKT339017:** the stride must be a multiple of the burst size, so the
//!    line stride is padded up after accounting for the address's sub-8-byte
//!    remainder.
//!
//! With a tiled (PRG) buffer the address handed to the fetch unit also has to
//! absorb the PRG's x and y offsets inside a tile. The corrections are applied
//! strictly in the order x offset, stride, y offset: the y correction scales
//! the padded stride, which in turn depends on the x-corrected address.
//!
//! Everything here is pure arithmetic; [`FetchUnit`](crate::fetchunit::FetchUnit)
//! writes the results to the registers.

use crate::common::DmaAddr;

/// Size of one burst-length unit in bytes.
pub const BURST_UNIT: u32 = 8;

/// Largest burst the fetch engine may issue, in bytes.
pub const MAX_BURST_SIZE: u32 = 128;

/// Burst length used when no prefetch resolver is involved (16 × 8 = 128 bytes).
pub const DEFAULT_BURST_LENGTH: u32 = MAX_BURST_SIZE / BURST_UNIT;

/// Geometry of a tiled source buffer as seen by the prefetch resolver.
///
/// A zero width means the buffer is linear and no tile correction applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileLayout {
    /// Tile width in pixels.
    pub width: u32,
    /// Tile height in lines.
    pub height: u32,
}

impl TileLayout {
    /// A linear (untiled) buffer.
    pub const LINEAR: Self = Self {
        width: 0,
        height: 0,
    };

    /// Creates a tile layout.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if the buffer is tiled.
    pub const fn is_tiled(self) -> bool {
        self.width != 0
    }
}

/// Rounds `value` up to the next multiple of `align`; zero stays zero.
///
/// Wraps on overflow like the unsigned bus arithmetic it models.
#[inline]
const fn round_up(value: u64, align: u64) -> u64 {
    value.div_ceil(align).wrapping_mul(align)
}

/// Applies the PRG x-offset correction to `baddr`.
///
/// The resolver addresses a tile column starting at `x_offset % tile_width`,
/// so the fetch unit must start that many pixels further into the line. A
/// zero `tile_width` leaves the address untouched.
///
/// # Arguments
///
/// * `baddr` - Address of the first pixel of the buffer.
/// * `x_offset` - PRG x offset in pixels.
/// * `tile_width` - Tile width in pixels, or 0 for a linear buffer.
/// * `bpp` - Bits per pixel.
///
/// # Returns
///
/// The address the fetch unit must start reading from.
pub const fn apply_x_offset(baddr: DmaAddr, x_offset: u32, tile_width: u32, bpp: u32) -> DmaAddr {
    if tile_width == 0 {
        return baddr;
    }
    let pixels = (x_offset % tile_width) as u64;
    baddr.offset(pixels.wrapping_mul((bpp / 8) as u64))
}

/// Derives the burst size in bytes allowed by the alignment of `baddr`.
///
/// The result is the lowest set bit of the address, rounded up to a multiple
/// of [`BURST_UNIT`] and capped at [`MAX_BURST_SIZE`]. It is always one of
/// 8, 16, 32, 64 or 128. Address zero is treated as maximally aligned.
pub const fn burst_size(baddr: DmaAddr) -> u32 {
    match baddr.natural_alignment() {
        None => MAX_BURST_SIZE,
        Some(align) if align >= MAX_BURST_SIZE as u64 => MAX_BURST_SIZE,
        Some(align) => round_up(align, BURST_UNIT as u64) as u32,
    }
}

/// Computes the burst length register value (in 8-byte units).
///
/// Without prefetch the engine always uses [`DEFAULT_BURST_LENGTH`]. With
/// prefetch the burst must divide the x-corrected base address.
///
/// # Arguments
///
/// * `x_offset` - PRG x offset in pixels.
/// * `tile_width` - Tile width in pixels, or 0 for a linear buffer.
/// * `bpp` - Bits per pixel.
/// * `baddr` - Address of the first pixel of the buffer.
/// * `use_prefetch` - The buffer is read through a prefetch resolver.
///
/// # Returns
///
/// The burst length in [`BURST_UNIT`] units, between 1 and [`DEFAULT_BURST_LENGTH`].
pub const fn burst_length(
    x_offset: u32,
    tile_width: u32,
    bpp: u32,
    baddr: DmaAddr,
    use_prefetch: bool,
) -> u32 {
    if !use_prefetch {
        return DEFAULT_BURST_LENGTH;
    }
    let baddr = apply_x_offset(baddr, x_offset, tile_width, bpp);
    burst_size(baddr) / BURST_UNIT
}

/// Pads a line stride so it is a whole number of bursts.
///
/// `pad_remainder` additionally accounts for the address's offset inside an
/// 8-byte word, which the tiled path needs and the linear path does not.
const fn padded_stride(stride: u64, baddr: DmaAddr, burst: u32, pad_remainder: bool) -> u64 {
    let lead = if pad_remainder {
        round_up(baddr.val() % 8, 8)
    } else {
        0
    };
    round_up(stride.wrapping_add(lead), burst as u64)
}

/// Computes the address programmed into the base-address register.
///
/// For a linear buffer (`tile.width == 0`) this is `baddr` verbatim. For a
/// tiled buffer the x offset is folded into the address, the stride is padded
/// to the burst size of the corrected address and the y offset inside the
/// tile is added in units of that padded stride. A tiled layout with zero
/// tile height skips the y step. Address arithmetic wraps at 64 bits.
///
/// # Arguments
///
/// * `width` - Line width in pixels.
/// * `x_offset` - PRG x offset in pixels.
/// * `y_offset` - PRG y offset in lines.
/// * `tile` - Tile geometry, [`TileLayout::LINEAR`] for a linear buffer.
/// * `bpp` - Bits per pixel.
/// * `baddr` - Address of the first pixel of the buffer.
///
/// # Returns
///
/// The corrected address; only its low 32 bits reach the register.
pub const fn base_address(
    width: u32,
    x_offset: u32,
    y_offset: u32,
    tile: TileLayout,
    bpp: u32,
    baddr: DmaAddr,
) -> DmaAddr {
    if !tile.is_tiled() {
        return baddr;
    }

    let baddr = apply_x_offset(baddr, x_offset, tile.width, bpp);
    if tile.height == 0 {
        return baddr;
    }

    let burst = burst_size(baddr);
    let raw = (width as u64).wrapping_mul((bpp >> 3) as u64);
    let stride = padded_stride(raw, baddr, burst, true);
    let lines = (y_offset % tile.height) as u64;
    baddr.offset(lines.wrapping_mul(stride))
}

/// Computes the line stride programmed into the buffer-attributes register.
///
/// Without prefetch the caller's `stride` is used verbatim. With prefetch the
/// stride is recomputed from `width` and `bpp` and padded to the burst size of
/// the (x-corrected, when tiled) base address.
///
/// For the eco (chroma) fetch unit the caller passes the number of chroma
/// bytes per line as `width` and 8 as `bpp`; no format handling happens here.
///
/// # Returns
///
/// The line stride in bytes, truncated to 32 bits.
pub const fn source_stride(
    width: u32,
    x_offset: u32,
    tile_width: u32,
    bpp: u32,
    stride: u32,
    baddr: DmaAddr,
    use_prefetch: bool,
) -> u32 {
    if !use_prefetch {
        return stride;
    }

    let baddr = apply_x_offset(baddr, x_offset, tile_width, bpp);
    let burst = burst_size(baddr);
    let raw = (width as u64).wrapping_mul((bpp >> 3) as u64);
    padded_stride(raw, baddr, burst, tile_width != 0) as u32
}
