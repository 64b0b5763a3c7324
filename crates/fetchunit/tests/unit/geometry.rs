//! Fetch Geometry Unit Tests.
//!
//! Verifies burst size derivation from address alignment, the PRG x/y offset
//! corrections of tiled buffers, and stride padding with and without prefetch.

use dpu_fetchunit::DmaAddr;
use dpu_fetchunit::geometry::{
    self, BURST_UNIT, DEFAULT_BURST_LENGTH, MAX_BURST_SIZE, TileLayout, apply_x_offset,
    base_address, burst_length, burst_size, source_stride,
};
use proptest::prelude::*;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Burst size and length
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0x1000, 128)]
#[case(0x1080, 128)]
#[case(0x1040, 64)]
#[case(0x1020, 32)]
#[case(0x1010, 16)]
#[case(0x1008, 8)]
#[case(0x1004, 8)]
#[case(0x1001, 8)]
fn burst_size_from_alignment(#[case] addr: u64, #[case] expected: u32) {
    assert_eq!(burst_size(DmaAddr(addr)), expected);
}

#[test]
fn burst_length_without_prefetch_is_fixed() {
    assert_eq!(burst_length(20, 16, 32, DmaAddr(0x1004), false), DEFAULT_BURST_LENGTH);
    assert_eq!(DEFAULT_BURST_LENGTH, 16);
}

#[test]
fn burst_length_uses_corrected_address() {
    // 0x1000 + (20 % 16) * 4 = 0x1010, aligned to 16 bytes.
    assert_eq!(burst_length(20, 16, 32, DmaAddr(0x1000), true), 2);
    // Linear buffer: no x correction, 0x1000 allows full bursts.
    assert_eq!(burst_length(20, 0, 32, DmaAddr(0x1000), true), 16);
}

// ══════════════════════════════════════════════════════════
// 2. Base address
// ══════════════════════════════════════════════════════════

#[test]
fn linear_base_address_is_verbatim() {
    let addr = base_address(64, 20, 20, TileLayout::LINEAR, 32, DmaAddr(0x1234));
    assert_eq!(addr, DmaAddr(0x1234));
}

#[test]
fn tiled_base_address_applies_x_then_y() {
    // x: 0x1000 + 4 * 4 = 0x1010, burst 16, stride 256, y: + 4 * 256.
    let addr = base_address(64, 20, 20, TileLayout::new(16, 16), 32, DmaAddr(0x1000));
    assert_eq!(addr, DmaAddr(0x1410));
}

#[test]
fn tiled_base_address_pads_stride_for_address_remainder() {
    // burst 8, stride 40 + 8 = 48, one line down.
    let addr = base_address(10, 0, 5, TileLayout::new(16, 4), 32, DmaAddr(0x1004));
    assert_eq!(addr, DmaAddr(0x1034));
}

#[test]
fn tiled_base_address_rounds_stride_to_burst() {
    // x: 0x1008, burst 8, stride 60 rounded to 64, one line down.
    let addr = base_address(30, 4, 3, TileLayout::new(8, 2), 16, DmaAddr(0x1000));
    assert_eq!(addr, DmaAddr(0x1048));
}

#[test]
fn huge_y_correction_wraps_instead_of_overflowing() {
    // stride 4 * (2^32 - 1) padded to 2^34; (2^32 - 2) lines wrap past 2^64.
    let addr = base_address(
        u32::MAX,
        0,
        u32::MAX - 1,
        TileLayout::new(1, u32::MAX),
        32,
        DmaAddr(0x1000),
    );
    assert_eq!(addr, DmaAddr(0xFFFF_FFF8_0000_1000));
}

#[test]
fn huge_stride_wraps_instead_of_overflowing() {
    let stride = source_stride(u32::MAX, 0, 0, 32, 0, DmaAddr(0x1000), true);
    assert_eq!(stride, 0);
}

#[test]
fn zero_tile_height_skips_y_correction() {
    let addr = base_address(64, 4, 7, TileLayout::new(8, 0), 32, DmaAddr(0x1000));
    assert_eq!(addr, DmaAddr(0x1010));
}

// ══════════════════════════════════════════════════════════
// 3. Stride
// ══════════════════════════════════════════════════════════

#[test]
fn stride_without_prefetch_is_verbatim() {
    assert_eq!(source_stride(64, 20, 16, 32, 1234, DmaAddr(0x1004), false), 1234);
}

#[test]
fn linear_prefetch_stride_rounds_to_burst() {
    // 100 * 3 = 300 rounded to 128-byte bursts.
    assert_eq!(source_stride(100, 0, 0, 24, 0, DmaAddr(0x1000), true), 384);
}

#[test]
fn linear_prefetch_stride_ignores_address_remainder() {
    // 0x1004 allows 8-byte bursts; 40 is already a multiple of 8.
    assert_eq!(source_stride(10, 0, 0, 32, 0, DmaAddr(0x1004), true), 40);
}

#[test]
fn tiled_prefetch_stride_matches_base_address_stride() {
    assert_eq!(source_stride(64, 20, 16, 32, 0, DmaAddr(0x1000), true), 256);
    assert_eq!(source_stride(10, 0, 16, 32, 0, DmaAddr(0x1004), true), 48);
}

#[test]
fn eco_stride_uses_chroma_bytes() {
    // Chroma plane: 1920 bytes per line at 8 bpp.
    assert_eq!(source_stride(1920, 0, 0, 8, 0, DmaAddr(0x2000), true), 1920);
}

// ══════════════════════════════════════════════════════════
// 4. Properties
// ══════════════════════════════════════════════════════════

fn bpp() -> impl Strategy<Value = u32> {
    prop_oneof![Just(8_u32), Just(16), Just(24), Just(32)]
}

proptest! {
    #[test]
    fn burst_size_is_power_of_two_multiple_of_unit(addr in any::<u64>()) {
        let size = burst_size(DmaAddr(addr));
        prop_assert!(size.is_power_of_two());
        prop_assert_eq!(size % BURST_UNIT, 0);
        prop_assert!(size <= MAX_BURST_SIZE);
    }

    #[test]
    fn burst_size_divides_eight_aligned_addresses(addr in (1_u64..1 << 40).prop_map(|a| a * 8)) {
        prop_assert_eq!(addr % u64::from(burst_size(DmaAddr(addr))), 0);
    }

    #[test]
    fn burst_length_without_prefetch_ignores_geometry(
        x in any::<u32>(),
        tile_width in any::<u32>(),
        bpp in any::<u32>(),
        base in any::<u64>(),
    ) {
        prop_assert_eq!(burst_length(x, tile_width, bpp, DmaAddr(base), false), DEFAULT_BURST_LENGTH);
    }

    #[test]
    fn x_offset_correction_is_idempotent(
        base in 0_u64..1 << 48,
        x in any::<u32>(),
        tile_width in 0_u32..256,
        bpp in bpp(),
    ) {
        let once = apply_x_offset(DmaAddr(base), x, tile_width, bpp);
        prop_assert_eq!(apply_x_offset(once, 0, tile_width, bpp), once);
    }

    #[test]
    fn x_offset_correction_is_periodic_in_tile_width(
        base in 0_u64..1 << 32,
        x in 0_u32..64,
        tiles in 0_u32..16,
        tile_width in 1_u32..64,
        bpp in bpp(),
    ) {
        let near = apply_x_offset(DmaAddr(base), x, tile_width, bpp);
        let far = apply_x_offset(DmaAddr(base), x + tiles * tile_width, tile_width, bpp);
        prop_assert_eq!(near, far);
    }

    #[test]
    fn prefetch_stride_is_whole_bursts(
        base in 0_u64..1 << 32,
        width in 1_u32..4096,
        x in 0_u32..256,
        tile_width in prop_oneof![Just(0_u32), Just(8), Just(16), Just(32)],
        bpp in bpp(),
    ) {
        let stride = source_stride(width, x, tile_width, bpp, 0, DmaAddr(base), true);
        let corrected = apply_x_offset(DmaAddr(base), x, tile_width, bpp);
        prop_assert_eq!(stride % burst_size(corrected), 0);
        prop_assert!(stride >= width * (bpp / 8));
    }

    #[test]
    fn y_offset_lands_on_a_stride_boundary_inside_the_tile(
        base in 0_u64..1 << 32,
        width in 1_u32..4096,
        x in 0_u32..256,
        y in 0_u32..256,
        tile in (1_u32..32, 1_u32..32),
        bpp in bpp(),
    ) {
        let layout = TileLayout::new(tile.0, tile.1);
        let corrected = geometry::apply_x_offset(DmaAddr(base), x, tile.0, bpp);
        let stride = u64::from(source_stride(width, x, tile.0, bpp, 0, DmaAddr(base), true));
        let addr = base_address(width, x, y, layout, bpp, DmaAddr(base));

        let delta = addr.val() - corrected.val();
        prop_assert_eq!(delta % stride, 0);
        prop_assert!(delta / stride < u64::from(tile.1));
    }
}
