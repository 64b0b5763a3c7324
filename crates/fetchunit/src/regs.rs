//! Fetch-unit register map.
//!
//! All fetch-unit variants share one register layout. Global control lives in
//! two registers at fixed offsets; the per-layer registers repeat once per
//! sub-unit with a stride of `0x28` bytes.
//!
//! # Memory Map
//!
//! * `0x08`: Static control (shadow enable, base-address auto-update, sticky shadow-load request)
//! * `0x0C`: Burst buffer management (burst length)
//! * `0x10 + n * 0x28`: Base address
//! * `0x14 + n * 0x28`: Source buffer attributes (bits per pixel, stride)
//! * `0x18 + n * 0x28`: Source buffer dimension
//! * `0x1C + n * 0x28`: Color component bits
//! * `0x20 + n * 0x28`: Color component shift
//! * `0x24 + n * 0x28`: Layer offset
//! * `0x28 + n * 0x28`: Clip window offset
//! * `0x2C + n * 0x28`: Clip window dimensions
//! * `0x30 + n * 0x28`: Constant color
//! * `0x34 + n * 0x28`: Layer property

/// Static control register.
pub const STATIC_CONTROL: u64 = 0x08;

/// Burst buffer management register.
pub const BURST_BUFFER_MANAGEMENT: u64 = 0x0C;

/// Distance between consecutive sub-unit register blocks.
pub const SUB_UNIT_STRIDE: u64 = 0x28;

/// Number of sub-unit register blocks a fetch unit can expose.
pub const MAX_SUB_UNITS: u32 = 8;

/// Offset of the base-address register of sub-unit 0.
const BASE_ADDRESS_BASE: u64 = 0x10;
/// Offset of the source-buffer-attributes register of sub-unit 0.
const SOURCE_BUFFER_ATTRIBUTES_BASE: u64 = 0x14;
/// Offset of the source-buffer-dimension register of sub-unit 0.
const SOURCE_BUFFER_DIMENSION_BASE: u64 = 0x18;
/// Offset of the color-component-bits register of sub-unit 0.
const COLOR_COMPONENT_BITS_BASE: u64 = 0x1C;
/// Offset of the color-component-shift register of sub-unit 0.
const COLOR_COMPONENT_SHIFT_BASE: u64 = 0x20;
/// Offset of the layer-offset register of sub-unit 0.
const LAYER_OFFSET_BASE: u64 = 0x24;
/// Offset of the clip-window-offset register of sub-unit 0.
const CLIP_WINDOW_OFFSET_BASE: u64 = 0x28;
/// Offset of the clip-window-dimensions register of sub-unit 0.
const CLIP_WINDOW_DIMENSIONS_BASE: u64 = 0x2C;
/// Offset of the constant-color register of sub-unit 0.
const CONSTANT_COLOR_BASE: u64 = 0x30;
/// Offset of the layer-property register of sub-unit 0.
const LAYER_PROPERTY_BASE: u64 = 0x34;

/// Returns the offset of a per-sub-unit register given its sub-unit 0 offset.
#[inline]
pub const fn sub_unit_offset(base: u64, sub_id: u32) -> u64 {
    base + sub_id as u64 * SUB_UNIT_STRIDE
}

/// Base address register of `sub_id`.
pub const fn base_address(sub_id: u32) -> u64 {
    sub_unit_offset(BASE_ADDRESS_BASE, sub_id)
}

/// Source buffer attributes register of `sub_id`.
pub const fn source_buffer_attributes(sub_id: u32) -> u64 {
    sub_unit_offset(SOURCE_BUFFER_ATTRIBUTES_BASE, sub_id)
}

/// Source buffer dimension register of `sub_id`.
pub const fn source_buffer_dimension(sub_id: u32) -> u64 {
    sub_unit_offset(SOURCE_BUFFER_DIMENSION_BASE, sub_id)
}

/// Color component bits register of `sub_id`.
pub const fn color_component_bits(sub_id: u32) -> u64 {
    sub_unit_offset(COLOR_COMPONENT_BITS_BASE, sub_id)
}

/// Color component shift register of `sub_id`.
pub const fn color_component_shift(sub_id: u32) -> u64 {
    sub_unit_offset(COLOR_COMPONENT_SHIFT_BASE, sub_id)
}

/// Layer offset register of `sub_id`.
pub const fn layer_offset(sub_id: u32) -> u64 {
    sub_unit_offset(LAYER_OFFSET_BASE, sub_id)
}

/// Clip window offset register of `sub_id`.
pub const fn clip_window_offset(sub_id: u32) -> u64 {
    sub_unit_offset(CLIP_WINDOW_OFFSET_BASE, sub_id)
}

/// Clip window dimensions register of `sub_id`.
pub const fn clip_window_dimensions(sub_id: u32) -> u64 {
    sub_unit_offset(CLIP_WINDOW_DIMENSIONS_BASE, sub_id)
}

/// Constant color register of `sub_id`.
pub const fn constant_color(sub_id: u32) -> u64 {
    sub_unit_offset(CONSTANT_COLOR_BASE, sub_id)
}

/// Layer property register of `sub_id`.
pub const fn layer_property(sub_id: u32) -> u64 {
    sub_unit_offset(LAYER_PROPERTY_BASE, sub_id)
}

// ── Static control ───────────────────────────────────────────────────────────

/// Static control register bit definitions.
pub mod static_control {
    /// Shadow register enable.
    pub const SHDEN: u32 = 1 << 0;
    /// Per-layer base-address auto-update field.
    pub const BASE_ADDRESS_AUTOUPDATE_MASK: u32 = 0xFF << 16;
    /// Per-layer sticky shadow-load request field.
    pub const SHDLDREQ_STICKY_MASK: u32 = 0xFF << 24;

    /// Encodes a layer mask into the base-address auto-update field.
    pub const fn base_address_autoupdate(layer_mask: u8) -> u32 {
        (layer_mask as u32) << 16
    }

    /// Encodes a layer mask into the sticky shadow-load request field.
    pub const fn shdldreq_sticky(layer_mask: u8) -> u32 {
        (layer_mask as u32) << 24
    }
}

// ── Burst buffer management ──────────────────────────────────────────────────

/// Burst buffer management register bit definitions.
pub mod burst_buffer {
    /// Burst length field (in 8-byte units).
    pub const SET_BURST_LENGTH_MASK: u32 = 0x1F << 8;

    /// Encodes a burst length in 8-byte units.
    pub const fn set_burst_length(length: u32) -> u32 {
        (length & 0x1F) << 8
    }
}

// ── Source buffer ────────────────────────────────────────────────────────────

/// Source buffer attributes register bit definitions.
pub mod buffer_attributes {
    /// Stride field. The hardware stores `stride - 1`.
    pub const STRIDE_MASK: u32 = 0xFFFF;
    /// Bits-per-pixel field.
    pub const BITS_PER_PIXEL_MASK: u32 = 0x3F << 16;

    /// Encodes a line stride in bytes.
    pub const fn stride(bytes: u32) -> u32 {
        bytes.wrapping_sub(1) & STRIDE_MASK
    }

    /// Encodes a pixel width in bits.
    pub const fn bits_per_pixel(bpp: u32) -> u32 {
        (bpp & 0x3F) << 16
    }
}

/// Source buffer dimension register bit definitions.
///
/// Shared by the clip window dimensions register, which has the same layout.
pub mod buffer_dimension {
    /// Line width field. The hardware stores `width - 1`.
    pub const LINE_WIDTH_MASK: u32 = 0x3FFF;
    /// Line count field. The hardware stores `height - 1`.
    pub const LINE_COUNT_MASK: u32 = 0x3FFF << 16;

    /// Encodes a width and height in pixels.
    pub const fn encode(width: u32, height: u32) -> u32 {
        (width.wrapping_sub(1) & 0x3FFF) | ((height.wrapping_sub(1) & 0x3FFF) << 16)
    }
}

/// Layer offset register bit definitions.
///
/// Shared by the clip window offset register, which has the same layout.
pub mod layer_offset {
    /// Encodes an x/y position in pixels.
    pub const fn encode(x: u32, y: u32) -> u32 {
        (x & 0x7FFF) | ((y & 0x7FFF) << 16)
    }
}

/// Color component registers (bits, shift, constant color) packing.
pub mod color {
    /// Packs four 8-bit channel values as R, G, B, A from most to least significant byte.
    pub const fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
        ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32
    }

    /// Width of each channel field in the component-bits register.
    pub const BITS_FIELD_MASK: u8 = 0x0F;
    /// Width of each channel field in the component-shift register.
    pub const SHIFT_FIELD_MASK: u8 = 0x1F;
}

/// Layer property register bit definitions.
pub mod layer_property {
    /// Source buffer enable.
    pub const SOURCE_BUFFER_ENABLE: u32 = 1 << 31;
    /// Clip window enable.
    pub const CLIP_WINDOW_ENABLE: u32 = 1 << 30;
}
