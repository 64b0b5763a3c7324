//! Fetch-unit controller.
//!
//! A [`FetchUnit`] drives one physical fetch engine: it derives the memory
//! geometry for a source buffer and programs it into the unit's registers,
//! and it carries the soft state the display pipeline needs (stream routing,
//! pin-off flag, prefetch companion).
//!
//! The pipeline manager typically programs a frame buffer in this order:
//!
//! ```text
//! set_stream_id → set_base_address → set_source_stride →
//! set_burst_length → set_source_bits_per_pixel → enable_source_buffer
//! ```
//!
//! # Concurrency
//!
//! Register operations take `&self` and hold the unit's lock for the whole
//! read-modify-write sequence, so callers on different threads may program
//! the same unit concurrently. Units never share registers and need no
//! coordination between each other.
//!
//! Soft-state operations (stream id, pin-off, companion) take `&mut self`
//! and are not covered by the lock. Callers that share a unit must provide
//! their own synchronization for them, normally by doing all soft-state
//! updates during the single-threaded configuration phase.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::common::DmaAddr;
use crate::config::FetchUnitConfig;
use crate::geometry::{self, TileLayout};
use crate::regs::{self, buffer_attributes, burst_buffer, layer_property, static_control};
use crate::soc::RegisterPort;

/// Prefetch companion binding.
pub mod companion;

/// Fetch-unit variants.
pub mod kind;

/// Display stream routing.
pub mod stream;

pub use companion::PrefetchCompanion;
pub use kind::FetchUnitKind;
pub use stream::StreamId;

/// Per-channel values for the color component registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorComponents {
    /// Red (or Y/V) channel.
    pub r: u8,
    /// Green (or U) channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl ColorComponents {
    /// Creates a component descriptor.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Packs the channels with each field limited to `mask`.
    const fn pack_masked(self, mask: u8) -> u32 {
        regs::color::pack(self.r & mask, self.g & mask, self.b & mask, self.a & mask)
    }
}

/// Controller for one fetch engine.
pub struct FetchUnit<P: RegisterPort> {
    /// Role of the unit.
    kind: FetchUnitKind,
    /// Physical block index.
    id: u32,
    /// Register sub-unit index.
    sub_id: u32,
    /// Register port; the mutex serializes read-modify-write sequences.
    port: Mutex<P>,
    /// Display stream the unit feeds.
    stream_id: StreamId,
    /// Excluded from dynamic power/clock gating decisions.
    pin_off: bool,
    /// Non-owning handle to the prefetch resolver in front of the unit.
    companion: Option<Weak<dyn PrefetchCompanion>>,
}

impl<P: RegisterPort> fmt::Debug for FetchUnit<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchUnit")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("sub_id", &self.sub_id)
            .field("stream_id", &self.stream_id)
            .field("pin_off", &self.pin_off)
            .field("companion", &self.prefetch_companion())
            .finish_non_exhaustive()
    }
}

impl<P: RegisterPort> fmt::Display for FetchUnit<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.id)
    }
}

impl<P: RegisterPort> FetchUnit<P> {
    /// Creates a controller for the fetch engine `kind`/`id` whose registers
    /// are reached through `port`, using register sub-unit `sub_id`.
    ///
    /// The unit starts disconnected from any stream and not pinned off.
    pub const fn new(kind: FetchUnitKind, id: u32, sub_id: u32, port: P) -> Self {
        Self {
            kind,
            id,
            sub_id,
            port: Mutex::new(port),
            stream_id: StreamId::Disabled,
            pin_off: false,
            companion: None,
        }
    }

    /// Creates a controller from a configuration entry.
    ///
    /// Entries from [`Config::load`](crate::config::Config::load) are already
    /// validated. A hand-built entry that fails [`FetchUnitConfig::validate`]
    /// is reported; the unit is still created and addresses registers past
    /// its block.
    pub fn from_config(config: &FetchUnitConfig, port: P) -> Self {
        if let Err(err) = config.validate() {
            tracing::warn!("contract violation: {err}");
        }
        let mut unit = Self::new(config.kind, config.id, config.sub_id, port);
        unit.stream_id = config.stream;
        unit
    }

    /// Locks the register port for one access sequence.
    fn lock(&self) -> MutexGuard<'_, P> {
        // A panic mid-sequence leaves registers in whatever state the bus saw;
        // there is nothing to repair, so keep using the port.
        self.port.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read-modify-write of one register under the lock.
    fn modify(&self, offset: u64, f: impl FnOnce(u32) -> u32) {
        let mut port = self.lock();
        let val = f(port.read_u32(offset));
        port.write_u32(offset, val);
    }

    /// Replaces the bits of `mask` in the register at `offset` with `field`.
    fn update_field(&self, offset: u64, mask: u32, field: u32) {
        self.modify(offset, |val| (val & !mask) | (field & mask));
    }

    /// Writes one register under the lock.
    fn write(&self, offset: u64, val: u32) {
        self.lock().write_u32(offset, val);
    }

    // ── Identification ───────────────────────────────────────────────────────

    /// Returns the role of this unit.
    pub const fn kind(&self) -> FetchUnitKind {
        self.kind
    }

    /// Returns the hardware block name of this unit's variant.
    pub const fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Returns the physical block index.
    pub const fn id(&self) -> u32 {
        self.id
    }

    /// Returns the register sub-unit index.
    pub const fn sub_id(&self) -> u32 {
        self.sub_id
    }

    /// Returns `true` for a FetchDecode unit.
    pub const fn is_fetchdecode(&self) -> bool {
        matches!(self.kind, FetchUnitKind::Decode)
    }

    /// Returns `true` for a FetchEco unit.
    pub const fn is_fetcheco(&self) -> bool {
        matches!(self.kind, FetchUnitKind::Eco)
    }

    /// Returns `true` for a FetchLayer unit.
    pub const fn is_fetchlayer(&self) -> bool {
        matches!(self.kind, FetchUnitKind::Layer)
    }

    /// Returns `true` for a FetchWarp unit.
    pub const fn is_fetchwarp(&self) -> bool {
        matches!(self.kind, FetchUnitKind::Warp)
    }

    // ── Static control ───────────────────────────────────────────────────────

    /// Enables or disables shadow register loading.
    pub fn set_shadow_enable(&self, enabled: bool) {
        self.modify(regs::STATIC_CONTROL, |val| {
            if enabled {
                val | static_control::SHDEN
            } else {
                val & !static_control::SHDEN
            }
        });
    }

    /// Selects which layers reload their base address automatically.
    pub fn set_baseaddress_autoupdate(&self, layer_mask: u8) {
        self.update_field(
            regs::STATIC_CONTROL,
            static_control::BASE_ADDRESS_AUTOUPDATE_MASK,
            static_control::base_address_autoupdate(layer_mask),
        );
    }

    /// Selects which layers hold a sticky shadow-load request.
    pub fn set_shadow_load_sticky(&self, layer_mask: u8) {
        self.update_field(
            regs::STATIC_CONTROL,
            static_control::SHDLDREQ_STICKY_MASK,
            static_control::shdldreq_sticky(layer_mask),
        );
    }

    // ── Fetch geometry ───────────────────────────────────────────────────────

    /// Programs the burst length.
    ///
    /// Without prefetch the burst is fixed at 128 bytes. With prefetch the
    /// burst is derived from the alignment of `baddr` after the PRG x-offset
    /// correction.
    ///
    /// # Arguments
    ///
    /// * `x_offset` - PRG x offset in pixels.
    /// * `tile_width` - Tile width in pixels, or 0 for a linear buffer.
    /// * `bpp` - Bits per pixel.
    /// * `baddr` - Address of the first pixel of the buffer.
    /// * `use_prefetch` - The buffer is read through a prefetch resolver.
    pub fn set_burst_length(
        &self,
        x_offset: u32,
        tile_width: u32,
        bpp: u32,
        baddr: DmaAddr,
        use_prefetch: bool,
    ) {
        let length = geometry::burst_length(x_offset, tile_width, bpp, baddr, use_prefetch);

        self.update_field(
            regs::BURST_BUFFER_MANAGEMENT,
            burst_buffer::SET_BURST_LENGTH_MASK,
            burst_buffer::set_burst_length(length),
        );

        tracing::debug!("{self} burst length is {length}");
    }

    /// Programs the base address of the source buffer.
    ///
    /// For a tiled buffer (`tile_width != 0`) the PRG x and y offsets are
    /// folded into the address; a linear buffer's address is written verbatim.
    ///
    /// # Arguments
    ///
    /// * `width` - Line width in pixels.
    /// * `x_offset` - PRG x offset in pixels.
    /// * `y_offset` - PRG y offset in lines.
    /// * `tile_width` - Tile width in pixels, or 0 for a linear buffer.
    /// * `tile_height` - Tile height in lines.
    /// * `bpp` - Bits per pixel.
    /// * `baddr` - Address of the first pixel of the buffer.
    pub fn set_base_address(
        &self,
        width: u32,
        x_offset: u32,
        y_offset: u32,
        tile_width: u32,
        tile_height: u32,
        bpp: u32,
        baddr: DmaAddr,
    ) {
        let tile = TileLayout::new(tile_width, tile_height);
        let addr = geometry::base_address(width, x_offset, y_offset, tile, bpp, baddr);

        self.write(regs::base_address(self.sub_id), addr.low32());

        tracing::debug!("{self} base address is {addr}");
    }

    /// Programs the source line stride.
    ///
    /// Without prefetch `stride` is written as given. With prefetch the stride
    /// is recomputed from `width` and `bpp` and padded to the burst size. For
    /// a FetchEco unit, `width` is the chroma byte count per line and `bpp` is 8.
    ///
    /// # Arguments
    ///
    /// * `width` - Line width in pixels.
    /// * `x_offset` - PRG x offset in pixels.
    /// * `tile_width` - Tile width in pixels, or 0 for a linear buffer.
    /// * `bpp` - Bits per pixel.
    /// * `stride` - Line stride in bytes, used as is without prefetch.
    /// * `baddr` - Address of the first pixel of the buffer.
    /// * `use_prefetch` - The buffer is read through a prefetch resolver.
    pub fn set_source_stride(
        &self,
        width: u32,
        x_offset: u32,
        tile_width: u32,
        bpp: u32,
        stride: u32,
        baddr: DmaAddr,
        use_prefetch: bool,
    ) {
        let stride =
            geometry::source_stride(width, x_offset, tile_width, bpp, stride, baddr, use_prefetch);

        self.update_field(
            regs::source_buffer_attributes(self.sub_id),
            buffer_attributes::STRIDE_MASK,
            buffer_attributes::stride(stride),
        );

        tracing::debug!("{self} stride is {stride}");
    }

    /// Programs the source pixel width in bits.
    pub fn set_source_bits_per_pixel(&self, bpp: u32) {
        self.update_field(
            regs::source_buffer_attributes(self.sub_id),
            buffer_attributes::BITS_PER_PIXEL_MASK,
            buffer_attributes::bits_per_pixel(bpp),
        );
    }

    /// Programs the source buffer size in pixels.
    pub fn set_source_buffer_dimensions(&self, width: u32, height: u32) {
        self.write(
            regs::source_buffer_dimension(self.sub_id),
            regs::buffer_dimension::encode(width, height),
        );
    }

    /// Programs the per-channel bit depths and bit positions of the source format.
    pub fn set_color_components(&self, bits: ColorComponents, shifts: ColorComponents) {
        let mut port = self.lock();
        port.write_u32(
            regs::color_component_bits(self.sub_id),
            bits.pack_masked(regs::color::BITS_FIELD_MASK),
        );
        port.write_u32(
            regs::color_component_shift(self.sub_id),
            shifts.pack_masked(regs::color::SHIFT_FIELD_MASK),
        );
    }

    /// Programs the position of the layer within the fetched frame.
    pub fn set_layer_offset(&self, x: u32, y: u32) {
        self.write(regs::layer_offset(self.sub_id), regs::layer_offset::encode(x, y));
    }

    /// Programs the clip window position and size.
    ///
    /// # Arguments
    ///
    /// * `x`, `y` - Top-left corner in pixels.
    /// * `width`, `height` - Size in pixels.
    pub fn set_clip_window(&self, x: u32, y: u32, width: u32, height: u32) {
        let mut port = self.lock();
        port.write_u32(
            regs::clip_window_offset(self.sub_id),
            regs::layer_offset::encode(x, y),
        );
        port.write_u32(
            regs::clip_window_dimensions(self.sub_id),
            regs::buffer_dimension::encode(width, height),
        );
    }

    /// Programs the color emitted outside the source buffer.
    pub fn set_constant_color(&self, r: u8, g: u8, b: u8, a: u8) {
        self.write(regs::constant_color(self.sub_id), regs::color::pack(r, g, b, a));
    }

    // ── Layer property ───────────────────────────────────────────────────────

    /// Enables fetching from the source buffer.
    pub fn enable_source_buffer(&self) {
        self.modify(regs::layer_property(self.sub_id), |val| {
            val | layer_property::SOURCE_BUFFER_ENABLE
        });
    }

    /// Disables fetching from the source buffer.
    pub fn disable_source_buffer(&self) {
        self.modify(regs::layer_property(self.sub_id), |val| {
            val & !layer_property::SOURCE_BUFFER_ENABLE
        });
    }

    /// Returns `true` if the source buffer is enabled.
    pub fn is_enabled(&self) -> bool {
        let val = self.lock().read_u32(regs::layer_property(self.sub_id));
        val & layer_property::SOURCE_BUFFER_ENABLE != 0
    }

    /// Enables the clip window.
    pub fn enable_clip_window(&self) {
        self.modify(regs::layer_property(self.sub_id), |val| {
            val | layer_property::CLIP_WINDOW_ENABLE
        });
    }

    /// Disables the clip window.
    pub fn disable_clip_window(&self) {
        self.modify(regs::layer_property(self.sub_id), |val| {
            val & !layer_property::CLIP_WINDOW_ENABLE
        });
    }

    // ── Soft state ───────────────────────────────────────────────────────────

    /// Returns the display stream this unit feeds.
    pub const fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    /// Routes this unit to `id`.
    pub const fn set_stream_id(&mut self, id: StreamId) {
        self.stream_id = id;
    }

    /// Routes this unit using a raw plane-source value.
    ///
    /// A value outside the known streams is a caller bug: it is reported and
    /// the current routing is kept.
    pub fn set_stream_id_raw(&mut self, raw: u32) {
        match StreamId::try_from(raw) {
            Ok(id) => self.stream_id = id,
            Err(err) => {
                tracing::warn!("{self}: contract violation: {err}, keeping {:?}", self.stream_id);
            }
        }
    }

    /// Excludes this unit from dynamic power/clock gating.
    pub const fn pin_off(&mut self) {
        self.pin_off = true;
    }

    /// Returns this unit to dynamic power/clock gating.
    pub const fn unpin_off(&mut self) {
        self.pin_off = false;
    }

    /// Returns `true` if the unit is pinned off.
    pub const fn is_pinned_off(&self) -> bool {
        self.pin_off
    }

    /// Binds the prefetch resolver in front of this unit.
    ///
    /// Only a non-owning handle is kept. Binding a handle whose companion is
    /// already gone is a caller bug: it is reported and the current binding
    /// is kept.
    pub fn bind_prefetch_companion(&mut self, companion: Weak<dyn PrefetchCompanion>) {
        let Some(live) = companion.upgrade() else {
            tracing::warn!("{self}: contract violation: binding a released prefetch companion");
            return;
        };
        tracing::debug!("{self} bound to prefetch companion {}", live.name());
        self.companion = Some(companion);
    }

    /// Returns the bound prefetch resolver if it is still alive.
    pub fn prefetch_companion(&self) -> Option<Arc<dyn PrefetchCompanion>> {
        self.companion.as_ref().and_then(Weak::upgrade)
    }

    // ── Port access ──────────────────────────────────────────────────────────

    /// Runs `f` on the register port while holding the unit's lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        f(&self.lock())
    }

    /// Consumes the controller and returns its register port.
    pub fn into_port(self) -> P {
        self.port.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
