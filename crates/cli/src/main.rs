//! DPU fetch-unit command-line front-end.
//!
//! This binary exposes the fetch-unit library for bring-up and debugging. It provides:
//! 1. **Geometry:** Print the burst length, base address and stride derived for a source buffer.
//! 2. **Program:** Run the plane programming sequence against simulated registers and dump them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dpu_fetchunit::config::{Config, FetchUnitConfig};
use dpu_fetchunit::geometry::{self, TileLayout};
use dpu_fetchunit::regs;
use dpu_fetchunit::soc::RegisterFile;
use dpu_fetchunit::{DmaAddr, FetchUnit, FetchUnitKind};

#[derive(Parser, Debug)]
#[command(
    name = "fetchunit",
    author,
    version,
    about = "DPU fetch-unit geometry and register programming",
    long_about = "Compute fetch geometry for a source buffer, or program simulated fetch-unit registers and dump them.\n\nExamples:\n  fetchunit geometry --width 64 --bpp 32 --base-addr 0x1000 --tile-width 16 --tile-height 16 --x-offset 20 --y-offset 20 --prefetch\n  fetchunit program --config units.json --width 1920 --height 1080 --base-addr 0x8000_0000"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the geometry derived for a source buffer.
    Geometry(BufferArgs),

    /// Program simulated fetch units for a source buffer and dump their registers.
    Program {
        /// Fetch-unit configuration (JSON). Defaults to a single fetchdecode0.
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        buffer: BufferArgs,
    },
}

/// Description of the source buffer to fetch.
#[derive(Args, Debug, Clone, Copy)]
struct BufferArgs {
    /// Line width in pixels (chroma bytes per line for fetcheco).
    #[arg(long)]
    width: u32,

    /// Number of lines.
    #[arg(long, default_value_t = 1)]
    height: u32,

    /// Bits per pixel.
    #[arg(long, default_value_t = 32)]
    bpp: u32,

    /// Bus address of the buffer (decimal or 0x-prefixed hex).
    #[arg(long, value_parser = parse_addr)]
    base_addr: u64,

    /// Line stride in bytes used without prefetch. Defaults to width * bpp / 8.
    #[arg(long)]
    stride: Option<u32>,

    /// PRG x offset in pixels.
    #[arg(long, default_value_t = 0)]
    x_offset: u32,

    /// PRG y offset in lines.
    #[arg(long, default_value_t = 0)]
    y_offset: u32,

    /// Tile width in pixels (0 for a linear buffer).
    #[arg(long, default_value_t = 0)]
    tile_width: u32,

    /// Tile height in lines.
    #[arg(long, default_value_t = 0)]
    tile_height: u32,

    /// The buffer is read through a prefetch resolver.
    #[arg(long)]
    prefetch: bool,
}

impl BufferArgs {
    fn addr(&self) -> DmaAddr {
        DmaAddr::new(self.base_addr)
    }

    fn stride(&self) -> Result<u32> {
        match self.stride {
            Some(stride) => Ok(stride),
            None => self.width.checked_mul(self.bpp / 8).with_context(|| {
                format!("default stride for width {} at {} bpp exceeds 32 bits", self.width, self.bpp)
            }),
        }
    }
}

/// Parses an address given in decimal or `0x` hex, with optional `_` separators.
fn parse_addr(s: &str) -> Result<u64, String> {
    let clean = s.replace('_', "");
    let parsed = match clean.strip_prefix("0x").or_else(|| clean.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => clean.parse(),
    };
    parsed.map_err(|e| format!("invalid address {s:?}: {e}"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Geometry(buffer) => cmd_geometry(&buffer)?,
        Commands::Program { config, buffer } => cmd_program(config.as_deref(), &buffer)?,
    }

    Ok(())
}

/// Prints burst length, programmed base address and stride for `buf`.
fn cmd_geometry(buf: &BufferArgs) -> Result<()> {
    let tile = TileLayout::new(buf.tile_width, buf.tile_height);
    let burst = geometry::burst_length(buf.x_offset, buf.tile_width, buf.bpp, buf.addr(), buf.prefetch);
    let addr = geometry::base_address(buf.width, buf.x_offset, buf.y_offset, tile, buf.bpp, buf.addr());
    let stride = geometry::source_stride(
        buf.width,
        buf.x_offset,
        buf.tile_width,
        buf.bpp,
        buf.stride()?,
        buf.addr(),
        buf.prefetch,
    );

    println!("burst length : {burst} ({} bytes)", burst * geometry::BURST_UNIT);
    println!("base address : {addr}");
    println!("stride       : {stride} bytes");
    Ok(())
}

/// Programs every configured unit against its own simulated register file.
fn cmd_program(config: Option<&Path>, buf: &BufferArgs) -> Result<()> {
    let config = match config {
        Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config {
            units: vec![FetchUnitConfig::new(FetchUnitKind::Decode, 0)],
        },
    };
    tracing::debug!("programming {} fetch unit(s)", config.units.len());

    for entry in &config.units {
        let unit = FetchUnit::from_config(entry, RegisterFile::new());
        program(&unit, buf)?;

        println!("{unit} (sub-unit {}, {:?})", unit.sub_id(), unit.stream_id());
        let sub_id = unit.sub_id();
        for (offset, val) in unit.into_port().dump() {
            println!("  {offset:#06x} {:<28} {val:#010x}", register_name(offset, sub_id));
        }
    }

    Ok(())
}

/// Runs the plane programming sequence on `unit`.
fn program(unit: &FetchUnit<RegisterFile>, buf: &BufferArgs) -> Result<()> {
    let stride = buf.stride()?;
    unit.set_shadow_enable(true);
    unit.set_base_address(
        buf.width,
        buf.x_offset,
        buf.y_offset,
        buf.tile_width,
        buf.tile_height,
        buf.bpp,
        buf.addr(),
    );
    unit.set_source_stride(
        buf.width,
        buf.x_offset,
        buf.tile_width,
        buf.bpp,
        stride,
        buf.addr(),
        buf.prefetch,
    );
    unit.set_burst_length(buf.x_offset, buf.tile_width, buf.bpp, buf.addr(), buf.prefetch);
    unit.set_source_bits_per_pixel(buf.bpp);
    unit.set_source_buffer_dimensions(buf.width, buf.height);
    unit.enable_source_buffer();
    Ok(())
}

/// Returns a display name for the register at `offset` of sub-unit `sub_id`.
fn register_name(offset: u64, sub_id: u32) -> &'static str {
    let named: [(u64, &'static str); 12] = [
        (regs::STATIC_CONTROL, "StaticControl"),
        (regs::BURST_BUFFER_MANAGEMENT, "BurstBufferManagement"),
        (regs::base_address(sub_id), "BaseAddress"),
        (regs::source_buffer_attributes(sub_id), "SourceBufferAttributes"),
        (regs::source_buffer_dimension(sub_id), "SourceBufferDimension"),
        (regs::color_component_bits(sub_id), "ColorComponentBits"),
        (regs::color_component_shift(sub_id), "ColorComponentShift"),
        (regs::layer_offset(sub_id), "LayerOffset"),
        (regs::clip_window_offset(sub_id), "ClipWindowOffset"),
        (regs::clip_window_dimensions(sub_id), "ClipWindowDimensions"),
        (regs::constant_color(sub_id), "ConstantColor"),
        (regs::layer_property(sub_id), "LayerProperty"),
    ];
    named
        .iter()
        .find(|(off, _)| *off == offset)
        .map_or("?", |&(_, name)| name)
}
