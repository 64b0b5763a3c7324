//! Fetch-unit variants.

use std::fmt;

use serde::Deserialize;

/// Role of a fetch unit within the display pipeline.
///
/// All variants share the register layout; the kind only tells callers what
/// the unit is wired to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchUnitKind {
    /// FetchDecode: full-featured fetch with decompression, feeds a plane.
    #[serde(alias = "fetchdecode")]
    Decode,
    /// FetchEco: companion fetch for the chroma plane of YUV formats.
    #[serde(alias = "fetcheco")]
    Eco,
    /// FetchLayer: multi-layer fetch (one layer per sub-unit).
    #[serde(alias = "fetchlayer")]
    Layer,
    /// FetchWarp: fetch with arbitrary warping support.
    #[serde(alias = "fetchwarp")]
    Warp,
}

impl FetchUnitKind {
    /// Every variant, in hardware enumeration order.
    pub const ALL: [Self; 4] = [Self::Decode, Self::Eco, Self::Layer, Self::Warp];

    /// Returns the hardware block name (e.g. `"fetchdecode"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Decode => "fetchdecode",
            Self::Eco => "fetcheco",
            Self::Layer => "fetchlayer",
            Self::Warp => "fetchwarp",
        }
    }
}

impl fmt::Display for FetchUnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
