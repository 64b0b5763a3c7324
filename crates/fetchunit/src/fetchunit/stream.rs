//! Display stream routing.

use serde::Deserialize;

use crate::common::InvalidStreamId;

/// Display stream a fetch unit's output is routed to.
///
/// The raw encoding matches the plane-source values used by the pipeline
/// manager: 0 and 1 select a display stream, 2 disconnects the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamId {
    /// Routed to display stream 0.
    Stream0 = 0,
    /// Routed to display stream 1.
    Stream1 = 1,
    /// Not routed to any stream.
    #[default]
    Disabled = 2,
}

impl StreamId {
    /// Returns `true` if the unit feeds a display stream.
    pub const fn is_routed(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl TryFrom<u32> for StreamId {
    type Error = InvalidStreamId;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Stream0),
            1 => Ok(Self::Stream1),
            2 => Ok(Self::Disabled),
            other => Err(InvalidStreamId(other)),
        }
    }
}

impl From<StreamId> for u32 {
    fn from(id: StreamId) -> Self {
        id as Self
    }
}
