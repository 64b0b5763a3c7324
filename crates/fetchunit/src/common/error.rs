//! Error definitions.
//!
//! Register programming itself has no error path: register I/O is assumed to
//! succeed and contract violations are reported through `tracing` and
//! ignored. The types here cover the two places where a recoverable error
//! does exist:
//! 1. **Configuration:** loading and validating a fetch-unit description.
//! 2. **Raw conversion:** turning an untyped stream id into a [`StreamId`].
//!
//! [`StreamId`]: crate::fetchunit::StreamId

use std::path::PathBuf;

use thiserror::Error;

use crate::fetchunit::FetchUnitKind;

/// Errors raised while loading or validating fetch-unit configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read fetch-unit config {path}: {source}")]
    Io {
        /// Path that was opened.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid JSON for the expected schema.
    #[error("malformed fetch-unit config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A sub-unit index does not fit the register map.
    #[error("{kind}{id}: sub-unit index {sub_id} out of range (max {max})")]
    SubIdOutOfRange {
        /// Variant of the offending unit.
        kind: FetchUnitKind,
        /// Block index of the offending unit.
        id: u32,
        /// Requested sub-unit index.
        sub_id: u32,
        /// Largest valid sub-unit index.
        max: u32,
    },

    /// The same physical fetch engine is described twice.
    #[error("{kind}{id} configured more than once")]
    Duplicate {
        /// Variant of the duplicated unit.
        kind: FetchUnitKind,
        /// Block index of the duplicated unit.
        id: u32,
    },
}

/// A raw stream id outside the set of display streams a fetch unit can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid display stream id {0}")]
pub struct InvalidStreamId(pub u32);
