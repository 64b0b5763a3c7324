//! Fetch-unit configuration.
//!
//! This module describes which fetch engines exist and how they start out.
//! It provides:
//! 1. **Defaults:** Baseline values for optional fields.
//! 2. **Structures:** One [`FetchUnitConfig`] per physical fetch engine, grouped in a [`Config`].
//! 3. **Loading:** JSON parsing from text or file, followed by validation.
//!
//! ```
//! use dpu_fetchunit::config::Config;
//! use dpu_fetchunit::fetchunit::{FetchUnitKind, StreamId};
//!
//! let json = r#"{
//!     "units": [
//!         { "kind": "decode", "id": 0, "stream": "stream0" },
//!         { "kind": "eco", "id": 0 },
//!         { "kind": "layer", "id": 0, "sub_id": 3 }
//!     ]
//! }"#;
//!
//! let config = Config::from_json(json)?;
//! assert_eq!(config.units.len(), 3);
//! assert_eq!(config.units[0].stream, StreamId::Stream0);
//! assert_eq!(config.units[1].kind, FetchUnitKind::Eco);
//! assert_eq!(config.units[2].sub_id, 3);
//! # Ok::<(), dpu_fetchunit::common::ConfigError>(())
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::ConfigError;
use crate::fetchunit::{FetchUnitKind, StreamId};
use crate::regs::MAX_SUB_UNITS;

/// Default values for optional configuration fields.
mod defaults {
    use crate::fetchunit::StreamId;

    /// Register sub-unit used by single-layer fetch units.
    pub const SUB_ID: u32 = 0;

    /// Units start disconnected until the pipeline routes them.
    pub const STREAM: StreamId = StreamId::Disabled;
}

/// Set of fetch engines managed together (one DPU).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// One entry per physical fetch engine.
    #[serde(default)]
    pub units: Vec<FetchUnitConfig>,
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the validation
    /// errors of [`Config::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Config::from_json`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Checks that every sub-unit index fits the register map and that no
    /// fetch engine is described twice.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError::SubIdOutOfRange`] or
    /// [`ConfigError::Duplicate`] found, in entry order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for unit in &self.units {
            unit.validate()?;
            if !seen.insert((unit.kind, unit.id)) {
                return Err(ConfigError::Duplicate {
                    kind: unit.kind,
                    id: unit.id,
                });
            }
        }
        Ok(())
    }
}

/// Description of one fetch engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FetchUnitConfig {
    /// Variant of the engine.
    pub kind: FetchUnitKind,

    /// Physical block index.
    pub id: u32,

    /// Register sub-unit the controller drives.
    #[serde(default = "FetchUnitConfig::default_sub_id")]
    pub sub_id: u32,

    /// Display stream the unit is routed to at start-up.
    #[serde(default = "FetchUnitConfig::default_stream")]
    pub stream: StreamId,
}

impl FetchUnitConfig {
    /// Creates an entry with default sub-unit and routing.
    pub const fn new(kind: FetchUnitKind, id: u32) -> Self {
        Self {
            kind,
            id,
            sub_id: defaults::SUB_ID,
            stream: defaults::STREAM,
        }
    }

    /// Returns the default sub-unit index.
    const fn default_sub_id() -> u32 {
        defaults::SUB_ID
    }

    /// Returns the default stream routing.
    const fn default_stream() -> StreamId {
        defaults::STREAM
    }

    /// Checks that the sub-unit index fits the register map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SubIdOutOfRange`] for an index of
    /// [`MAX_SUB_UNITS`] or more.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sub_id >= MAX_SUB_UNITS {
            return Err(ConfigError::SubIdOutOfRange {
                kind: self.kind,
                id: self.id,
                sub_id: self.sub_id,
                max: MAX_SUB_UNITS - 1,
            });
        }
        Ok(())
    }
}
