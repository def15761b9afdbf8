//! Engine start-up settings.
//!
//! Settings are plain serde structs so an embedding app can keep them in a
//! JSON file next to its other preferences. Missing fields fall back to the
//! defaults below.
//!
//! ```json
//! {
//!   "filter": "Sepia Tone",
//!   "parameters": { "intensity": 0.5, "radius": 100.0, "scale": 5.0 },
//!   "mapping": "independent"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::params::{ParameterMapping, ParameterSet};
use crate::registry::{self, FilterDescriptor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Display name of the filter selected at start-up.
    pub filter: String,
    /// Initial slider positions; clamped when the engine is built.
    pub parameters: ParameterSet,
    pub mapping: ParameterMapping,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            filter: registry::default_filter().name().to_string(),
            parameters: ParameterSet::default(),
            mapping: ParameterMapping::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve [`filter`](Self::filter) against the registry.
    pub fn initial_filter(&self) -> Result<&'static FilterDescriptor, ConfigError> {
        registry::find_filter(&self.filter).ok_or_else(|| ConfigError::UnknownFilter(self.filter.clone()))
    }
}
