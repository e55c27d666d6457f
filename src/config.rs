use serde::{Deserialize, Serialize};

use crate::conjunction::screening::ScreeningConfig;
use crate::error::{Error, Result};
use crate::lifetime::LifetimeConfig;
use crate::sim::runner::PropagationConfig;
use crate::station_keeping::StationKeepingConfig;

/// Engine-wide settings. Every section falls back to its defaults when
/// omitted from a serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub propagation: PropagationConfig,
    pub lifetime: LifetimeConfig,
    pub screening: ScreeningConfig,
    pub station_keeping: StationKeepingConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.propagation.validate()?;
        self.lifetime.validate()?;
        self.screening.validate()?;
        self.station_keeping.validate()?;
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
