//! Service configuration: which regions, pollen kinds and days to track.
//!
//! Stored as a plain JSON object on disk; every field except
//! `partregion_ids` is optional:
//! ```json
//! {
//!   "partregion_ids": [11, 50],
//!   "pollen": ["birke", "graeser"],
//!   "days": ["today", "tomorrow"],
//!   "url": "https://opendata.dwd.de/climate_environment/health/alerts/s31fg.json",
//!   "timeout_secs": 30,
//!   "refresh_interval_secs": 3600
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::feed::DWD_POLLEN_URL;
use crate::pollen::{DayOffset, PollenType};
use crate::region::RegionId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollenConfig {
    #[serde(default)]
    pub partregion_ids: Vec<RegionId>,
    #[serde(default = "default_pollen")]
    pub pollen: Vec<PollenType>,
    #[serde(default = "default_days")]
    pub days: Vec<DayOffset>,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_pollen() -> Vec<PollenType> {
    PollenType::ALL.to_vec()
}

fn default_days() -> Vec<DayOffset> {
    DayOffset::ALL.to_vec()
}

fn default_url() -> String {
    DWD_POLLEN_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_refresh_interval_secs() -> u64 {
    3600
}

impl Default for PollenConfig {
    fn default() -> Self {
        Self {
            partregion_ids: Vec::new(),
            pollen: default_pollen(),
            days: default_days(),
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl PollenConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks the settings a refresh cycle depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partregion_ids.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one partregion id must be tracked".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tracked_regions(&self) -> BTreeSet<RegionId> {
        self.partregion_ids.iter().copied().collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}
