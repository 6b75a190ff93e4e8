#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, GroupArgs};

use crate::adapters::fleet::{FleetSettings, DEFAULT_FLEET_ENDPOINT, DEFAULT_TIMEOUT_SECS};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_groups_dir, Validate};
use std::path::{Path, PathBuf};

/// Effective settings after layering defaults, environment, config file and
/// command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub fleet_endpoint: String,
    pub groups_dir: PathBuf,
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fleet_endpoint: DEFAULT_FLEET_ENDPOINT.to_string(),
            groups_dir: PathBuf::from("."),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn fleet_settings(&self) -> FleetSettings {
        FleetSettings::from_config(self)
    }
}

impl ConfigProvider for Settings {
    fn fleet_endpoint(&self) -> &str {
        &self.fleet_endpoint
    }

    fn groups_dir(&self) -> &Path {
        &self.groups_dir
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.fleet_settings().validate()?;
        validate_groups_dir("groups_dir", &self.groups_dir.to_string_lossy())?;
        Ok(())
    }
}
