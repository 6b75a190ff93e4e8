pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FleetEnv, FleetSettings, HttpFleetClient, LocalFileSystem, MemoryFileSystem};
pub use config::Settings;
pub use crate::core::{controller::Controller, loader::load_group};
pub use domain::model::{MachineState, Request, Unit, UnitStatus, Verb};
pub use utils::error::{ControllerError, FleetError, Result};
