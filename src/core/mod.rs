pub mod controller;
pub mod loader;
pub mod slices;

pub use crate::domain::model::{Request, Unit, UnitStatus, Verb};
pub use crate::domain::ports::{ConfigProvider, DirEntry, FileSystem, FleetClient};
pub use crate::utils::error::Result;
