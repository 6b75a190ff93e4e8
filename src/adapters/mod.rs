// Adapters layer: concrete implementations of the domain ports (file system, fleet HTTP API).

pub mod fleet;
pub mod storage;
pub mod unit_file;

pub use fleet::{FleetEnv, FleetSettings, HttpFleetClient};
pub use storage::{LocalFileSystem, MemoryFileSystem};
