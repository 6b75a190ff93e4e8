use crate::domain::model::UnitStatus;
use crate::utils::error::FleetError;
use async_trait::async_trait;
use std::io;
use std::path::Path;

/// Entry returned by [`FileSystem::list_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read access to the tree that holds group directories.
///
/// Errors keep their `io::ErrorKind`, so a missing path reports `NotFound`.
pub trait FileSystem: Send + Sync {
    fn list_directory(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = io::Result<Vec<DirEntry>>> + Send;
    fn read_file(&self, path: &Path)
        -> impl std::future::Future<Output = io::Result<Vec<u8>>> + Send;
}

/// Single-unit operations offered by the cluster scheduler.
#[async_trait]
pub trait FleetClient: Send + Sync {
    /// Loads the unit definition without running it.
    async fn submit(&self, name: &str, content: &str) -> Result<(), FleetError>;
    async fn start(&self, name: &str) -> Result<(), FleetError>;
    async fn stop(&self, name: &str) -> Result<(), FleetError>;
    /// Removes the unit definition from the cluster.
    async fn destroy(&self, name: &str) -> Result<(), FleetError>;
    async fn get_status(&self, name: &str) -> Result<UnitStatus, FleetError>;
}

pub trait ConfigProvider: Send + Sync {
    fn fleet_endpoint(&self) -> &str;
    fn groups_dir(&self) -> &Path;
    fn timeout_secs(&self) -> u64;
}
