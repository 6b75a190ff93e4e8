use crate::domain::model::{Request, Unit};
use crate::domain::ports::FileSystem;
use crate::utils::error::{ControllerError, Result};
use std::io;
use std::path::Path;

/// Builds a request from the unit files of `request.group`.
///
/// Only direct children that are files become units; subdirectories are
/// skipped without being read. Units are appended in listing order and the
/// slice IDs are carried over. An empty group leaves the request as is.
pub async fn load_group<F: FileSystem>(fs: &F, request: &Request) -> Result<Request> {
    if request.group.is_empty() {
        return Ok(request.clone());
    }

    let dir = Path::new(&request.group);
    let entries = fs
        .list_directory(dir)
        .await
        .map_err(|source| ControllerError::DirectoryNotFound {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut units = request.units.clone();
    for entry in entries {
        if entry.is_dir {
            tracing::debug!("Skipping directory {} in group {}", entry.name, request.group);
            continue;
        }

        let path = dir.join(&entry.name);
        let bytes = match fs.read_file(&path).await {
            Ok(bytes) => bytes,
            Err(source) => return Err(ControllerError::FileReadFailure { path, source }),
        };
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                return Err(ControllerError::FileReadFailure {
                    path,
                    source: io::Error::new(io::ErrorKind::InvalidData, e),
                })
            }
        };

        tracing::debug!("Loaded unit {} ({} bytes)", entry.name, content.len());
        units.push(Unit::new(entry.name, content));
    }

    if units.is_empty() {
        tracing::warn!("Group {} contains no unit files", request.group);
    }

    Ok(Request {
        group: request.group.clone(),
        slice_ids: request.slice_ids.clone(),
        units,
    })
}
