use crate::domain::ports::{DirEntry, FileSystem};
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Disk-backed file system rooted at the groups directory.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    base_path: PathBuf,
}

impl LocalFileSystem {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl FileSystem for LocalFileSystem {
    async fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let full_path = self.base_path.join(path);
        let mut reader = tokio::fs::read_dir(&full_path).await?;

        let mut entries = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            let file_type = entry.file_type().await?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir: file_type.is_dir(),
            });
        }

        // read_dir order is platform dependent
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        tokio::fs::read(full_path).await
    }
}

/// In-memory file system. Directories exist implicitly as parents of
/// written files; listings come back in name order.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_file(&self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>) -> io::Result<()> {
        let path = normalize(path.as_ref());
        if path.as_os_str().is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "empty file path"));
        }

        let mut files = self.files.write().map_err(poisoned)?;
        if files.keys().any(|file| file != &path && file.starts_with(&path)) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a directory", path.display()),
            ));
        }
        if let Some(parent) = path.ancestors().skip(1).find(|dir| files.contains_key(*dir)) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} is a file", parent.display()),
            ));
        }

        files.insert(path, data.into());
        Ok(())
    }
}

impl FileSystem for MemoryFileSystem {
    async fn list_directory(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let dir = normalize(path);
        let files = self.files.read().map_err(poisoned)?;

        let mut children: BTreeMap<String, bool> = BTreeMap::new();
        for file in files.keys() {
            let Ok(rest) = file.strip_prefix(&dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            let is_dir = components.next().is_some();
            *children.entry(name).or_insert(false) |= is_dir;
        }

        if children.is_empty() {
            let kind = if files.contains_key(&dir) {
                io::ErrorKind::InvalidInput
            } else {
                io::ErrorKind::NotFound
            };
            return Err(io::Error::new(
                kind,
                format!("open {}: no such directory", dir.display()),
            ));
        }

        Ok(children
            .into_iter()
            .map(|(name, is_dir)| DirEntry { name, is_dir })
            .collect())
    }

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        let path = normalize(path);
        let files = self.files.read().map_err(poisoned)?;
        files.get(&path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("open {}: no such file", path.display()),
            )
        })
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir | Component::RootDir))
        .collect()
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> io::Error {
    io::Error::other("memory file system lock poisoned")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_memory_listing_marks_directories() {
        let fs = MemoryFileSystem::new();
        fs.write_file("group/b.service", "b").unwrap();
        fs.write_file("group/a.service", "a").unwrap();
        fs.write_file("group/nested/README.md", "nope").unwrap();

        let entries = fs.list_directory(Path::new("group")).await.unwrap();

        assert_eq!(
            entries,
            vec![
                DirEntry { name: "a.service".to_string(), is_dir: false },
                DirEntry { name: "b.service".to_string(), is_dir: false },
                DirEntry { name: "nested".to_string(), is_dir: true },
            ]
        );
    }

    #[tokio::test]
    async fn test_memory_missing_paths_are_not_found() {
        let fs = MemoryFileSystem::new();
        fs.write_file("group/a.service", "a").unwrap();

        let err = fs.list_directory(Path::new("other")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        let err = fs.read_file(Path::new("group/b.service")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        assert_eq!(fs.read_file(Path::new("./group/a.service")).await.unwrap(), b"a");
    }

    #[tokio::test]
    async fn test_memory_listing_a_file_is_not_not_found() {
        let fs = MemoryFileSystem::new();
        fs.write_file("group/a.service", "a").unwrap();

        let err = fs.list_directory(Path::new("group/a.service")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(fs.write_file("group", "x").is_err());
    }

    #[tokio::test]
    async fn test_memory_cannot_write_below_a_file() {
        let fs = MemoryFileSystem::new();
        fs.write_file("group/a.service", "a").unwrap();

        let err = fs.write_file("group/a.service/b", "b").unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs.read_file(Path::new("group/a.service")).await.unwrap(), b"a");
        let entries = fs.list_directory(Path::new("group")).await.unwrap();
        assert_eq!(
            entries,
            vec![DirEntry { name: "a.service".to_string(), is_dir: false }]
        );
    }

    #[tokio::test]
    async fn test_local_listing_is_sorted_and_rooted() {
        let temp_dir = TempDir::new().unwrap();
        let group = temp_dir.path().join("web");
        std::fs::create_dir_all(group.join("docs")).unwrap();
        std::fs::write(group.join("web-2.service"), "two").unwrap();
        std::fs::write(group.join("web-1.service"), "one").unwrap();

        let fs = LocalFileSystem::new(temp_dir.path());
        let entries = fs.list_directory(Path::new("web")).await.unwrap();

        let listed: Vec<(&str, bool)> = entries.iter().map(|e| (e.name.as_str(), e.is_dir)).collect();
        assert_eq!(
            listed,
            vec![("docs", true), ("web-1.service", false), ("web-2.service", false)]
        );
        assert_eq!(fs.read_file(Path::new("web/web-1.service")).await.unwrap(), b"one");
    }

    #[tokio::test]
    async fn test_local_missing_directory_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new(temp_dir.path());

        let err = fs.list_directory(Path::new("missing")).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
