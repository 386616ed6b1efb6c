//! File access used by the reconciler.
//!
//! The zone file and the backup directory are the only external state the
//! reconciler touches, and it reaches both through [`ZoneStore`].

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Byte-level read/write access to files.
pub trait ZoneStore: Send + Sync {
    /// Read the whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate the file and write `contents`. Returns once the
    /// data has reached stable storage.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskStore;

impl ZoneStore for DiskStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(contents)?;
        file.sync_all()
    }
}

/// In-memory file system.
///
/// Writes only succeed inside directories registered with
/// [`MemoryStore::add_dir`] (or implied by [`MemoryStore::insert`]), which
/// mirrors a missing backup directory on disk. Paths can also be marked
/// read-only to fail writes to an existing file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    read_only: HashSet<PathBuf>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory so files can be written in it.
    pub fn add_dir(&self, dir: impl Into<PathBuf>) {
        self.lock().dirs.insert(dir.into());
    }

    /// Seed a file (and its parent directory).
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let path = path.into();
        let mut inner = self.lock();
        if let Some(parent) = path.parent() {
            inner.dirs.insert(parent.to_path_buf());
        }
        inner.files.insert(path, contents.into());
    }

    /// Make writes to `path` fail with `PermissionDenied`.
    pub fn set_read_only(&self, path: impl Into<PathBuf>) {
        self.lock().read_only.insert(path.into());
    }

    /// Current content of a file, if it exists.
    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.lock().files.get(path).cloned()
    }

    /// Paths of all files under `dir`, sorted.
    pub fn files_in(&self, dir: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .lock()
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A panic while holding the lock cannot leave the maps half-updated.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ZoneStore for MemoryStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.lock().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such file", path.display()),
            )
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut inner = self.lock();
        if inner.read_only.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{}: read-only", path.display()),
            ));
        }
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        if !inner.dirs.contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: no such directory", parent.display()),
            ));
        }
        inner.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disk_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zone");
        DiskStore.write(&path, b"www\tIN\tA\t1.2.3.4\n").unwrap();
        assert_eq!(DiskStore.read(&path).unwrap(), b"www\tIN\tA\t1.2.3.4\n");
    }

    #[test]
    fn test_disk_store_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zone");
        std::fs::write(&path, "www\tIN\tA\t192.0.2.1\nwww\tIN\tA\t192.0.2.2\n").unwrap();

        DiskStore.write(&path, b"www\tIN\tA\t10.0.0.1\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "www\tIN\tA\t10.0.0.1\n"
        );
    }

    #[test]
    fn test_disk_store_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("zone");
        let err = DiskStore.write(&path, b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_memory_store_requires_dir() {
        let store = MemoryStore::new();
        let err = store.write(Path::new("/backups/zone.1"), b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        store.add_dir("/backups");
        store.write(Path::new("/backups/zone.1"), b"x").unwrap();
        assert_eq!(store.get(Path::new("/backups/zone.1")).unwrap(), b"x");
        assert_eq!(store.files_in(Path::new("/backups")).len(), 1);
    }

    #[test]
    fn test_memory_store_read_only() {
        let store = MemoryStore::new();
        store.insert("/zones/db.example", "old");
        store.set_read_only("/zones/db.example");
        let err = store.write(Path::new("/zones/db.example"), b"new").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(store.get(Path::new("/zones/db.example")).unwrap(), b"old");
    }
}
