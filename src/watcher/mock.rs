//! In-memory mock filesystem for watcher tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use super::traits::FileSystem;

#[derive(Debug, Clone)]
struct MockFile {
    content: String,
    mtime: SystemTime,
}

/// In-memory filesystem for testing.
///
/// State is shared across clones so a test can hold one handle while the
/// watcher owns another and both observe the same deletions.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    files: Arc<Mutex<HashMap<PathBuf, MockFile>>>,
    directories: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content and a modification time of
    /// `mtime_secs` seconds past the epoch. Parent directories are created
    /// automatically.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>, mtime_secs: u64) {
        let path = path.as_ref().to_path_buf();

        let mut dirs = self.directories.lock().unwrap();
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() && !dirs.contains(&p.to_path_buf()) {
                dirs.push(p.to_path_buf());
            }
            parent = p.parent();
        }
        drop(dirs);

        self.files.lock().unwrap().insert(
            path,
            MockFile {
                content: content.into(),
                mtime: SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_secs),
            },
        );
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut dirs = self.directories.lock().unwrap();
        if !dirs.contains(&path) {
            dirs.push(path);
        }
    }

    /// True if the file is still present (i.e. the watcher has not deleted
    /// it).
    pub fn has_file(&self, path: impl AsRef<Path>) -> bool {
        self.files.lock().unwrap().contains_key(path.as_ref())
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|f| f.content.clone())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("file not found: {:?}", path),
                )
            })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || self.directories.lock().unwrap().contains(&path.to_path_buf())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.directories.lock().unwrap().contains(&path.to_path_buf()) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.parent().is_some_and(|parent| parent == path))
            .cloned()
            .collect())
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|f| f.mtime)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("file not found: {:?}", path),
                )
            })
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.files.lock().unwrap().remove(path).map(|_| ()).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }
}
