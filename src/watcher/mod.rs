//! Snapshot directory watcher.
//!
//! The producer process dumps one file per snapshot instant into a mailbox
//! directory. The watcher discovers new files in modification-time order,
//! runs each through parse -> reconstruct exactly once, deletes the file,
//! and records its name so it is never retried. The directory is never a
//! durable log.
//!
//! The watcher exposes a single `poll_once` cycle instead of an internal
//! loop; the binary wraps it in an interruptible loop, and tests run a
//! bounded number of cycles.

pub mod mock;
mod traits;

pub use traits::{FileSystem, RealFs};

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::snapshot::parse_snapshot;
use crate::topology::{TreeGraph, reconstruct};

/// Unrecoverable watcher failure: the snapshot directory itself cannot be
/// listed. Per-file problems never surface here.
#[derive(Debug, Clone)]
pub enum WatchError {
    Dir(String),
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchError::Dir(msg) => write!(f, "snapshot directory error: {}", msg),
        }
    }
}

impl std::error::Error for WatchError {}

/// One consumed file's renderable result.
#[derive(Debug, Clone)]
pub struct Scene {
    /// File name the snapshot came from (already deleted from disk).
    pub file_name: String,
    /// Consumption time, seconds since the epoch.
    pub consumed_at: i64,
    pub node_count: usize,
    pub skipped_lines: usize,
    pub dangling: usize,
    /// `None` when the file was empty or nothing in it parsed.
    pub graph: Option<TreeGraph>,
}

/// Polls a directory for snapshot files and consumes each exactly once.
///
/// Owns the processed-name set: a name that has been consumed (or failed)
/// is never reprocessed within this watcher's lifetime, even if a file
/// with the same name reappears.
pub struct SnapshotWatcher<F: FileSystem> {
    fs: F,
    dir: PathBuf,
    prefix: String,
    processed: HashSet<String>,
}

impl<F: FileSystem> SnapshotWatcher<F> {
    pub fn new(fs: F, dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            fs,
            dir: dir.into(),
            prefix: prefix.into(),
            processed: HashSet::new(),
        }
    }

    /// Names consumed so far.
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Runs one scan-and-consume cycle.
    ///
    /// Returns the batch of scenes produced from files that were new this
    /// cycle, oldest first. An absent directory means the producer has not
    /// started yet and yields an empty batch; a directory that exists but
    /// cannot be listed is fatal.
    pub fn poll_once(&mut self) -> Result<Vec<Scene>, WatchError> {
        if !self.fs.exists(&self.dir) {
            debug!("snapshot directory {:?} not yet created", self.dir);
            return Ok(Vec::new());
        }

        let batch = self.scan_new()?;
        let mut scenes = Vec::with_capacity(batch.len());
        for path in batch {
            scenes.push(self.consume(&path));
        }
        Ok(scenes)
    }

    /// Lists unprocessed snapshot files, oldest modification time first to
    /// preserve emission order.
    fn scan_new(&self) -> Result<Vec<PathBuf>, WatchError> {
        let entries = self
            .fs
            .read_dir(&self.dir)
            .map_err(|e| WatchError::Dir(format!("{:?}: {}", self.dir, e)))?;

        let mut new_files: Vec<(std::time::SystemTime, PathBuf)> = Vec::new();
        for path in entries {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with(&self.prefix) || self.processed.contains(name) {
                continue;
            }
            match self.fs.modified(&path) {
                Ok(mtime) => new_files.push((mtime, path)),
                // Vanished between list and stat; the next cycle sees it if
                // it comes back.
                Err(e) => debug!("could not stat {:?}: {}", path, e),
            }
        }

        new_files.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        Ok(new_files.into_iter().map(|(_, path)| path).collect())
    }

    /// Consumes one file: read, parse, reconstruct, delete, mark processed.
    ///
    /// Failures are per-file: an unreadable or unparsable file still gets
    /// deleted and marked, so it can never stall the mailbox.
    fn consume(&mut self, path: &Path) -> Scene {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let content = match self.fs.read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} vanished before read", file_name);
                String::new()
            }
            Err(e) => {
                warn!("failed to read {}: {}", file_name, e);
                String::new()
            }
        };

        let snapshot = parse_snapshot(&content);
        for skipped in &snapshot.skipped {
            warn!("{}: skipped {}", file_name, skipped);
        }

        let graph = reconstruct(&snapshot);
        let dangling = graph.as_ref().map_or(0, |g| g.dangling.len());
        if let Some(g) = &graph {
            for (parent, child) in &g.dangling {
                warn!(
                    "{}: node {} references missing child {}",
                    file_name, parent, child
                );
            }
        }

        if let Err(e) = self.fs.remove_file(path)
            && e.kind() != io::ErrorKind::NotFound
        {
            warn!("failed to delete {}: {}", file_name, e);
        }
        self.processed.insert(file_name.clone());

        Scene {
            file_name,
            consumed_at: chrono::Utc::now().timestamp(),
            node_count: snapshot.len(),
            skipped_lines: snapshot.skipped.len(),
            dangling,
            graph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockFs;
    use super::*;

    fn watcher(fs: &MockFs) -> SnapshotWatcher<MockFs> {
        SnapshotWatcher::new(fs.clone(), "/snaps", "tree_")
    }

    #[test]
    fn test_missing_directory_is_not_fatal() {
        let fs = MockFs::new();
        let mut w = watcher(&fs);
        assert!(w.poll_once().unwrap().is_empty());
    }

    #[test]
    fn test_consumes_in_mtime_order() {
        let fs = MockFs::new();
        // Insertion order deliberately differs from mtime order.
        fs.add_file("/snaps/tree_2.txt", "2 0 BLACK\n", 300);
        fs.add_file("/snaps/tree_0.txt", "0 0 BLACK\n", 100);
        fs.add_file("/snaps/tree_1.txt", "1 0 BLACK\n", 200);

        let scenes = watcher(&fs).poll_once().unwrap();
        let names: Vec<&str> = scenes.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["tree_0.txt", "tree_1.txt", "tree_2.txt"]);
    }

    #[test]
    fn test_consumed_file_is_deleted_and_not_reprocessed() {
        let fs = MockFs::new();
        fs.add_file("/snaps/tree_0.txt", "10 5 RED\n", 100);

        let mut w = watcher(&fs);
        let scenes = w.poll_once().unwrap();
        assert_eq!(scenes.len(), 1);
        assert!(!fs.has_file("/snaps/tree_0.txt"));

        // A rescan finds nothing.
        assert!(w.poll_once().unwrap().is_empty());
        assert_eq!(w.processed_count(), 1);
    }

    #[test]
    fn test_reappearing_name_is_never_rendered_twice() {
        let fs = MockFs::new();
        fs.add_file("/snaps/tree_0.txt", "10 5 RED\n", 100);

        let mut w = watcher(&fs);
        w.poll_once().unwrap();

        // Same name reappears with identical content; membership is by
        // name, so it is ignored (and left on disk).
        fs.add_file("/snaps/tree_0.txt", "10 5 RED\n", 500);
        assert!(w.poll_once().unwrap().is_empty());
        assert!(fs.has_file("/snaps/tree_0.txt"));
    }

    #[test]
    fn test_ignores_files_without_prefix() {
        let fs = MockFs::new();
        fs.add_file("/snaps/tree_0.txt", "10 5 RED\n", 100);
        fs.add_file("/snaps/readme.txt", "not a snapshot", 50);

        let scenes = watcher(&fs).poll_once().unwrap();
        assert_eq!(scenes.len(), 1);
        assert!(fs.has_file("/snaps/readme.txt"));
    }

    #[test]
    fn test_unparsable_file_is_still_consumed() {
        let fs = MockFs::new();
        fs.add_file("/snaps/tree_0.txt", "garbage line\nmore garbage\n", 100);

        let mut w = watcher(&fs);
        let scenes = w.poll_once().unwrap();

        assert_eq!(scenes.len(), 1);
        assert!(scenes[0].graph.is_none());
        assert_eq!(scenes[0].skipped_lines, 2);
        assert!(!fs.has_file("/snaps/tree_0.txt"));
        assert_eq!(w.processed_count(), 1);
    }

    #[test]
    fn test_partially_written_file_keeps_valid_nodes() {
        let fs = MockFs::new();
        fs.add_file("/snaps/tree_0.txt", "10 5 RED\n20 -2 BLA", 100);

        let scenes = watcher(&fs).poll_once().unwrap();
        let scene = &scenes[0];
        assert_eq!(scene.node_count, 2); // "BLA" is an Other color, not malformed
        assert_eq!(scene.skipped_lines, 0);
    }

    #[test]
    fn test_scene_reports_dangling_references() {
        let fs = MockFs::new();
        fs.add_file("/snaps/tree_0.txt", "10 5 RED L20 R77\n20 -2 BLACK\n", 100);

        let scenes = watcher(&fs).poll_once().unwrap();
        assert_eq!(scenes[0].dangling, 1);
    }

    #[test]
    fn test_batch_mixes_old_and_new_files_across_cycles() {
        let fs = MockFs::new();
        fs.add_file("/snaps/tree_0.txt", "1 0 RED\n", 100);

        let mut w = watcher(&fs);
        assert_eq!(w.poll_once().unwrap().len(), 1);

        fs.add_file("/snaps/tree_1.txt", "1 0 RED\n", 200);
        fs.add_file("/snaps/tree_2.txt", "1 0 RED\n", 150);
        let scenes = w.poll_once().unwrap();
        let names: Vec<&str> = scenes.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["tree_2.txt", "tree_1.txt"]);
    }

    #[test]
    fn test_real_fs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree_0.txt");
        std::fs::write(&path, "10 5 RED L20 R30\n20 -2 BLACK\n30 7 BLACK\n").unwrap();

        let mut w = SnapshotWatcher::new(RealFs::new(), dir.path(), "tree_");
        let scenes = w.poll_once().unwrap();

        assert_eq!(scenes.len(), 1);
        let graph = scenes[0].graph.as_ref().unwrap();
        assert_eq!(graph.roots, vec![10]);
        assert!(!path.exists());
    }
}
