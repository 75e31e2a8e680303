//! rbscope - Red-Black tree snapshot visualizer library.
//!
//! An external process dumps text snapshots of a Red-Black tree (augmented
//! with lazily-propagated deltas) into a mailbox directory. This library
//! provides the pipeline that consumes them:
//! - `snapshot` - parses one dump file into a node collection
//! - `topology` - reconstructs parent/child structure and lays it out
//! - `watcher` - polls the directory and consumes each file exactly once
//! - `tui` - interactive terminal rendering of the reconstructed trees

pub mod snapshot;
pub mod topology;
pub mod tui;
pub mod util;
pub mod watcher;
