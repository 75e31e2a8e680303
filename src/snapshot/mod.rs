//! Snapshot model and parser.
//!
//! A snapshot is one point-in-time text dump of all nodes in the external
//! tree, one node per line. The parser is a pure function over the file
//! content so it can be tested with string inputs.

mod parser;

pub use parser::{LineError, parse_snapshot};

/// Node color as carried on the wire.
///
/// `RED` and `BLACK` are the values the producer emits; anything else is
/// preserved in `Other` and rendered with a fallback style rather than
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeColor {
    Red,
    Black,
    Other(String),
}

impl NodeColor {
    /// Classifies a color token. Case-sensitive: the producer always emits
    /// upper-case literals.
    pub fn from_token(token: &str) -> Self {
        match token {
            "RED" => NodeColor::Red,
            "BLACK" => NodeColor::Black,
            other => NodeColor::Other(other.to_string()),
        }
    }
}

/// One line of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    /// Ordering key, unique within a snapshot.
    pub position: i64,
    /// Accumulated/aggregated value.
    pub delta: i64,
    /// Pending propagation value not yet applied to descendants.
    /// Only the 4-token line variant carries it.
    pub lazy_shift: Option<i64>,
    pub color: NodeColor,
    /// Explicit child positions, present only in the pointer format.
    pub left: Option<i64>,
    pub right: Option<i64>,
}

/// All nodes parsed from one dump file, in file order, plus the lines that
/// were skipped as malformed.
///
/// A snapshot is ephemeral: built when a file is read, consumed by the
/// reconstructor, then discarded. It has no identity beyond the file it
/// came from.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub nodes: Vec<NodeRecord>,
    pub skipped: Vec<LineError>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True iff any record carries an explicit child reference, which
    /// selects pointer-mode reconstruction for the whole snapshot.
    pub fn has_pointers(&self) -> bool {
        self.nodes
            .iter()
            .any(|n| n.left.is_some() || n.right.is_some())
    }

    pub fn get(&self, position: i64) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.position == position)
    }
}
