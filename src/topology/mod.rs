//! Topology reconstruction.
//!
//! A snapshot does not always carry parent/child pointers. When it does,
//! edges are transcribed verbatim; when it does not, a deterministic
//! heap-index rule imposes a renderable shape. The two origins are kept
//! distinct end-to-end via [`Provenance`] so the UI can label an inferred
//! layout as the heuristic it is.

pub mod layout;

use std::collections::{HashMap, HashSet};

use crate::snapshot::{NodeColor, NodeRecord, Snapshot};

/// How the tree's edges were established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Edges transcribed from explicit `L`/`R` references in the dump.
    Exact,
    /// Edges imposed by the binary-heap positional rule. A visualization
    /// aid only: the true tree shape is lost once pointers are absent.
    Inferred,
}

/// Which child slot an edge occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A directed parent -> child relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub parent: i64,
    pub child: i64,
    pub side: Side,
}

/// A renderable node: position plus display attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub position: i64,
    pub delta: i64,
    pub lazy_shift: Option<i64>,
    pub color: NodeColor,
    /// Pre-built display label: position, signed delta, lazy shift if any.
    pub label: String,
}

impl GraphNode {
    fn from_record(record: &NodeRecord) -> Self {
        let label = match record.lazy_shift {
            Some(shift) => format!("{} {:+} lz{:+}", record.position, record.delta, shift),
            None => format!("{} {:+}", record.position, record.delta),
        };
        Self {
            position: record.position,
            delta: record.delta,
            lazy_shift: record.lazy_shift,
            color: record.color.clone(),
            label,
        }
    }
}

/// The reconstructed tree over one snapshot's positions.
#[derive(Debug, Clone)]
pub struct TreeGraph {
    pub provenance: Provenance,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
    /// Positions with no parent. Exactly one for a well-formed dump;
    /// pointer-mode corruption can produce a forest.
    pub roots: Vec<i64>,
    /// (parent, missing child) references found in pointer mode. Reported
    /// and omitted from the edge set, never fatal.
    pub dangling: Vec<(i64, i64)>,
}

/// Reconstructs a tree from a snapshot.
///
/// Returns `None` for an empty snapshot so callers render "waiting for
/// data" instead of a degenerate graph. Duplicate positions keep the last
/// record seen, matching a producer that re-dumps a node mid-write.
pub fn reconstruct(snapshot: &Snapshot) -> Option<TreeGraph> {
    if snapshot.is_empty() {
        return None;
    }

    // Dedup by position, last record wins, file order otherwise preserved.
    let mut order: Vec<i64> = Vec::new();
    let mut by_position: HashMap<i64, &NodeRecord> = HashMap::new();
    for record in &snapshot.nodes {
        if by_position.insert(record.position, record).is_none() {
            order.push(record.position);
        }
    }

    if snapshot.has_pointers() {
        Some(reconstruct_exact(&order, &by_position))
    } else {
        Some(reconstruct_inferred(&order, &by_position))
    }
}

/// Pointer mode: the edge set equals exactly the `L`/`R` references, no
/// inference.
fn reconstruct_exact(order: &[i64], by_position: &HashMap<i64, &NodeRecord>) -> TreeGraph {
    let mut edges = Vec::new();
    let mut dangling = Vec::new();
    let mut referenced: HashSet<i64> = HashSet::new();

    for pos in order {
        let record = by_position[pos];
        for (child, side) in [(record.left, Side::Left), (record.right, Side::Right)] {
            let Some(child) = child else {
                continue;
            };
            if by_position.contains_key(&child) {
                edges.push(Edge {
                    parent: *pos,
                    child,
                    side,
                });
                referenced.insert(child);
            } else {
                dangling.push((*pos, child));
            }
        }
    }

    let roots: Vec<i64> = order
        .iter()
        .copied()
        .filter(|pos| !referenced.contains(pos))
        .collect();

    TreeGraph {
        provenance: Provenance::Exact,
        nodes: order
            .iter()
            .map(|pos| GraphNode::from_record(by_position[pos]))
            .collect(),
        edges,
        roots,
        dangling,
    }
}

/// Inferred mode: sort by position ascending; index 0 is the root and the
/// parent of index i is index (i-1)/2, mirroring a binary-heap array.
fn reconstruct_inferred(order: &[i64], by_position: &HashMap<i64, &NodeRecord>) -> TreeGraph {
    let mut sorted: Vec<i64> = order.to_vec();
    sorted.sort_unstable();

    let mut edges = Vec::new();
    for (i, pos) in sorted.iter().enumerate().skip(1) {
        let parent = sorted[(i - 1) / 2];
        let side = if i % 2 == 1 { Side::Left } else { Side::Right };
        edges.push(Edge {
            parent,
            child: *pos,
            side,
        });
    }

    TreeGraph {
        provenance: Provenance::Inferred,
        nodes: sorted
            .iter()
            .map(|pos| GraphNode::from_record(by_position[pos]))
            .collect(),
        edges,
        roots: vec![sorted[0]],
        dangling: Vec::new(),
    }
}
