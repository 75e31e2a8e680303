//! Coordinate assignment for reconstructed trees.
//!
//! Pure grid placement, separated from terminal drawing so it can be tested
//! without a display surface. The renderer scales grid slots to canvas
//! coordinates.
//!
//! Exact topology gets a structural layout: x is the in-order traversal
//! rank, y is the depth below the root. Inferred topology gets a positional
//! layout: x is the rank of `position` in ascending order, y is the heap
//! depth, so nodes spread left-to-right deterministically instead of
//! clustering.

use std::collections::{HashMap, HashSet};

use super::{Provenance, Side, TreeGraph};

/// One node placed on the layout grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedNode {
    pub position: i64,
    pub col: usize,
    pub row: usize,
}

/// Grid placement for every node of a [`TreeGraph`].
#[derive(Debug, Clone)]
pub struct TreeLayout {
    pub nodes: Vec<PlacedNode>,
    /// Grid width (max col + 1).
    pub cols: usize,
    /// Grid height (max row + 1).
    pub rows: usize,
}

impl TreeLayout {
    /// Grid slot of a position, for edge endpoint lookup.
    pub fn slot(&self, position: i64) -> Option<(usize, usize)> {
        self.nodes
            .iter()
            .find(|n| n.position == position)
            .map(|n| (n.col, n.row))
    }
}

/// Computes the grid layout appropriate for the graph's provenance.
pub fn compute_layout(graph: &TreeGraph) -> TreeLayout {
    let nodes = match graph.provenance {
        Provenance::Exact => layout_exact(graph),
        Provenance::Inferred => layout_inferred(graph),
    };

    let cols = nodes.iter().map(|n| n.col + 1).max().unwrap_or(0);
    let rows = nodes.iter().map(|n| n.row + 1).max().unwrap_or(0);
    TreeLayout { nodes, cols, rows }
}

/// Structural placement from real edges: in-order x, depth y.
fn layout_exact(graph: &TreeGraph) -> Vec<PlacedNode> {
    let mut children: HashMap<i64, (Option<i64>, Option<i64>)> = HashMap::new();
    for e in &graph.edges {
        let entry = children.entry(e.parent).or_default();
        match e.side {
            Side::Left => entry.0 = Some(e.child),
            Side::Right => entry.1 = Some(e.child),
        }
    }

    let mut placed = Vec::new();
    let mut visited: HashSet<i64> = HashSet::new();
    let mut next_col = 0usize;

    for root in &graph.roots {
        place_in_order(*root, 0, &children, &mut visited, &mut next_col, &mut placed);
    }

    // Corrupt pointer dumps can leave nodes unreachable from any root
    // (e.g. a two-node cycle). Park them on a shelf row below the tree so
    // the dump still renders completely.
    let shelf_row = placed.iter().map(|n| n.row + 1).max().unwrap_or(0);
    for node in &graph.nodes {
        if !visited.contains(&node.position) {
            placed.push(PlacedNode {
                position: node.position,
                col: next_col,
                row: shelf_row,
            });
            next_col += 1;
        }
    }

    placed
}

fn place_in_order(
    position: i64,
    row: usize,
    children: &HashMap<i64, (Option<i64>, Option<i64>)>,
    visited: &mut HashSet<i64>,
    next_col: &mut usize,
    placed: &mut Vec<PlacedNode>,
) {
    if !visited.insert(position) {
        return;
    }

    let (left, right) = children.get(&position).copied().unwrap_or((None, None));

    if let Some(left) = left {
        place_in_order(left, row + 1, children, visited, next_col, placed);
    }

    placed.push(PlacedNode {
        position,
        col: *next_col,
        row,
    });
    *next_col += 1;

    if let Some(right) = right {
        place_in_order(right, row + 1, children, visited, next_col, placed);
    }
}

/// Positional placement for inferred topology: x from position rank, y from
/// heap depth.
fn layout_inferred(graph: &TreeGraph) -> Vec<PlacedNode> {
    let mut sorted: Vec<i64> = graph.nodes.iter().map(|n| n.position).collect();
    sorted.sort_unstable();

    sorted
        .iter()
        .enumerate()
        .map(|(i, pos)| PlacedNode {
            position: *pos,
            col: i,
            row: heap_depth(i),
        })
        .collect()
}

/// Depth of heap index i: floor(log2(i + 1)).
fn heap_depth(index: usize) -> usize {
    (usize::BITS - 1 - (index + 1).leading_zeros()) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::parse_snapshot;
    use crate::topology::reconstruct;

    #[test]
    fn test_heap_depth() {
        assert_eq!(heap_depth(0), 0);
        assert_eq!(heap_depth(1), 1);
        assert_eq!(heap_depth(2), 1);
        assert_eq!(heap_depth(3), 2);
        assert_eq!(heap_depth(6), 2);
        assert_eq!(heap_depth(7), 3);
    }

    #[test]
    fn test_exact_layout_in_order() {
        let graph =
            reconstruct(&parse_snapshot("10 0 BLACK L20 R30\n20 0 RED\n30 0 RED\n")).unwrap();
        let layout = compute_layout(&graph);

        // In-order: left child, root, right child.
        assert_eq!(layout.slot(20), Some((0, 1)));
        assert_eq!(layout.slot(10), Some((1, 0)));
        assert_eq!(layout.slot(30), Some((2, 1)));
        assert_eq!(layout.cols, 3);
        assert_eq!(layout.rows, 2);
    }

    #[test]
    fn test_exact_layout_depth_follows_edges() {
        let graph = reconstruct(&parse_snapshot(
            "10 0 BLACK L20\n20 0 RED L30\n30 0 BLACK\n",
        ))
        .unwrap();
        let layout = compute_layout(&graph);

        assert_eq!(layout.slot(10).unwrap().1, 0);
        assert_eq!(layout.slot(20).unwrap().1, 1);
        assert_eq!(layout.slot(30).unwrap().1, 2);
    }

    #[test]
    fn test_inferred_layout_rank_and_heap_depth() {
        let graph = reconstruct(&parse_snapshot("1 0 RED\n2 0 BLACK\n3 0 BLACK\n4 0 RED\n"))
            .unwrap();
        let layout = compute_layout(&graph);

        assert_eq!(layout.slot(1), Some((0, 0)));
        assert_eq!(layout.slot(2), Some((1, 1)));
        assert_eq!(layout.slot(3), Some((2, 1)));
        assert_eq!(layout.slot(4), Some((3, 2)));
    }

    #[test]
    fn test_inferred_layout_spreads_by_position_not_file_order() {
        let graph = reconstruct(&parse_snapshot("30 0 RED\n10 0 BLACK\n20 0 BLACK\n")).unwrap();
        let layout = compute_layout(&graph);

        assert_eq!(layout.slot(10).unwrap().0, 0);
        assert_eq!(layout.slot(20).unwrap().0, 1);
        assert_eq!(layout.slot(30).unwrap().0, 2);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let graph = reconstruct(&parse_snapshot("5 0 RED\n3 0 BLACK\n8 0 BLACK\n")).unwrap();
        let a = compute_layout(&graph);
        let b = compute_layout(&graph);
        assert_eq!(a.nodes, b.nodes);
    }

    #[test]
    fn test_unreachable_nodes_parked_on_shelf() {
        // 40 and 50 reference each other; neither is a root and neither is
        // reachable from 10.
        let graph = reconstruct(&parse_snapshot(
            "10 0 BLACK L20\n20 0 RED\n40 0 RED L50\n50 0 BLACK L40\n",
        ))
        .unwrap();
        let layout = compute_layout(&graph);

        // Every node still gets a slot.
        assert_eq!(layout.nodes.len(), 4);
        let shelf = layout.rows - 1;
        assert!(layout.slot(40).unwrap().1 == shelf || layout.slot(50).unwrap().1 == shelf);
    }
}
