//! Grid placement for the version graph.
//!
//! Maps every snapshot in a [`VersionTree`] to a `(col, row)` grid cell
//! and records the connectors between them, so a renderer only has to
//! translate grid cells into whatever coordinate space it draws in. Row
//! positions come from the row-height calculator, which is what keeps
//! sibling branches from colliding: the first branch forked off a
//! snapshot starts below everything the remainder of the spine needs,
//! each further sibling below everything its predecessor needed.
//!
//! The walk is a pure function over the store's read API; it never
//! mutates the store.

use histree_core::{BranchId, MementoRef, RowHeights, VersionTree};

/// A snapshot placed on the layout grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacedNode {
    /// The snapshot and the branch it sits on.
    pub at: MementoRef,
    pub col: usize,
    pub row: usize,
}

/// A connector between two placed snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Consecutive snapshots on the same branch, same row.
    Inline {
        from: (usize, usize),
        to: (usize, usize),
    },
    /// Fork root to the head of a child branch: down from the parent,
    /// then right into the child.
    Elbow {
        parent: (usize, usize),
        child: (usize, usize),
    },
}

/// The computed placement of a whole version graph.
#[derive(Debug, Clone, Default)]
pub struct GraphLayout {
    /// Every snapshot, in walk order (spine before forks, forks in fork
    /// order).
    pub nodes: Vec<PlacedNode>,
    /// Every connector, in walk order.
    pub edges: Vec<Edge>,
    rows: usize,
    cols: usize,
}

impl GraphLayout {
    /// Lay out the whole graph starting from the master branch at the
    /// origin.
    #[must_use]
    pub fn compute<S>(tree: &VersionTree<S>) -> Self {
        let mut layout = Self::default();
        let mut heights = RowHeights::new(tree);
        layout.walk(tree, &mut heights, tree.master_branch(), 0, 0, None);
        layout
    }

    /// Total grid rows the layout occupies (at least 1).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.max(1)
    }

    /// Total grid columns the layout occupies (at least 1).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols.max(1)
    }

    /// The node placed at `(col, row)`, if any.
    #[must_use]
    pub fn node_at(&self, col: usize, row: usize) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.col == col && n.row == row)
    }

    fn walk<S>(
        &mut self,
        tree: &VersionTree<S>,
        heights: &mut RowHeights<'_, S>,
        branch: BranchId,
        col: usize,
        row: usize,
        parent: Option<(usize, usize)>,
    ) {
        let mut parent = parent;
        let mementos = tree.mementos(branch);
        for (i, &id) in mementos.iter().enumerate() {
            let at = (col + i, row);
            self.nodes.push(PlacedNode {
                at: MementoRef::new(id, branch),
                col: at.0,
                row: at.1,
            });
            self.rows = self.rows.max(row + 1);
            self.cols = self.cols.max(at.0 + 1);

            if let Some(parent) = parent {
                if parent.1 == row {
                    self.edges.push(Edge::Inline {
                        from: parent,
                        to: at,
                    });
                } else {
                    self.edges.push(Edge::Elbow { parent, child: at });
                }
            }

            // Rows the rest of this branch needs; the first fork starts
            // below them, each further fork below its elder sibling.
            let spine_rows = heights.row_height(branch, i + 1);
            let mut sibling_rows = 0;
            let children = tree.branches(id);
            for (j, &child) in children.iter().enumerate() {
                if j > 0 {
                    sibling_rows += heights.row_height(children[j - 1], 0);
                }
                self.walk(
                    tree,
                    heights,
                    child,
                    at.0 + 1,
                    row + spine_rows + sibling_rows,
                    Some(at),
                );
            }

            parent = Some(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use histree_core::{Capture, Memento, MementoId, Originator, originator_fn};

    fn labeled(label: &str) -> impl Originator<String> + use<> {
        let label = label.to_string();
        originator_fn(move || Ok(Capture::new(Memento::new(label.clone(), String::new()))))
    }

    fn label_of(tree: &VersionTree<String>, id: MementoId) -> &str {
        tree.memento(id).unwrap().label()
    }

    fn demo_tree() -> VersionTree<String> {
        // 1 ----------------- 2 ----------------- 3
        // |                   |                   +-- A 3.1
        // |                   |                   +-- B 3.1 - B 3.2
        // |                   +-- A 2.1 - A 2.2
        // |                   +-- B 2.1 - B 2.2
        // +-- A 1.1
        let mut tree = VersionTree::new();
        let one = tree.append_to_master(&mut labeled("1")).unwrap();
        let two = tree.append_to_master(&mut labeled("2")).unwrap();
        let three = tree.append_to_master(&mut labeled("3")).unwrap();

        tree.fork(one, &mut labeled("A 1.1")).unwrap();

        let branch_2a = tree.fork(two, &mut labeled("A 2.1")).unwrap().branch();
        tree.append(branch_2a, &mut labeled("A 2.2")).unwrap();
        let branch_2b = tree.fork(two, &mut labeled("B 2.1")).unwrap().branch();
        tree.append(branch_2b, &mut labeled("B 2.2")).unwrap();

        tree.fork(three, &mut labeled("A 3.1")).unwrap();
        let branch_3b = tree.fork(three, &mut labeled("B 3.1")).unwrap().branch();
        tree.append(branch_3b, &mut labeled("B 3.2")).unwrap();
        tree
    }

    #[test]
    fn empty_tree_yields_empty_layout() {
        let tree: VersionTree<String> = VersionTree::new();
        let layout = GraphLayout::compute(&tree);
        assert!(layout.nodes.is_empty());
        assert!(layout.edges.is_empty());
        assert_eq!(layout.rows(), 1);
        assert_eq!(layout.cols(), 1);
    }

    #[test]
    fn spine_runs_along_row_zero() {
        let mut tree = VersionTree::new();
        tree.append_to_master(&mut labeled("1")).unwrap();
        tree.append_to_master(&mut labeled("2")).unwrap();
        tree.append_to_master(&mut labeled("3")).unwrap();

        let layout = GraphLayout::compute(&tree);
        let positions: Vec<_> = layout.nodes.iter().map(|n| (n.col, n.row)).collect();
        assert_eq!(positions, [(0, 0), (1, 0), (2, 0)]);
        assert_eq!(
            layout.edges,
            [
                Edge::Inline { from: (0, 0), to: (1, 0) },
                Edge::Inline { from: (1, 0), to: (2, 0) },
            ]
        );
    }

    #[test]
    fn fork_head_sits_below_the_remaining_spine() {
        let mut tree = VersionTree::new();
        let one = tree.append_to_master(&mut labeled("1")).unwrap();
        tree.append_to_master(&mut labeled("2")).unwrap();
        tree.fork(one, &mut labeled("1.1")).unwrap();

        let layout = GraphLayout::compute(&tree);
        // Spine after "1" needs one row, so the fork head lands on row 1.
        let head = layout.node_at(1, 1).expect("fork head placed");
        assert_eq!(
            layout
                .edges
                .iter()
                .filter(|e| matches!(e, Edge::Elbow { .. }))
                .count(),
            1
        );
        assert!(layout
            .edges
            .contains(&Edge::Elbow { parent: (0, 0), child: (head.col, head.row) }));
    }

    #[test]
    fn demo_tree_placement_matches_the_original() {
        let tree = demo_tree();
        let layout = GraphLayout::compute(&tree);

        let mut by_label: Vec<(String, usize, usize)> = layout
            .nodes
            .iter()
            .map(|n| (label_of(&tree, n.at.memento()).to_string(), n.col, n.row))
            .collect();
        by_label.sort();

        assert_eq!(
            by_label,
            [
                ("1".to_string(), 0, 0),
                ("2".to_string(), 1, 0),
                ("3".to_string(), 2, 0),
                ("A 1.1".to_string(), 1, 5),
                ("A 2.1".to_string(), 2, 3),
                ("A 2.2".to_string(), 3, 3),
                ("A 3.1".to_string(), 3, 1),
                ("B 2.1".to_string(), 2, 4),
                ("B 2.2".to_string(), 3, 4),
                ("B 3.1".to_string(), 3, 2),
                ("B 3.2".to_string(), 4, 2),
            ]
        );
        assert_eq!(layout.rows(), 6);
        assert_eq!(layout.cols(), 5);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn build(ops: &[(u8, u8)]) -> VersionTree<String> {
            let mut tree = VersionTree::new();
            let mut branches = vec![tree.master_branch()];
            let mut mementos = Vec::new();
            for &(op, target) in ops {
                match op % 3 {
                    0 => mementos.push(tree.append_to_master(&mut labeled("m")).unwrap()),
                    1 => {
                        let branch = branches[target as usize % branches.len()];
                        mementos.push(tree.append(branch, &mut labeled("a")).unwrap());
                    }
                    _ => {
                        if let Some(&root) = mementos.get(target as usize % mementos.len().max(1)) {
                            let forked = tree.fork(root, &mut labeled("f")).unwrap();
                            branches.push(forked.branch());
                            mementos.push(forked.memento());
                        }
                    }
                }
            }
            tree
        }

        proptest! {
            #[test]
            fn no_two_nodes_share_a_cell(ops in prop::collection::vec((any::<u8>(), any::<u8>()), 0..40)) {
                let tree = build(&ops);
                let layout = GraphLayout::compute(&tree);
                let mut cells: Vec<_> = layout.nodes.iter().map(|n| (n.col, n.row)).collect();
                cells.sort_unstable();
                let len = cells.len();
                cells.dedup();
                prop_assert_eq!(cells.len(), len);
            }

            #[test]
            fn every_snapshot_is_placed(ops in prop::collection::vec((any::<u8>(), any::<u8>()), 0..40)) {
                let tree = build(&ops);
                let layout = GraphLayout::compute(&tree);
                prop_assert_eq!(layout.nodes.len(), tree.len());
            }

            #[test]
            fn forks_descend_and_shift_right(ops in prop::collection::vec((any::<u8>(), any::<u8>()), 0..40)) {
                let tree = build(&ops);
                let layout = GraphLayout::compute(&tree);
                for edge in &layout.edges {
                    match *edge {
                        Edge::Inline { from, to } => {
                            prop_assert_eq!(from.1, to.1);
                            prop_assert_eq!(from.0 + 1, to.0);
                        }
                        Edge::Elbow { parent, child } => {
                            prop_assert!(child.1 > parent.1);
                            prop_assert_eq!(child.0, parent.0 + 1);
                        }
                    }
                }
            }
        }
    }
}
