//! Row sizing for rendering the version tree without overlap.
//!
//! Suppose the store holds the following tree:
//!
//! ```text
//! 1 ----------------- 2 ----------------- 3
//! |                   |                   +-- A 3.1
//! |                   +-- A 2.1 - A 2.2
//! |                   +-- B 2.1 - B 2.2
//! +-- A 1.1
//! ```
//!
//! The row height of node 2 (index 1 on master) is computed in two steps:
//! first how many rows the node needs on its own, ignoring everything to
//! its right (one row for itself plus the full height of each forked
//! branch: 3 here), then the height of the remainder of the branch via
//! `row_height(index + 1)` (2 here). The two are added and corrected by
//! -1 because the spine row is shared: 3 + 2 - 1 = 4... and so on up the
//! branch, which is how sibling branches stack without collision.
//!
//! The calculation is pure and reads the store only through its query
//! API. [`RowHeights`] memoizes results for a read pass; the store cannot
//! change mid-pass under the single-writer model, so cached entries stay
//! valid for the wrapper's lifetime.

use rustc_hash::FxHashMap;

use crate::id::{BranchId, MementoId};
use crate::store::VersionTree;

/// Number of display rows the remainder of `branch` needs, starting at
/// `index`, including every recursively forked sub-branch.
///
/// An index past the end of the branch (an empty branch included) yields
/// 1: the minimum single row a caller should reserve even for "nothing
/// there yet".
#[must_use]
pub fn row_height<S>(tree: &VersionTree<S>, branch: BranchId, index: usize) -> usize {
    let mementos = tree.mementos(branch);
    if index >= mementos.len() {
        return 1;
    }
    let own = own_row_height(tree, mementos[index]);
    if index == mementos.len() - 1 {
        own
    } else {
        // -1: the spine row is counted once, not per segment.
        own + row_height(tree, branch, index + 1) - 1
    }
}

fn own_row_height<S>(tree: &VersionTree<S>, memento: MementoId) -> usize {
    let branches = tree.branches(memento);
    if branches.is_empty() {
        return 1;
    }
    let children: usize = branches
        .iter()
        .map(|&child| row_height(tree, child, 0))
        .sum();
    children + 1
}

/// Memoizing wrapper around [`row_height`] for a single read pass.
///
/// Layout walks query the same `(branch, index)` pairs repeatedly; the
/// cache turns the quadratic spine recursion into one computation per
/// pair. Drop the wrapper once the pass is done — it borrows the store,
/// so a structural mutation invalidates it by construction.
pub struct RowHeights<'a, S> {
    tree: &'a VersionTree<S>,
    cache: FxHashMap<(BranchId, usize), usize>,
}

impl<'a, S> RowHeights<'a, S> {
    #[must_use]
    pub fn new(tree: &'a VersionTree<S>) -> Self {
        Self {
            tree,
            cache: FxHashMap::default(),
        }
    }

    /// Memoized [`row_height`].
    #[must_use]
    pub fn row_height(&mut self, branch: BranchId, index: usize) -> usize {
        if let Some(&height) = self.cache.get(&(branch, index)) {
            return height;
        }
        let mementos = self.tree.mementos(branch);
        let height = if index >= mementos.len() {
            1
        } else {
            let own = self.own_row_height(mementos[index]);
            if index == mementos.len() - 1 {
                own
            } else {
                own + self.row_height(branch, index + 1) - 1
            }
        };
        self.cache.insert((branch, index), height);
        height
    }

    fn own_row_height(&mut self, memento: MementoId) -> usize {
        let branches = self.tree.branches(memento);
        if branches.is_empty() {
            return 1;
        }
        let mut children = 0;
        for &child in branches {
            children += self.row_height(child, 0);
        }
        children + 1
    }
}
