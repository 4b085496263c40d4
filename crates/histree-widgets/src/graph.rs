//! Version-graph view: renders a [`VersionTree`] as node bubbles and
//! connector lines on a [`Surface`].
//!
//! Snapshots appear as `( label )` bubbles filled with their branch
//! color; consecutive snapshots are joined by horizontal lines, forked
//! branches by a vertical guide dropping from their root and turning
//! into the branch head. The selected snapshot is stroked with `[ ]`
//! instead of `( )`.
//!
//! # Example
//!
//! ```
//! use histree_core::{Capture, Memento, VersionTree, originator_fn};
//! use histree_widgets::graph::GraphView;
//!
//! let mut tree = VersionTree::new();
//! let one = tree
//!     .append_to_master(&mut originator_fn(|| Ok(Capture::new(Memento::new("1", ())))))
//!     .unwrap();
//! tree.fork(one, &mut originator_fn(|| Ok(Capture::new(Memento::new("1.1", ())))))
//!     .unwrap();
//!
//! let mut view = GraphView::new();
//! let surface = view.render(&tree);
//! assert!(surface.to_plain_string().contains("( 1.1 )"));
//! ```

use histree_core::{MementoRef, VersionTree};
use rustc_hash::FxHashMap;
use unicode_width::UnicodeWidthStr;

use crate::layout::{Edge, GraphLayout, PlacedNode};
use crate::palette::BranchPalette;
use crate::surface::Surface;

/// Guide characters for connector lines.
const HORIZONTAL: char = '\u{2500}'; // ─
const VERTICAL: char = '\u{2502}'; // │
const CORNER: char = '\u{2514}'; // └
const TEE: char = '\u{251C}'; // ├

/// Widget that draws the version graph.
///
/// Holds the per-branch color assignment and the selection; everything
/// else is recomputed from the store on each [`render`](Self::render).
#[derive(Debug, Default)]
pub struct GraphView {
    palette: BranchPalette,
    selection: Option<MementoRef>,
}

impl GraphView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the selected snapshot.
    pub fn select(&mut self, at: Option<MementoRef>) {
        self.selection = at;
    }

    /// Select `at`, or clear the selection if it is already selected.
    pub fn toggle(&mut self, at: MementoRef) {
        self.selection = if self.selection == Some(at) {
            None
        } else {
            Some(at)
        };
    }

    #[must_use]
    pub fn selection(&self) -> Option<MementoRef> {
        self.selection
    }

    /// Whether the selection accepts a plain append: only the last
    /// snapshot of a branch does; anywhere else the host must fork.
    #[must_use]
    pub fn append_allowed<S>(&self, tree: &VersionTree<S>) -> bool {
        self.selection.is_some_and(|at| tree.is_tip(at))
    }

    /// Forget all branch color assignments.
    ///
    /// Call together with `VersionTree::clear` so a repopulated tree
    /// starts the color cycle over.
    pub fn reset_colors(&mut self) {
        self.palette.reset();
    }

    /// Render the whole graph onto a fresh surface.
    pub fn render<S>(&mut self, tree: &VersionTree<S>) -> Surface {
        let layout = GraphLayout::compute(tree);

        let max_bubble = tree
            .all_mementos()
            .filter_map(|id| tree.memento(id))
            .map(|m| m.label().width() + 4)
            .max()
            .unwrap_or(4);
        // Bubble slot plus room for a connector segment.
        let cell_w = max_bubble + 3;

        let width = (layout.cols() - 1) * cell_w + max_bubble;
        let mut surface = Surface::new(width, layout.rows());

        let node_at: FxHashMap<(usize, usize), &PlacedNode> = layout
            .nodes
            .iter()
            .map(|node| ((node.col, node.row), node))
            .collect();

        // Lines first, bubbles on top.
        for edge in &layout.edges {
            match *edge {
                Edge::Inline { from, to } => {
                    let start = from.0 * cell_w + self.bubble_width(tree, &node_at, from);
                    let end = to.0 * cell_w;
                    for x in start..end {
                        surface.put(x, from.1, HORIZONTAL, None);
                    }
                }
                Edge::Elbow { parent, child } => {
                    let vx = parent.0 * cell_w + 1;
                    for y in parent.1 + 1..child.1 {
                        let ch = match surface.cell(vx, y) {
                            Some(cell) if cell.ch == CORNER => TEE,
                            _ => VERTICAL,
                        };
                        surface.put(vx, y, ch, None);
                    }
                    surface.put(vx, child.1, CORNER, None);
                    for x in vx + 1..child.0 * cell_w {
                        surface.put(x, child.1, HORIZONTAL, None);
                    }
                }
            }
        }

        for node in &layout.nodes {
            let Some(memento) = tree.memento(node.at.memento()) else {
                continue;
            };
            let selected = self.selection == Some(node.at);
            let (open, close) = if selected { ('[', ']') } else { ('(', ')') };
            let bubble = format!("{open} {} {close}", memento.label());
            let color = self.palette.color_of(node.at.branch());
            surface.put_str(node.col * cell_w, node.row, &bubble, Some(color));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            nodes = layout.nodes.len(),
            edges = layout.edges.len(),
            rows = layout.rows(),
            "render"
        );

        surface
    }

    fn bubble_width<S>(
        &self,
        tree: &VersionTree<S>,
        node_at: &FxHashMap<(usize, usize), &PlacedNode>,
        cell: (usize, usize),
    ) -> usize {
        node_at
            .get(&cell)
            .and_then(|node| tree.memento(node.at.memento()))
            .map_or(4, |m| m.label().width() + 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use histree_core::{Capture, Memento, Originator, originator_fn};

    fn labeled(label: &str) -> impl Originator<String> + use<> {
        let label = label.to_string();
        originator_fn(move || Ok(Capture::new(Memento::new(label.clone(), String::new()))))
    }

    #[test]
    fn empty_tree_renders_blank() {
        let tree: VersionTree<String> = VersionTree::new();
        let mut view = GraphView::new();
        assert_eq!(view.render(&tree).to_plain_string(), "");
    }

    #[test]
    fn singleton_renders_one_bubble() {
        let mut tree = VersionTree::new();
        tree.append_to_master(&mut labeled("1")).unwrap();
        let mut view = GraphView::new();
        assert_eq!(view.render(&tree).to_plain_string(), "( 1 )");
    }

    #[test]
    fn spine_and_fork_golden() {
        let mut tree = VersionTree::new();
        let one = tree.append_to_master(&mut labeled("1")).unwrap();
        tree.append_to_master(&mut labeled("2")).unwrap();
        tree.fork(one, &mut labeled("1.1")).unwrap();

        let mut view = GraphView::new();
        let rendered = view.render(&tree).to_plain_string();
        assert_eq!(
            rendered,
            "( 1 )\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}( 2 )\n \
             \u{2514}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}( 1.1 )"
        );
    }

    #[test]
    fn selection_is_stroked_with_brackets() {
        let mut tree = VersionTree::new();
        let one = tree.append_to_master(&mut labeled("1")).unwrap();
        let forked = tree.fork(one, &mut labeled("1.1")).unwrap();

        let mut view = GraphView::new();
        view.select(Some(forked));
        let rendered = view.render(&tree).to_plain_string();
        assert!(rendered.contains("[ 1.1 ]"));
        assert!(rendered.contains("( 1 )"));

        view.toggle(forked);
        assert!(view.selection().is_none());
        assert!(view.render(&tree).to_plain_string().contains("( 1.1 )"));
    }

    #[test]
    fn append_allowed_only_at_branch_tips() {
        let mut tree = VersionTree::new();
        let master = tree.master_branch();
        let one = tree.append_to_master(&mut labeled("1")).unwrap();
        let two = tree.append_to_master(&mut labeled("2")).unwrap();

        let mut view = GraphView::new();
        assert!(!view.append_allowed(&tree));

        view.select(Some(MementoRef::new(two, master)));
        assert!(view.append_allowed(&tree));

        view.select(Some(MementoRef::new(one, master)));
        assert!(!view.append_allowed(&tree));
    }

    #[test]
    fn sibling_forks_share_an_upgraded_guide() {
        let mut tree = VersionTree::new();
        let one = tree.append_to_master(&mut labeled("1")).unwrap();
        tree.fork(one, &mut labeled("a")).unwrap();
        tree.fork(one, &mut labeled("b")).unwrap();

        let mut view = GraphView::new();
        let rendered = view.render(&tree).to_plain_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        // First fork row turns into a tee once the second passes through.
        assert!(lines[1].contains('\u{251C}'));
        assert!(lines[2].contains('\u{2514}'));
        assert!(lines[1].contains("( a )"));
        assert!(lines[2].contains("( b )"));
    }

    #[test]
    fn branches_are_colored_distinctly() {
        let mut tree = VersionTree::new();
        let one = tree.append_to_master(&mut labeled("1")).unwrap();
        tree.fork(one, &mut labeled("1.1")).unwrap();

        let mut view = GraphView::new();
        let surface = view.render(&tree);

        let master_fg = surface.cell(0, 0).unwrap().fg;
        let fork_x = surface
            .to_plain_string()
            .lines()
            .nth(1)
            .unwrap()
            .chars()
            .position(|ch| ch == '(')
            .unwrap();
        let fork_fg = surface.cell(fork_x, 1).unwrap().fg;

        assert!(master_fg.is_some());
        assert!(fork_fg.is_some());
        assert_ne!(master_fg, fork_fg);
    }

    #[test]
    fn rerender_keeps_branch_colors_stable() {
        let mut tree = VersionTree::new();
        let one = tree.append_to_master(&mut labeled("1")).unwrap();
        tree.fork(one, &mut labeled("1.1")).unwrap();

        let mut view = GraphView::new();
        let first = view.render(&tree);
        let second = view.render(&tree);
        assert_eq!(first.cell(0, 0).unwrap().fg, second.cell(0, 0).unwrap().fg);
    }
}
