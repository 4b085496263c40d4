#![forbid(unsafe_code)]

//! Branching snapshot history for undo/inspect/fork workflows.
//!
//! # Role in histree
//! `histree-core` is the data layer: a caretaker store that records
//! immutable application-state snapshots on a tree of append-only
//! branches, plus the row sizing that lets a renderer stack sibling
//! branches without overlap. Rendering, selection, and color live in
//! `histree-widgets`.
//!
//! # This crate provides
//! - [`VersionTree`], the caretaker owning snapshots, branches, fork
//!   relations, and change notifications.
//! - [`Memento`], [`MementoRef`], and the opaque id types.
//! - [`Originator`], the host-supplied capture capability.
//! - [`row_height`] / [`RowHeights`], the pure layout sizing recurrence.
//!
//! # Example
//!
//! ```
//! use histree_core::{Capture, Memento, VersionTree, originator_fn, row_height};
//!
//! let mut tree = VersionTree::new();
//! let snap = |label: &'static str| {
//!     originator_fn(move || Ok(Capture::new(Memento::new(label, ()))))
//! };
//!
//! let one = tree.append_to_master(&mut snap("1")).unwrap();
//! tree.append_to_master(&mut snap("2")).unwrap();
//! tree.fork(one, &mut snap("1.1")).unwrap();
//!
//! // "1" needs two rows: itself and its forked branch.
//! assert_eq!(row_height(&tree, tree.master_branch(), 0), 2);
//! ```

/// Opaque identifiers for snapshots, branches, and listeners.
pub mod id;
/// Snapshot value types and the originator capability.
pub mod memento;
/// Row sizing for overlap-free rendering.
pub mod row_height;
/// The caretaker store.
pub mod store;

pub use id::{BranchId, ListenerId, MementoId};
pub use memento::{BoxError, Capture, Memento, MementoRef, Originator, originator_fn};
pub use row_height::{RowHeights, row_height};
pub use store::{Change, StoreError, VersionTree};
