#![forbid(unsafe_code)]

//! Presentation layer for histree.
//!
//! # Role in histree
//! `histree-widgets` turns a [`histree_core::VersionTree`] into something
//! a host can draw: grid placement for every snapshot, per-branch colors,
//! and a ready-made text rendering. It holds no history state of its own
//! and only consumes the core's read API.
//!
//! # This crate provides
//! - [`layout::GraphLayout`] — pure grid placement plus connectors.
//! - [`palette::BranchPalette`] — cycling per-branch color assignment.
//! - [`surface::Surface`] — a minimal styled character grid.
//! - [`graph::GraphView`] — the widget tying the three together, with
//!   selection support.

/// Version-graph view widget.
pub mod graph;
/// Grid placement for the version graph.
pub mod layout;
/// Branch color assignment.
pub mod palette;
/// Styled character grid used as the render target.
pub mod surface;

pub use graph::GraphView;
pub use layout::{Edge, GraphLayout, PlacedNode};
pub use palette::{BranchPalette, Rgb, SOLARIZED_ACCENTS};
pub use surface::{Cell, Surface};
