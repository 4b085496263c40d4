//! Snapshot value types and the originator capability.
//!
//! A [`Memento`] is an immutable snapshot of host state plus display
//! metadata. The store never inspects the captured state; it only decides
//! placement and notification. Snapshots are produced on demand by an
//! [`Originator`], the host-supplied capability that knows how to capture
//! the current application state.

use crate::id::{BranchId, MementoId};

/// Error type an [`Originator`] may fail with.
///
/// Capture failures are the host's concern; the store propagates them
/// unmodified and stays unmutated.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An immutable snapshot of state with display metadata.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Memento<S> {
    id: MementoId,
    label: String,
    tooltip: Option<String>,
    state: S,
}

impl<S> Memento<S> {
    /// Create a snapshot with a freshly minted id.
    #[must_use]
    pub fn new(label: impl Into<String>, state: S) -> Self {
        Self::with_id(MementoId::fresh(), label, state)
    }

    /// Create a snapshot under an existing id.
    ///
    /// Used by captures that feed [`VersionTree::replace`](crate::VersionTree::replace):
    /// a capture carrying an already-stored id overwrites that entry in
    /// place.
    #[must_use]
    pub fn with_id(id: MementoId, label: impl Into<String>, state: S) -> Self {
        Self {
            id,
            label: label.into(),
            tooltip: None,
            state,
        }
    }

    /// Set the tooltip detail text.
    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// The snapshot's identity. Never changes, even through replacement.
    #[must_use]
    pub fn id(&self) -> MementoId {
        self.id
    }

    /// Short display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Optional detail text.
    #[must_use]
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// The captured state payload.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }
}

/// A memento id paired with the branch it belongs to.
///
/// Reported on every change notification as "what just changed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MementoRef {
    memento: MementoId,
    branch: BranchId,
}

impl MementoRef {
    /// Pair a memento id with its containing branch.
    #[must_use]
    pub fn new(memento: MementoId, branch: BranchId) -> Self {
        Self { memento, branch }
    }

    #[must_use]
    pub fn memento(&self) -> MementoId {
        self.memento
    }

    #[must_use]
    pub fn branch(&self) -> BranchId {
        self.branch
    }
}

/// The result of a state capture: the snapshot plus a notification flag.
#[derive(Debug, Clone)]
pub struct Capture<S> {
    memento: Memento<S>,
    notify: bool,
}

impl<S> Capture<S> {
    /// Wrap a captured snapshot. Listeners are notified by default.
    #[must_use]
    pub fn new(memento: Memento<S>) -> Self {
        Self {
            memento,
            notify: true,
        }
    }

    /// Suppress the change notification for this capture.
    ///
    /// Useful when the host performs a burst of captures and only wants a
    /// single repaint at the end.
    #[must_use]
    pub fn suppress_notify(mut self) -> Self {
        self.notify = false;
        self
    }

    #[must_use]
    pub fn memento(&self) -> &Memento<S> {
        &self.memento
    }

    /// Whether listeners should be notified of this capture.
    #[must_use]
    pub fn should_notify(&self) -> bool {
        self.notify
    }

    pub(crate) fn into_parts(self) -> (Memento<S>, bool) {
        (self.memento, self.notify)
    }
}

/// Captures application state in a [`Memento`] on demand.
///
/// The capability mints the memento id itself (via [`Memento::new`]) and
/// returns a fully formed snapshot; the store only decides placement and
/// notification. Implemented for free by any
/// `FnMut() -> Result<Capture<S>, BoxError>` closure:
///
/// ```
/// use histree_core::{Capture, Memento, VersionTree, originator_fn};
///
/// let mut tree = VersionTree::new();
/// let mut counter = 0u32;
/// let mut originator = originator_fn(|| {
///     counter += 1;
///     Ok(Capture::new(Memento::new(counter.to_string(), counter)))
/// });
/// let id = tree.append_to_master(&mut originator).unwrap();
/// assert_eq!(tree.memento(id).unwrap().state(), &1);
/// ```
pub trait Originator<S> {
    /// Capture the current state.
    ///
    /// Errors propagate unmodified out of the store operation that invoked
    /// the capture, leaving the store unchanged.
    fn capture(&mut self) -> Result<Capture<S>, BoxError>;
}

impl<S, F> Originator<S> for F
where
    F: FnMut() -> Result<Capture<S>, BoxError>,
{
    fn capture(&mut self) -> Result<Capture<S>, BoxError> {
        self()
    }
}

/// Adapt a closure into an [`Originator`].
///
/// Returns the closure unchanged; the bound pins its signature so call
/// sites need no type annotations.
pub fn originator_fn<S, F>(f: F) -> F
where
    F: FnMut() -> Result<Capture<S>, BoxError>,
{
    f
}
