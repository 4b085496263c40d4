//! The caretaker: owns snapshots, branches, and their fork relationships.
//!
//! A [`VersionTree`] starts out with an (empty) master branch. Snapshots are
//! either appended to an existing branch or recorded on a new branch forked
//! off an existing snapshot. Snapshot production is delegated to an
//! [`Originator`], so the store never inspects captured state.
//!
//! Loosely inspired by the classic
//! [Memento pattern](https://en.wikipedia.org/wiki/Memento_pattern), with
//! this type in the caretaker role.

use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::id::{BranchId, ListenerId, MementoId};
use crate::memento::{BoxError, Memento, MementoRef, Originator};

/// A structural change to a [`VersionTree`], delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// A snapshot was recorded, on an existing branch or a fresh fork.
    Recorded(MementoRef),
    /// An existing snapshot was overwritten in place.
    Replaced(MementoRef),
    /// The store was emptied.
    Cleared,
}

/// Error cases for structural mutations.
///
/// Lookups never error: unknown ids yield `None` or empty slices. The
/// variants here cover the strict id-validation policy and capture
/// failures; in every case the store is left exactly as it was.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The append target is not a branch this store has created.
    #[error("unknown branch {0}")]
    UnknownBranch(BranchId),
    /// The fork root does not resolve to a stored snapshot.
    #[error("unknown memento {0}")]
    UnknownMemento(MementoId),
    /// The capture returned a snapshot whose id is already stored.
    #[error("memento {0} already recorded, use replace")]
    DuplicateMemento(MementoId),
    /// The originator capability failed; the underlying error is the
    /// host's, passed through unmodified.
    #[error("state capture failed")]
    Capture(#[source] BoxError),
}

type Listener = Box<dyn FnMut(Change)>;

/// Caretaker for a branching history of immutable snapshots.
///
/// All mutations run to completion synchronously, including in-order
/// delivery of [`Change`] notifications on the calling thread. The store
/// performs no internal locking; hosts that share it across tasks must
/// serialize access themselves.
pub struct VersionTree<S> {
    master: BranchId,
    mementos: FxHashMap<MementoId, Memento<S>>,
    /// Insertion order of every stored snapshot.
    order: Vec<MementoId>,
    mementos_by_branch: FxHashMap<BranchId, Vec<MementoId>>,
    branches_by_memento: FxHashMap<MementoId, Vec<BranchId>>,
    /// Branch this store created for each stored snapshot.
    branch_of: FxHashMap<MementoId, BranchId>,
    /// Branches this store has created; append targets are validated
    /// against this set.
    known_branches: FxHashSet<BranchId>,
    listeners: Vec<(ListenerId, Listener)>,
    notify_on_clear: bool,
}

impl<S> Default for VersionTree<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> VersionTree<S> {
    /// Create an empty store with a fresh master branch.
    #[must_use]
    pub fn new() -> Self {
        let master = BranchId::fresh();
        let mut known_branches = FxHashSet::default();
        known_branches.insert(master);
        Self {
            master,
            mementos: FxHashMap::default(),
            order: Vec::new(),
            mementos_by_branch: FxHashMap::default(),
            branches_by_memento: FxHashMap::default(),
            branch_of: FxHashMap::default(),
            known_branches,
            listeners: Vec::new(),
            notify_on_clear: false,
        }
    }

    /// Fire a [`Change::Cleared`] notification on [`clear`](Self::clear).
    ///
    /// Off by default.
    #[must_use]
    pub fn with_notify_on_clear(mut self, notify: bool) -> Self {
        self.notify_on_clear = notify;
        self
    }

    /// The branch that exists from construction on; stable for the life of
    /// the store, including across [`clear`](Self::clear).
    #[must_use]
    pub fn master_branch(&self) -> BranchId {
        self.master
    }

    /// Look up a snapshot by id.
    #[must_use]
    pub fn memento(&self, id: MementoId) -> Option<&Memento<S>> {
        self.mementos.get(&id)
    }

    /// The snapshots recorded on `branch`, in append order.
    ///
    /// Empty for an unknown or not-yet-populated branch.
    #[must_use]
    pub fn mementos(&self, branch: BranchId) -> &[MementoId] {
        self.mementos_by_branch
            .get(&branch)
            .map_or(&[], Vec::as_slice)
    }

    /// The branches forked off `memento`, in fork order. Empty if none.
    #[must_use]
    pub fn branches(&self, memento: MementoId) -> &[BranchId] {
        self.branches_by_memento
            .get(&memento)
            .map_or(&[], Vec::as_slice)
    }

    /// Every stored snapshot id, flattened across branches in insertion
    /// order.
    pub fn all_mementos(&self) -> impl Iterator<Item = MementoId> + '_ {
        self.order.iter().copied()
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no snapshot is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether `branch` was created by this store (master included).
    #[must_use]
    pub fn contains_branch(&self, branch: BranchId) -> bool {
        self.known_branches.contains(&branch)
    }

    /// Whether `at` points at the last snapshot of its branch.
    ///
    /// Only tips accept further appends without forking, so UIs use this
    /// to decide whether an append affordance applies to the selection.
    #[must_use]
    pub fn is_tip(&self, at: MementoRef) -> bool {
        self.mementos(at.branch()).last() == Some(&at.memento())
    }

    /// Capture a snapshot and append it to `branch`.
    ///
    /// The capability runs only after the branch id validates, so a failed
    /// append never mints ids or mutates the store. Listeners are notified
    /// with [`Change::Recorded`] unless the capture suppresses it.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownBranch`] if `branch` was not created by this
    /// store, [`StoreError::DuplicateMemento`] if the capture reuses a
    /// stored id, [`StoreError::Capture`] if the capability fails.
    pub fn append<O>(&mut self, branch: BranchId, originator: &mut O) -> Result<MementoId, StoreError>
    where
        O: Originator<S> + ?Sized,
    {
        if !self.known_branches.contains(&branch) {
            return Err(StoreError::UnknownBranch(branch));
        }
        let (memento, notify) = originator
            .capture()
            .map_err(StoreError::Capture)?
            .into_parts();
        self.commit(branch, memento, notify)
    }

    /// Capture a snapshot and append it to the master branch.
    ///
    /// # Errors
    ///
    /// Same as [`append`](Self::append), minus the unknown-branch case.
    pub fn append_to_master<O>(&mut self, originator: &mut O) -> Result<MementoId, StoreError>
    where
        O: Originator<S> + ?Sized,
    {
        self.append(self.master, originator)
    }

    /// Fork a new branch off `root` and record a first snapshot on it.
    ///
    /// The new branch id is appended to the end of `root`'s fork list, so
    /// fork order is preserved. The capability runs after `root` validates
    /// and before any bookkeeping, keeping failures all-or-nothing.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownMemento`] if `root` is not stored,
    /// [`StoreError::DuplicateMemento`] if the capture reuses a stored id,
    /// [`StoreError::Capture`] if the capability fails.
    pub fn fork<O>(&mut self, root: MementoId, originator: &mut O) -> Result<MementoRef, StoreError>
    where
        O: Originator<S> + ?Sized,
    {
        if !self.mementos.contains_key(&root) {
            return Err(StoreError::UnknownMemento(root));
        }
        let (memento, notify) = originator
            .capture()
            .map_err(StoreError::Capture)?
            .into_parts();
        if self.mementos.contains_key(&memento.id()) {
            return Err(StoreError::DuplicateMemento(memento.id()));
        }
        let branch = BranchId::fresh();
        self.known_branches.insert(branch);
        self.branches_by_memento.entry(root).or_default().push(branch);
        #[cfg(feature = "tracing")]
        tracing::debug!(%root, %branch, "fork");
        let memento_id = self.commit(branch, memento, notify)?;
        Ok(MementoRef::new(memento_id, branch))
    }

    /// Capture a snapshot and, if its id is already stored, overwrite that
    /// entry in place.
    ///
    /// Branch membership and fork relations are untouched; only the stored
    /// value changes. Returns `false` (leaving the store unchanged) when
    /// the captured id is unknown.
    ///
    /// # Errors
    ///
    /// [`StoreError::Capture`] if the capability fails.
    pub fn replace<O>(&mut self, originator: &mut O) -> Result<bool, StoreError>
    where
        O: Originator<S> + ?Sized,
    {
        let (memento, notify) = originator
            .capture()
            .map_err(StoreError::Capture)?
            .into_parts();
        let id = memento.id();
        let Some(slot) = self.mementos.get_mut(&id) else {
            return Ok(false);
        };
        *slot = memento;
        #[cfg(feature = "tracing")]
        tracing::debug!(memento = %id, "replace");
        if notify {
            // branch_of holds every stored id, so the lookup cannot miss.
            if let Some(&branch) = self.branch_of.get(&id) {
                self.fire(Change::Replaced(MementoRef::new(id, branch)));
            }
        }
        Ok(true)
    }

    /// Empty the store: snapshots, branch membership, and fork relations.
    ///
    /// The master branch id stays valid as an append target; listener
    /// registrations are kept. Fires [`Change::Cleared`] only when
    /// configured via [`with_notify_on_clear`](Self::with_notify_on_clear).
    pub fn clear(&mut self) {
        self.mementos.clear();
        self.order.clear();
        self.mementos_by_branch.clear();
        self.branches_by_memento.clear();
        self.branch_of.clear();
        self.known_branches.clear();
        self.known_branches.insert(self.master);
        #[cfg(feature = "tracing")]
        tracing::debug!("clear");
        if self.notify_on_clear {
            self.fire(Change::Cleared);
        }
    }

    /// Register `listener` for synchronous change notifications.
    ///
    /// Delivery order is registration order. Notifications run while the
    /// store is mutably borrowed, so a listener can never re-enter the
    /// store; use the returned id to unsubscribe.
    pub fn subscribe(&mut self, listener: impl FnMut(Change) + 'static) -> ListenerId {
        let id = ListenerId::fresh();
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn commit(
        &mut self,
        branch: BranchId,
        memento: Memento<S>,
        notify: bool,
    ) -> Result<MementoId, StoreError> {
        let id = memento.id();
        if self.mementos.contains_key(&id) {
            return Err(StoreError::DuplicateMemento(id));
        }
        self.mementos.insert(id, memento);
        self.order.push(id);
        self.branch_of.insert(id, branch);
        self.mementos_by_branch.entry(branch).or_default().push(id);
        #[cfg(feature = "tracing")]
        tracing::debug!(memento = %id, %branch, "append");
        if notify {
            self.fire(Change::Recorded(MementoRef::new(id, branch)));
        }
        Ok(id)
    }

    fn fire(&mut self, change: Change) {
        for (_, listener) in &mut self.listeners {
            #[cfg(feature = "tracing")]
            tracing::trace!(?change, "notify");
            listener(change);
        }
    }
}

impl<S> std::fmt::Debug for VersionTree<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionTree")
            .field("master", &self.master)
            .field("mementos", &self.order.len())
            .field("branches", &self.known_branches.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}
