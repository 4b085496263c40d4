//! Opaque identifiers for snapshots, branches, and listeners.
//!
//! All three id types draw from a single process-wide counter, so an id
//! value is never reused within a process — not across stores, and not
//! after [`VersionTree::clear`](crate::VersionTree::clear). Ids are
//! compared by equality only; their numeric value is an implementation
//! detail surfaced solely through `Display` for log output.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_raw() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Uniquely identifies a [`Memento`](crate::Memento).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MementoId(u64);

impl MementoId {
    /// Mint a fresh, never-before-issued id.
    #[must_use]
    pub fn fresh() -> Self {
        Self(next_raw())
    }
}

impl fmt::Display for MementoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MementoId<{}>", self.0)
    }
}

/// Uniquely identifies a branch of the version tree.
///
/// Branch ids are minted by the store: the master branch id at
/// construction, every other id at fork time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BranchId(u64);

impl BranchId {
    #[must_use]
    pub(crate) fn fresh() -> Self {
        Self(next_raw())
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BranchId<{}>", self.0)
    }
}

/// Handle returned by [`VersionTree::subscribe`](crate::VersionTree::subscribe),
/// used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    #[must_use]
    pub(crate) fn fresh() -> Self {
        Self(next_raw())
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ListenerId<{}>", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_across_types() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(format!("{}", MementoId::fresh())));
            assert!(seen.insert(format!("{}", BranchId::fresh())));
            assert!(seen.insert(format!("{}", ListenerId::fresh())));
        }
    }

    #[test]
    fn ids_compare_by_value() {
        let id = MementoId::fresh();
        let copy = id;
        assert_eq!(id, copy);
        assert_ne!(id, MementoId::fresh());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn memento_id_serde_round_trip() {
        let id = MementoId::fresh();
        let json = serde_json::to_string(&id).unwrap();
        let back: MementoId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
