#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

#[cfg(feature = "std")]
pub(crate) type RowMap<R> = HashMap<usize, R>;
#[cfg(not(feature = "std"))]
pub(crate) type RowMap<R> = BTreeMap<usize, R>;

#[cfg(feature = "std")]
pub(crate) type IdIndexMap<K> = HashMap<K, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type IdIndexMap<K> = BTreeMap<K, usize>;

#[cfg(feature = "std")]
pub(crate) type IdSet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub(crate) type IdSet<K> = BTreeSet<K>;

/// Bound for record ids: hashable with `std`, ordered without it.
#[cfg(feature = "std")]
pub trait RecordId: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> RecordId for K {}

#[cfg(not(feature = "std"))]
pub trait RecordId: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> RecordId for K {}

/// A row fetched from the server.
///
/// The only thing the model needs from a record is its stable identity, used to keep the grid
/// selection attached to the same records across re-sorts and reloads. Records without an id are
/// cached but never indexed.
pub trait Record {
    type Id: RecordId;

    fn id(&self) -> Option<Self::Id>;
}
