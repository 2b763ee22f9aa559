use alloc::vec::Vec;

use crate::key::{IdIndexMap, IdSet, Record, RowMap};
use crate::{RowRange, Total};

/// Sparse, index-addressed storage for fetched records plus the id → row index.
///
/// Invariant: every indexed id points at a cached row holding a record with that id. When an id
/// shows up at a new row the index follows it; the copy at the old row stays cached until that
/// row is reloaded or cleared.
#[derive(Clone)]
pub struct RecordCache<R: Record> {
    rows: RowMap<R>,
    ids: IdIndexMap<R::Id>,
    total: Total,
}

impl<R: Record> Default for RecordCache<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordCache<R> {
    pub fn new() -> Self {
        Self {
            rows: RowMap::new(),
            ids: IdIndexMap::new(),
            total: Total::Unknown,
        }
    }

    pub fn total(&self) -> Total {
        self.total
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.rows.get(&index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.rows.contains_key(&index)
    }

    /// Number of cached rows (not the dataset size).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cached row indexes in ascending order.
    pub fn indexes(&self) -> Vec<usize> {
        let mut out: Vec<usize> = self.rows.keys().copied().collect();
        out.sort_unstable();
        out
    }

    /// Last known row of the record with this id.
    pub fn row_for_id(&self, id: &R::Id) -> Option<usize> {
        self.ids.get(id).copied()
    }

    /// Stores `records[i - range.from]` at every `i` in `range` and takes `total` as the new
    /// dataset size.
    ///
    /// Indexes with no matching record (short `records`) are left unset, dropping whatever was
    /// cached there. Rows outside `range` are untouched, even when they now lie past `total`.
    pub fn patch(&mut self, range: RowRange, records: Vec<R>, total: usize) {
        let mut records = records.into_iter();
        for index in range.from..range.to {
            self.unset(index);
            let Some(record) = records.next() else {
                continue;
            };
            if let Some(id) = record.id() {
                self.ids.insert(id, index);
            }
            self.rows.insert(index, record);
        }
        self.total = Total::Known(total);
    }

    /// Drops every row and id, and forgets the total.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.ids.clear();
        self.total = Total::Unknown;
    }

    fn unset(&mut self, index: usize) {
        let Some(prev) = self.rows.remove(&index) else {
            return;
        };
        if let Some(id) = prev.id() {
            if self.ids.get(&id) == Some(&index) {
                self.ids.remove(&id);
            }
        }
    }

    /// Ids of the records at `rows`. Rows that are not cached, or whose record has no id, are
    /// skipped.
    pub(crate) fn ids_for_rows(&self, rows: &[usize]) -> IdSet<R::Id> {
        rows.iter()
            .filter_map(|row| self.rows.get(row))
            .filter_map(Record::id)
            .collect()
    }

    /// Current rows of `ids`, ascending. Ids that are no longer cached are skipped.
    pub(crate) fn rows_for_ids<'a>(&self, ids: impl IntoIterator<Item = &'a R::Id>) -> Vec<usize>
    where
        R::Id: 'a,
    {
        let mut rows: Vec<usize> = ids
            .into_iter()
            .filter_map(|id| self.ids.get(id).copied())
            .filter(|row| self.rows.contains_key(row))
            .collect();
        rows.sort_unstable();
        rows
    }
}

impl<R: Record> core::fmt::Debug for RecordCache<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordCache")
            .field("rows", &self.rows.len())
            .field("ids", &self.ids.len())
            .field("total", &self.total)
            .finish()
    }
}
