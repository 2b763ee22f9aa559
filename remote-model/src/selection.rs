use alloc::vec::Vec;

use crate::RecordCache;
use crate::key::{IdSet, Record};

/// Keeps the grid selection attached to record ids across reloads and re-sorts.
///
/// The selection is remembered as ids whenever the grid reports a change, and mapped back to
/// whatever rows those ids occupy after each load.
///
/// Grids that raise their selection-changed event for programmatic updates echo every restore
/// back. A report equal to the rows last restored is that echo and leaves the ids alone.
#[derive(Clone, Debug)]
pub struct SelectionSync<K> {
    preserve_hidden: bool,
    ids: IdSet<K>,
    restored: Option<Vec<usize>>,
}

impl<K: crate::RecordId> SelectionSync<K> {
    /// With `preserve_hidden`, ids that are not in the loaded rows stay remembered and come back
    /// once their rows load again. Without it the remembered selection shrinks to what was
    /// restored.
    pub fn new(preserve_hidden: bool) -> Self {
        Self {
            preserve_hidden,
            ids: IdSet::new(),
            restored: None,
        }
    }

    pub fn preserve_hidden(&self) -> bool {
        self.preserve_hidden
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &K) -> bool {
        self.ids.contains(id)
    }

    /// Replaces the remembered ids with those of the selected `rows`.
    pub fn capture<R: Record<Id = K>>(&mut self, cache: &RecordCache<R>, rows: &[usize]) {
        self.ids = cache.ids_for_rows(rows);
        self.restored = None;
    }

    /// Handles a selection reported by the grid. Returns `false` when the report only echoes the
    /// last restore.
    pub fn observe<R: Record<Id = K>>(
        &mut self,
        cache: &RecordCache<R>,
        mut rows: Vec<usize>,
    ) -> bool {
        rows.sort_unstable();
        rows.dedup();
        if self.restored.as_ref() == Some(&rows) {
            return false;
        }
        self.capture(cache, &rows);
        true
    }

    /// Rows to select after a load.
    pub fn restore<R: Record<Id = K>>(&mut self, cache: &RecordCache<R>) -> Vec<usize> {
        let rows = cache.rows_for_ids(self.ids.iter());
        if !self.preserve_hidden {
            self.ids = cache.ids_for_rows(&rows);
        }
        self.restored = Some(rows.clone());
        rows
    }
}
