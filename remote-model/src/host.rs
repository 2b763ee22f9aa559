use alloc::vec::Vec;

use crate::{Request, RequestId, RowRange, Total};

/// What the model needs from the grid widget that displays its rows.
///
/// The model never reaches into presentation state any other way. Implementations must not call
/// back into the model from these methods; report changes afterwards through
/// `RemoteModel::viewport_changed` / `RemoteModel::selected_rows_changed`.
pub trait Grid {
    /// The rows currently visible, `[top, bottom)`.
    ///
    /// With `Some(top)` the grid should move its viewport to start at `top` first (the model asks
    /// for `Some(0)` after a filter change).
    fn viewport(&mut self, top: Option<usize>) -> RowRange;

    fn invalidate_row(&mut self, row: usize);

    /// Accepts the dataset size after the cache changed.
    fn set_row_count(&mut self, total: Total);

    /// Redraws after a batch of invalidations.
    fn render(&mut self) {}

    fn selected_rows(&self) -> Vec<usize>;

    fn set_selected_rows(&mut self, rows: Vec<usize>);

    /// Called whenever the model re-emits a viewport change on its own (after a load, or after the
    /// cache was cleared). Grids with other viewport subscribers can forward it.
    fn viewport_changed(&mut self, scroll_to_top: bool) {
        let _ = scroll_to_top;
    }
}

/// Delivers requests to the server.
///
/// `send` returns immediately; the outcome is fed back later via `RemoteModel::complete` with the
/// same id. `abort` should stop delivery if it can, but the model ignores late outcomes for
/// aborted ids either way.
pub trait Transport {
    fn send(&mut self, id: RequestId, request: &Request);

    fn abort(&mut self, id: RequestId);
}
