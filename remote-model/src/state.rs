use crate::{RequestId, Total};

/// A lightweight snapshot of the model's bookkeeping, for diagnostics or for restoring a host UI
/// (e.g. the row count) without touching the cache itself.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelState {
    pub total: Total,
    /// Number of rows currently cached.
    pub cached_rows: usize,
    /// Last known top-of-viewport row.
    pub scroll_position: Option<usize>,
    pub active_request: Option<RequestId>,
    pub suspended: bool,
}

impl ModelState {
    pub fn is_loading(&self) -> bool {
        self.active_request.is_some()
    }
}
