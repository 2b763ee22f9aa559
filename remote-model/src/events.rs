use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::{RowRange, Total, TransportError, TransportErrorKind};

/// A fetch for `range` was issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadingEvent {
    pub range: RowRange,
}

/// A response was applied to the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedEvent {
    /// `None` when the payload carried no rows.
    pub range: Option<RowRange>,
    pub total: Total,
    /// Host side payload from the response (e.g. `flash`).
    pub extra: BTreeMap<String, String>,
}

/// A request failed for real (not by cancellation).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorEvent {
    pub error: TransportError,
}

impl ErrorEvent {
    pub fn kind(&self) -> TransportErrorKind {
        self.error.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.error.status
    }

    pub fn detail(&self) -> &str {
        &self.error.detail
    }
}

pub type LoadingListener = Arc<dyn Fn(&LoadingEvent) + Send + Sync>;
pub type LoadedListener = Arc<dyn Fn(&LoadedEvent) + Send + Sync>;
pub type ErrorListener = Arc<dyn Fn(&ErrorEvent) + Send + Sync>;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Per-kind listener lists. Listeners run in subscription order.
#[derive(Clone, Default)]
pub struct Notifier {
    next_id: u64,
    loading: Vec<(ListenerId, LoadingListener)>,
    loaded: Vec<(ListenerId, LoadedListener)>,
    error: Vec<(ListenerId, ErrorListener)>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> ListenerId {
        self.next_id = self.next_id.wrapping_add(1);
        ListenerId(self.next_id)
    }

    pub fn on_loading(&mut self, f: impl Fn(&LoadingEvent) + Send + Sync + 'static) -> ListenerId {
        let id = self.next_id();
        self.loading.push((id, Arc::new(f)));
        id
    }

    pub fn on_loaded(&mut self, f: impl Fn(&LoadedEvent) + Send + Sync + 'static) -> ListenerId {
        let id = self.next_id();
        self.loaded.push((id, Arc::new(f)));
        id
    }

    pub fn on_error(&mut self, f: impl Fn(&ErrorEvent) + Send + Sync + 'static) -> ListenerId {
        let id = self.next_id();
        self.error.push((id, Arc::new(f)));
        id
    }

    /// Removes a listener of any kind. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.len();
        self.loading.retain(|(i, _)| *i != id);
        self.loaded.retain(|(i, _)| *i != id);
        self.error.retain(|(i, _)| *i != id);
        self.len() != before
    }

    pub fn len(&self) -> usize {
        self.loading.len() + self.loaded.len() + self.error.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn loading(&self, event: &LoadingEvent) {
        for (_, f) in &self.loading {
            f(event);
        }
    }

    pub(crate) fn loaded(&self, event: &LoadedEvent) {
        for (_, f) in &self.loaded {
            f(event);
        }
    }

    pub(crate) fn error(&self, event: &ErrorEvent) {
        for (_, f) in &self.error {
            f(event);
        }
    }
}

impl core::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Notifier")
            .field("loading", &self.loading.len())
            .field("loaded", &self.loaded.len())
            .field("error", &self.error.len())
            .finish_non_exhaustive()
    }
}
