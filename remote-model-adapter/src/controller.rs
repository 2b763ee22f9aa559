use alloc::sync::Arc;
use alloc::vec::Vec;

use remote_model::{
    Error, Grid, Outcome, RemoteModel, RemoteModelOptions, Request, RequestId, Settlement,
    TransportError,
};

use crate::{JsonRecord, QueuedTransport, decode_reply};

/// Decides whether a transport failure should suspend the model.
pub type SuspendPredicate = Arc<dyn Fn(&TransportError) -> bool + Send + Sync>;

/// A framework-neutral controller that wraps a [`RemoteModel`] over JSON records and a
/// [`QueuedTransport`].
///
/// Adapters drive it by calling:
/// - `on_viewport_changed` when the grid scrolls or resizes
/// - `poll` each event-loop tick to get requests to start and ids to cancel
/// - `deliver` when an HTTP reply arrives, `deliver_failure` or `deliver_aborted` when none will
pub struct Controller<G> {
    model: RemoteModel<JsonRecord, G, QueuedTransport>,
    suspend_on: Option<SuspendPredicate>,
}

/// Work for the host's I/O layer, as returned by [`Controller::poll`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub start: Vec<(RequestId, Request)>,
    pub cancel: Vec<RequestId>,
}

impl Dispatch {
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.cancel.is_empty()
    }
}

impl<G: Grid> Controller<G> {
    pub fn new(options: RemoteModelOptions, grid: G) -> Self {
        Self {
            model: RemoteModel::new(options, grid, QueuedTransport::new()),
            suspend_on: None,
        }
    }

    /// Suspends the model when a failure matches `predicate`, e.g. a login page returned instead
    /// of JSON after the session expired. Resume with `model_mut().set_suspended(false)`.
    pub fn with_suspend_on(
        mut self,
        predicate: impl Fn(&TransportError) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.suspend_on = Some(Arc::new(predicate));
        self
    }

    pub fn model(&self) -> &RemoteModel<JsonRecord, G, QueuedTransport> {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut RemoteModel<JsonRecord, G, QueuedTransport> {
        &mut self.model
    }

    pub fn into_model(self) -> RemoteModel<JsonRecord, G, QueuedTransport> {
        self.model
    }

    /// Call this when the grid reports a viewport change.
    pub fn on_viewport_changed(&mut self) -> Option<RequestId> {
        self.model.viewport_changed(false)
    }

    /// Sets the `filter` parameter (free-text search) and refetches from the top when it changed.
    pub fn set_search(&mut self, text: &str) -> Option<RequestId> {
        self.model.set_filter_args([("filter", text)])
    }

    /// Takes the pending transport work.
    pub fn poll(&mut self) -> Dispatch {
        let transport = self.model.transport_mut();
        Dispatch {
            start: transport.take_outgoing(),
            cancel: transport.take_aborted(),
        }
    }

    /// Feeds an HTTP reply for request `id` into the model.
    ///
    /// Fails with [`Error::Cancelled`] when the reply belongs to a superseded request.
    pub fn deliver(&mut self, id: RequestId, status: u16, body: &str) -> Result<Settlement, Error> {
        self.complete(id, decode_reply(status, body))
    }

    /// Feeds a failure that produced no reply (network error, timeout) into the model.
    pub fn deliver_failure(
        &mut self,
        id: RequestId,
        error: TransportError,
    ) -> Result<Settlement, Error> {
        self.complete(id, Outcome::Failure(error))
    }

    /// Reports that the host gave up on request `id` without a reply (e.g. the page is
    /// navigating away). The model re-evaluates the viewport if `id` was current.
    pub fn deliver_aborted(&mut self, id: RequestId) -> Result<Settlement, Error> {
        self.complete(id, Outcome::Aborted)
    }

    fn complete(&mut self, id: RequestId, outcome: Outcome<JsonRecord>) -> Result<Settlement, Error> {
        let suspend = match (&outcome, &self.suspend_on) {
            (Outcome::Failure(err), Some(predicate)) => predicate(err),
            _ => false,
        };
        let settlement = self.model.complete(id, outcome)?;
        if suspend {
            #[cfg(feature = "tracing")]
            tracing::warn!(target: "remote_model", id = id.0, "suspending after failure");
            self.model.set_suspended(true);
        }
        Ok(settlement)
    }
}

impl<G: core::fmt::Debug> core::fmt::Debug for Controller<G> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Controller")
            .field("model", &self.model)
            .field("suspend_on", &self.suspend_on.is_some())
            .finish()
    }
}
