use alloc::collections::VecDeque;
use alloc::vec::Vec;

use remote_model::{Request, RequestId, Transport};

/// A transport that only records what should happen, for hosts that perform I/O from their own
/// event loop.
///
/// Each tick the host drains `take_outgoing` and starts those requests, drains `take_aborted` and
/// cancels those in flight, then feeds finished replies back into the model.
#[derive(Clone, Debug, Default)]
pub struct QueuedTransport {
    outgoing: VecDeque<(RequestId, Request)>,
    aborted: Vec<RequestId>,
}

impl QueuedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// Requests to start, oldest first.
    pub fn take_outgoing(&mut self) -> Vec<(RequestId, Request)> {
        self.outgoing.drain(..).collect()
    }

    /// Ids of started requests to cancel.
    pub fn take_aborted(&mut self) -> Vec<RequestId> {
        core::mem::take(&mut self.aborted)
    }
}

impl Transport for QueuedTransport {
    fn send(&mut self, id: RequestId, request: &Request) {
        self.outgoing.push_back((id, request.clone()));
    }

    fn abort(&mut self, id: RequestId) {
        // Never started: drop it silently.
        let before = self.outgoing.len();
        self.outgoing.retain(|(pending, _)| *pending != id);
        if self.outgoing.len() == before {
            self.aborted.push(id);
        }
    }
}
