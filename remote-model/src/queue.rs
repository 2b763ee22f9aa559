use crate::{Error, Request, RequestId, Transport};

/// Single-flight request bookkeeping: at most one request is current, and submitting a new one
/// aborts the previous one first.
#[derive(Clone, Debug, Default)]
pub struct RequestQueue {
    next_id: u64,
    active: Option<RequestId>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<RequestId> {
        self.active
    }

    pub fn has_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        self.active == Some(id)
    }

    /// Aborts the current request (if any), then sends `request` as the new current one.
    pub fn submit<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        request: &Request,
    ) -> RequestId {
        if self.abort(transport).is_some() {
            rdebug!("RequestQueue::submit: superseding active request");
        }
        self.next_id = self.next_id.wrapping_add(1);
        let id = RequestId(self.next_id);
        self.active = Some(id);
        rdebug!(
            id = id.0,
            method = request.method.as_str(),
            "RequestQueue::submit"
        );
        transport.send(id, request);
        id
    }

    /// Aborts the current request. Returns its id, or `None` when idle.
    pub fn abort<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Option<RequestId> {
        let id = self.active.take()?;
        transport.abort(id);
        Some(id)
    }

    /// Claims the terminal outcome of `id`.
    ///
    /// Succeeds at most once per request, and only while `id` is current; the queue is idle
    /// afterwards. Outcomes of superseded or aborted requests fail with [`Error::Cancelled`].
    pub fn settle(&mut self, id: RequestId) -> Result<(), Error> {
        if !self.is_current(id) {
            return Err(Error::Cancelled(id));
        }
        self.active = None;
        Ok(())
    }
}
