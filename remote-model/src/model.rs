use alloc::string::String;
use alloc::vec::Vec;

use crate::events::{ErrorEvent, LoadedEvent, LoadingEvent, ListenerId, Notifier};
use crate::key::Record;
use crate::queue::RequestQueue;
use crate::resolver::find_missing;
use crate::{
    Error, Grid, ModelState, Query, RecordCache, RemoteModelOptions, Request, RequestId, Response,
    RowRange, ScrollDirection, SelectionSync, SortDirection, Total, Transport, TransportError,
};

/// Terminal outcome of a request, as reported by the host's transport.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<R> {
    Success(Response<R>),
    Failure(TransportError),
    /// The transport gave up on the request without a real failure (e.g. the host aborted it).
    Aborted,
}

/// What [`RemoteModel::complete`] did with the outcome of the current request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// The response was applied. `follow_up` is the fetch issued by the viewport re-evaluation
    /// that follows every load.
    Loaded {
        range: Option<RowRange>,
        follow_up: Option<RequestId>,
    },
    /// A real failure was reported to error listeners. The viewport is not re-evaluated.
    Failed,
    /// Nothing was applied or reported; the viewport was re-evaluated.
    Aborted { follow_up: Option<RequestId> },
}

/// A remote data model for a virtualized grid.
///
/// The model owns a sparse cache of fetched rows and keeps at most one request outstanding. The
/// host drives it from a single logic thread:
/// - `viewport_changed` whenever the grid scrolls or resizes
/// - `complete` when the transport finishes a request
/// - `set_sorting` / `set_filter_args` / `clear_data` / `reset_data` when the dataset changes
///
/// Viewport changes reported while a request is in flight are dropped; once the request settles
/// (loaded or aborted) the model re-evaluates the viewport itself.
pub struct RemoteModel<R: Record, G, T> {
    options: RemoteModelOptions,
    cache: RecordCache<R>,
    queue: RequestQueue,
    scroll_position: Option<usize>,
    selection: Option<SelectionSync<R::Id>>,
    notifier: Notifier,
    suspended: bool,
    grid: G,
    transport: T,
}

impl<R: Record, G, T> RemoteModel<R, G, T> {
    pub fn options(&self) -> &RemoteModelOptions {
        &self.options
    }

    /// Read access to the cached rows. All mutation goes through the model.
    pub fn cache(&self) -> &RecordCache<R> {
        &self.cache
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.cache.get(index)
    }

    pub fn total(&self) -> Total {
        self.cache.total()
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn on_loading(&mut self, f: impl Fn(&LoadingEvent) + Send + Sync + 'static) -> ListenerId {
        self.notifier.on_loading(f)
    }

    pub fn on_loaded(&mut self, f: impl Fn(&LoadedEvent) + Send + Sync + 'static) -> ListenerId {
        self.notifier.on_loaded(f)
    }

    pub fn on_error(&mut self, f: impl Fn(&ErrorEvent) + Send + Sync + 'static) -> ListenerId {
        self.notifier.on_error(f)
    }

    pub fn scroll_position(&self) -> Option<usize> {
        self.scroll_position
    }

    pub fn state(&self) -> ModelState {
        ModelState {
            total: self.cache.total(),
            cached_rows: self.cache.len(),
            scroll_position: self.scroll_position,
            active_request: self.queue.active(),
            suspended: self.suspended,
        }
    }

    pub fn has_active_request(&self) -> bool {
        self.queue.has_active()
    }

    pub fn active_request(&self) -> Option<RequestId> {
        self.queue.active()
    }

    pub fn selection(&self) -> Option<&SelectionSync<R::Id>> {
        self.selection.as_ref()
    }
}

impl<R: Record, G: Grid, T: Transport> RemoteModel<R, G, T> {
    /// Creates a model with an empty cache and an unknown total.
    ///
    /// Nothing is fetched until the first `viewport_changed` call.
    pub fn new(options: RemoteModelOptions, grid: G, transport: T) -> Self {
        rdebug!(
            sort_column = ?options.sort_column,
            minimum_load = ?options.minimum_load,
            "RemoteModel::new"
        );
        Self {
            options,
            cache: RecordCache::new(),
            queue: RequestQueue::new(),
            scroll_position: None,
            selection: None,
            notifier: Notifier::new(),
            suspended: false,
            grid,
            transport,
        }
    }

    /// Aborts the outstanding request, if any. Its outcome will be ignored.
    pub fn abort_request(&mut self) -> Option<RequestId> {
        self.queue.abort(&mut self.transport)
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// While suspended no request is issued. Hosts set this after a failure they cannot recover
    /// from automatically (e.g. an expired session) and clear it once remedied.
    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    /// Handles a viewport change reported by the grid.
    ///
    /// Ignored while a request is in flight. Otherwise fetches the rows missing from the
    /// viewport, if any, and returns the id of the issued request.
    pub fn viewport_changed(&mut self, scroll_to_top: bool) -> Option<RequestId> {
        if self.queue.has_active() {
            rtrace!("viewport_changed: request in flight, ignored");
            return None;
        }
        let top = scroll_to_top.then_some(0);
        let query = self.missing_rows_in_viewport(top);
        self.ensure_data(query)
    }

    fn missing_rows_in_viewport(&mut self, top: Option<usize>) -> Option<Query> {
        let viewport = self.grid.viewport(top);
        if viewport.is_empty() {
            rdebug!(
                from = viewport.from,
                to = viewport.to,
                "viewport is empty, nothing to fetch"
            );
            return None;
        }
        let direction = ScrollDirection::between(self.scroll_position, viewport.from);
        let query = find_missing(&self.cache, viewport, direction, &self.options).ok()?;
        self.scroll_position = Some(viewport.from);
        query
    }

    /// The fetch needed to fill `range` when scanning in `direction`, or `None` if nothing is
    /// missing. Fails with [`Error::InvalidRange`] for an empty range.
    pub fn find_missing_data(
        &self,
        range: RowRange,
        direction: ScrollDirection,
    ) -> Result<Option<Query>, Error> {
        find_missing(&self.cache, range, direction, &self.options)
    }

    /// Aborts the outstanding request, then fetches `query` (if any) and emits a loading event.
    pub fn ensure_data(&mut self, query: Option<Query>) -> Option<RequestId> {
        self.abort_request();
        let query = query?;
        if self.suspended {
            rdebug!(from = query.from, to = query.to, "ensure_data: suspended");
            return None;
        }
        let request = Request {
            params: query.to_params(),
            ..Request::get(self.options.url.clone())
        };
        let id = self.queue.submit(&mut self.transport, &request);
        self.notifier.loading(&LoadingEvent {
            range: query.range(),
        });
        Some(id)
    }

    /// Drops every cached row, aborts the outstanding request, and re-evaluates the viewport
    /// (from the top with `scroll_to_top`).
    pub fn clear_data(&mut self, scroll_to_top: bool) -> Option<RequestId> {
        self.cache.clear();
        self.abort_request();
        self.retrigger_viewport(scroll_to_top)
    }

    /// Refetches the whole viewport regardless of what is cached.
    pub fn reset_data(&mut self) -> Option<RequestId> {
        self.abort_request();
        let viewport = self.grid.viewport(None);
        if viewport.is_empty() {
            return None;
        }
        let query = self.options.query(viewport.from, viewport.to);
        self.ensure_data(Some(query))
    }

    /// Applies rows to the cache directly (e.g. rows embedded in the initial page) and updates
    /// the grid's row count.
    pub fn load_data(&mut self, response: Response<R>) {
        self.apply_rows(response.range, response.total, response.records);
    }

    fn apply_rows(&mut self, range: Option<RowRange>, total: usize, records: Vec<R>) {
        let Some(range) = range else {
            return;
        };
        self.cache.patch(range, records, total);
        self.grid.set_row_count(self.cache.total());
        self.grid.render();
    }

    fn invalidate_rows(&mut self, range: RowRange) {
        for row in range.from..range.to {
            self.grid.invalidate_row(row);
        }
        self.grid.set_row_count(self.cache.total());
        self.grid.render();
    }

    /// Changes the sort order. Unchanged settings are a no-op; otherwise the cache is cleared.
    pub fn set_sorting(
        &mut self,
        sort_column: impl Into<String>,
        sort_direction: SortDirection,
    ) -> Option<RequestId> {
        let sort_column = sort_column.into();
        if self.options.sort_column.as_deref() == Some(sort_column.as_str())
            && self.options.sort_direction == sort_direction
        {
            return None;
        }
        self.options.sort_column = Some(sort_column);
        self.options.sort_direction = sort_direction;
        self.clear_data(false)
    }

    /// Merges filter parameters. If any value changed the cache is cleared and the grid is
    /// scrolled back to the top.
    pub fn set_filter_args<K, V>(
        &mut self,
        args: impl IntoIterator<Item = (K, V)>,
    ) -> Option<RequestId>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut changed = false;
        for (key, value) in args {
            let (key, value) = (key.into(), value.into());
            if self.options.extra_query.get(&key) != Some(&value) {
                self.options.extra_query.insert(key, value);
                changed = true;
            }
        }
        if !changed {
            return None;
        }
        self.clear_data(true)
    }

    /// Starts keeping the grid selection attached to record ids.
    ///
    /// After this, report user selection changes via `selected_rows_changed`; the model restores
    /// the selection after every load that carried rows.
    pub fn sync_grid_selection(&mut self, preserve_hidden: bool) {
        let mut sync = SelectionSync::new(preserve_hidden);
        sync.capture(&self.cache, &self.grid.selected_rows());
        self.selection = Some(sync);
    }

    /// Remembers the grid's current selection by record id.
    ///
    /// Safe to call for every selection event the grid raises, including the ones caused by the
    /// model restoring the selection itself.
    pub fn selected_rows_changed(&mut self) {
        if let Some(sync) = self.selection.as_mut() {
            if !sync.observe(&self.cache, self.grid.selected_rows()) {
                rtrace!("selected_rows_changed: echo of restored selection, ignored");
            }
        }
    }

    fn restore_selection(&mut self) {
        if let Some(sync) = self.selection.as_mut() {
            let rows = sync.restore(&self.cache);
            self.grid.set_selected_rows(rows);
        }
    }

    /// Sends a host request (e.g. a reorder action) through the single-flight queue.
    ///
    /// With `refresh`, the cache is cleared first and the fetch for the current viewport is merged
    /// into the request parameters, so the response repopulates the grid. Returns `None` while
    /// suspended.
    pub fn request(&mut self, mut request: Request, refresh: bool) -> Option<RequestId> {
        if self.suspended {
            rdebug!(method = request.method.as_str(), "request: suspended");
            return None;
        }
        self.abort_request();
        if refresh {
            self.cache.clear();
            if let Some(query) = self.missing_rows_in_viewport(None) {
                request.params.extend(query.to_params());
            }
        }
        Some(self.queue.submit(&mut self.transport, &request))
    }

    /// Feeds the terminal outcome of request `id` into the model.
    ///
    /// Fails with [`Error::Cancelled`] when `id` is not the current request (superseded, aborted,
    /// or already settled); such outcomes change nothing and notify nobody.
    pub fn complete(&mut self, id: RequestId, outcome: Outcome<R>) -> Result<Settlement, Error> {
        if let Err(err) = self.queue.settle(id) {
            rdebug!(id = id.0, "complete: stale outcome ignored");
            return Err(err);
        }

        match outcome {
            Outcome::Success(response) => {
                let Response {
                    range,
                    total,
                    records,
                    extra,
                } = response;
                self.apply_rows(range, total, records);
                if let Some(range) = range {
                    self.invalidate_rows(range);
                    self.restore_selection();
                }
                self.notifier.loaded(&LoadedEvent {
                    range,
                    total: self.cache.total(),
                    extra,
                });
                // Viewport changes were dropped while this request was in flight.
                let follow_up = self.retrigger_viewport(false);
                Ok(Settlement::Loaded { range, follow_up })
            }
            Outcome::Failure(error) => {
                rwarn!(id = id.0, %error, "request failed");
                self.notifier.error(&ErrorEvent { error });
                Ok(Settlement::Failed)
            }
            Outcome::Aborted => {
                let follow_up = self.retrigger_viewport(false);
                Ok(Settlement::Aborted { follow_up })
            }
        }
    }

    fn retrigger_viewport(&mut self, scroll_to_top: bool) -> Option<RequestId> {
        self.grid.viewport_changed(scroll_to_top);
        self.viewport_changed(scroll_to_top)
    }

    /// Aborts the outstanding request, drops the cache, and hands back the host capabilities.
    pub fn destroy(mut self) -> (G, T) {
        self.abort_request();
        self.cache.clear();
        (self.grid, self.transport)
    }
}

impl<R: Record, G: core::fmt::Debug, T: core::fmt::Debug> core::fmt::Debug for RemoteModel<R, G, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RemoteModel")
            .field("options", &self.options)
            .field("state", &self.state())
            .field("notifier", &self.notifier)
            .field("grid", &self.grid)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
