//! A headless remote data model for virtualized grids.
//!
//! For host-side helpers (JSON wire format, queued transport, controller), see the
//! `remote-model-adapter` crate.
//!
//! This crate focuses on the data side of scrolling through a large, server-resident, sortable and
//! filterable record set: a sparse row cache, the computation of which rows a viewport is missing,
//! and a single-flight request queue that ignores superseded responses. Row selection follows
//! record ids across re-sorts and reloads.
//!
//! It is UI-agnostic. A host grid is expected to provide (see [`Grid`]):
//! - the visible row range
//! - row invalidation and the row count
//! - the selected rows
//!
//! and a [`Transport`] that delivers requests and reports their outcome back via
//! [`RemoteModel::complete`].
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod error;
mod events;
mod host;
mod key;
mod model;
mod options;
mod queue;
mod resolver;
mod selection;
mod state;
mod types;


pub use cache::RecordCache;
pub use error::{Error, TransportError, TransportErrorKind};
pub use events::{
    ErrorEvent, ErrorListener, ListenerId, LoadedEvent, LoadedListener, LoadingEvent,
    LoadingListener, Notifier,
};
pub use host::{Grid, Transport};
pub use key::{Record, RecordId};
pub use model::{Outcome, RemoteModel, Settlement};
pub use options::RemoteModelOptions;
pub use queue::RequestQueue;
pub use resolver::find_missing;
pub use selection::SelectionSync;
pub use state::ModelState;
pub use types::{
    Method, Query, Request, RequestId, Response, RowRange, ScrollDirection, SortDirection, Total,
};
