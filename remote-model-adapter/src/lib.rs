//! Host-side utilities for the `remote-model` crate.
//!
//! The `remote-model` crate is transport- and UI-agnostic. This crate provides the pieces most
//! hosts need around it:
//!
//! - JSON records and the `{ from, to, total, records }` response format
//! - A queued transport for hosts that do their I/O from an event loop
//! - A controller that ties both to a model and can suspend it on unrecoverable failures
//!
//! This crate does not perform HTTP itself.
#![forbid(unsafe_code)]

extern crate alloc;

mod controller;
mod record;
mod transport;
mod wire;

#[cfg(test)]
mod tests;

pub use controller::{Controller, Dispatch, SuspendPredicate};
pub use record::JsonRecord;
pub use transport::QueuedTransport;
pub use wire::{decode_reply, decode_response, params_to_json, query_pairs};
