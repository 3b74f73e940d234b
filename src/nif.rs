//! BEAM host binding
//!
//! Exposes the address map to Elixir as `XPathMap.Native`.

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

use crate::resource::{TrackerRef, TrackerResource};
use crate::term::{
    address_to_term, error_to_term, mutex_poisoned, ok, registry_to_term,
};

// ============================================================================
// Single Shot
// ============================================================================

/// Map a whole document: `{:ok, [%{line, sequence, name, address}]}`
#[rustler::nif(schedule = "DirtyCpu")]
fn address_map<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    match crate::map_document(input.as_slice()) {
        Ok(registry) => Ok((ok(), registry_to_term(env, &registry)).encode(env)),
        Err(err) => Ok(error_to_term(env, &err)),
    }
}

/// Address of the last element opened on `line`, or nil
#[rustler::nif(schedule = "DirtyCpu")]
fn address_at_line<'a>(env: Env<'a>, input: Binary<'a>, line: u32) -> NifResult<Term<'a>> {
    match crate::address_at_line(input.as_slice(), line) {
        Ok(address) => Ok(address_to_term(env, address.as_deref())),
        Err(err) => Ok(error_to_term(env, &err)),
    }
}

// ============================================================================
// Streaming Tracker
// ============================================================================

/// Create a new streaming tracker
#[rustler::nif]
fn tracker_new() -> TrackerRef {
    ResourceArc::new(TrackerResource::new())
}

/// Feed a chunk: `:ok` or `{:error, reason}`
#[rustler::nif]
fn tracker_feed<'a>(env: Env<'a>, tracker: TrackerRef, chunk: Binary<'a>) -> NifResult<Term<'a>> {
    match tracker.with_tracker(|inner| inner.feed(chunk.as_slice())) {
        Ok(Ok(())) => Ok(ok().encode(env)),
        Ok(Err(err)) => Ok(error_to_term(env, &err)),
        Err(_) => Ok((crate::term::error(), mutex_poisoned()).encode(env)),
    }
}

/// Finish the tracker: `{:ok, entries}` or `{:error, reason}`
#[rustler::nif]
fn tracker_finish<'a>(env: Env<'a>, tracker: TrackerRef) -> NifResult<Term<'a>> {
    let inner = match tracker.take() {
        Ok(Ok(inner)) => inner,
        Ok(Err(err)) => return Ok(error_to_term(env, &err)),
        Err(_) => return Ok((crate::term::error(), mutex_poisoned()).encode(env)),
    };
    match inner.finish() {
        Ok(registry) => Ok((ok(), registry_to_term(env, &registry)).encode(env)),
        Err(err) => Ok(error_to_term(env, &err)),
    }
}

// ============================================================================
// NIF Initialization
// ============================================================================

// TrackerResource is registered via #[rustler::resource_impl]
fn load(_env: Env, _info: Term) -> bool {
    true
}

rustler::init!("Elixir.XPathMap.Native", load = load);
