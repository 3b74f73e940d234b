//! Elixir Term Conversion Utilities
//!
//! Converts address maps and errors to Elixir terms.

use rustler::{Encoder, Env, NewBinary, Term};

use crate::address::{OccurrenceEntry, OccurrenceRegistry};
use crate::error::AddressError;

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    line,
    sequence,
    name,
    address,
    mutex_poisoned,
    finished,
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// Convert one entry to `%{line: .., sequence: .., name: .., address: ..}`
pub fn entry_to_term<'a>(env: Env<'a>, entry: &OccurrenceEntry) -> Term<'a> {
    let pairs = [
        (line().encode(env), entry.line.encode(env)),
        (sequence().encode(env), entry.sequence.encode(env)),
        (name().encode(env), str_to_binary(env, &entry.name)),
        (address().encode(env), str_to_binary(env, &entry.address)),
    ];
    // Distinct atom keys cannot collide; fall back to a tuple regardless
    Term::map_from_pairs(env, &pairs).unwrap_or_else(|_| {
        (
            entry.line,
            entry.sequence,
            str_to_binary(env, &entry.name),
            str_to_binary(env, &entry.address),
        )
            .encode(env)
    })
}

/// Convert a registry to a list of entry maps in sequence order
pub fn registry_to_term<'a>(env: Env<'a>, registry: &OccurrenceRegistry) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for entry in registry.entries().iter().rev() {
        list = list.list_prepend(entry_to_term(env, entry));
    }
    list
}

/// Convert an address lookup to a binary or nil
pub fn address_to_term<'a>(env: Env<'a>, address: Option<&str>) -> Term<'a> {
    match address {
        Some(address) => str_to_binary(env, address),
        None => rustler::types::atom::nil().encode(env),
    }
}

/// `{:error, reason}` with the error's message as a binary
pub fn error_to_term<'a>(env: Env<'a>, err: &AddressError) -> Term<'a> {
    let reason = match err {
        AddressError::Finished => finished().encode(env),
        other => str_to_binary(env, &other.to_string()),
    };
    (error(), reason).encode(env)
}
