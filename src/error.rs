//! Error types
//!
//! Only contract violations and I/O surface as errors. Malformed close
//! events and lookup misses are ordinary outcomes and never reach here.

use thiserror::Error;

/// Errors produced while mapping a document or configuring reporting
#[derive(Debug, Error)]
pub enum AddressError {
    /// An element was opened with an empty local name (e.g. `<p:>`)
    #[error("empty element name on line {line}")]
    EmptyName { line: u32 },

    /// Reading from the underlying source failed
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// A message rule carries a pattern the regex engine rejects
    #[error("invalid message pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A rules document is not a list of `{pattern, replacement}` objects
    #[error("malformed message rules: {0}")]
    RulesFormat(#[from] serde_json::Error),

    /// A streaming tracker stopped at an earlier error and accepts no more input
    #[error("tracker stopped after an earlier error")]
    Poisoned,

    /// The tracker was already finished and holds no state
    #[error("tracker already finished")]
    Finished,
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, AddressError>;
