//! Positional Addressing
//!
//! Assigns every element occurrence an XPath-like address while the
//! document streams past, in a single left-to-right pass.
//!
//! ## Architecture
//!
//! ```text
//! ElementEvent ---> AddressTracker ---> FrameStack + CounterLevel[]
//!                        |                     |
//!                        |                     v
//!                        |               builder::render
//!                        v                     |
//!                 OccurrenceRegistry <---------+
//!                 (append, backfill [0])
//! ```
//!
//! ## Deferred indexing
//!
//! The first occurrence of a name is recorded without an index, because at
//! that point nobody knows whether a sibling will follow. When the second
//! occurrence opens, the first occurrence's entry and every entry recorded
//! inside it are rewritten to carry `[0]`. Third and later occurrences are
//! indexed as they open and never trigger a rewrite.

pub mod builder;
pub mod frame;
pub mod registry;
pub mod tracker;

pub use frame::{Frame, FrameStack};
pub use registry::{EntryKey, OccurrenceEntry, OccurrenceRegistry};
pub use tracker::{drive, AddressTracker, ScanTracker};
