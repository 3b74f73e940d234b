//! Occurrence Registry
//!
//! Append-only record of every element start and the address it had when
//! it opened. Keys never change; values change only through `backfill`,
//! which patches the entries of a first occurrence's subtree once a second
//! sibling proves the name repeats.
//!
//! Entries are stored in sequence order, so a subtree is a contiguous slot
//! range and the rewrite touches exactly the entries recorded while that
//! element was open. No textual search is involved, so an unrelated element
//! whose path happens to read the same is never touched.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use super::builder::FIRST_INDEX;
use super::frame::FirstOccurrence;

/// Identity of an entry: `(line, sequence, name)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKey<'a> {
    pub line: u32,
    pub sequence: u64,
    pub name: &'a str,
}

impl fmt::Display for EntryKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.line, self.sequence, self.name)
    }
}

/// One recorded element start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceEntry {
    /// 1-based line of the start tag
    pub line: u32,
    /// Position among all start events, starting at 1
    pub sequence: u64,
    /// Local name of the element
    pub name: String,
    /// Address as currently known
    pub address: String,
}

impl OccurrenceEntry {
    /// The entry's immutable key
    pub fn key(&self) -> EntryKey<'_> {
        EntryKey {
            line: self.line,
            sequence: self.sequence,
            name: &self.name,
        }
    }
}

/// All entries of one document, plus a line index for lookups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceRegistry {
    entries: Vec<OccurrenceEntry>,
    /// line -> slot of the latest entry starting on that line
    last_on_line: HashMap<u32, usize>,
    corrections: usize,
}

impl OccurrenceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded entries
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing was recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot the next recorded entry will occupy
    #[inline]
    pub fn next_slot(&self) -> usize {
        self.entries.len()
    }

    /// Append an entry, returning its sequence ordinal
    pub fn record(&mut self, line: u32, name: &str, address: &str) -> u64 {
        let slot = self.entries.len();
        let sequence = slot as u64 + 1;
        trace!(line, sequence, address, "recorded element");

        self.entries.push(OccurrenceEntry {
            line,
            sequence,
            name: name.to_owned(),
            address: address.to_owned(),
        });
        // Later entries win: sequence only grows
        self.last_on_line.insert(line, slot);
        sequence
    }

    /// Insert `[0]` after a first occurrence's segment in every entry of its
    /// subtree. Returns the number of entries rewritten.
    pub fn backfill(&mut self, first: &FirstOccurrence) -> usize {
        let end = first.entries.end.min(self.entries.len());
        let start = first.entries.start.min(end);
        let at = first.address_len;

        let mut rewritten = 0;
        for entry in &mut self.entries[start..end] {
            if entry.address.is_char_boundary(at) {
                entry.address.insert_str(at, FIRST_INDEX);
                rewritten += 1;
            }
        }
        self.corrections += 1;
        rewritten
    }

    /// Number of times a backfill fired
    #[inline]
    pub fn corrections(&self) -> usize {
        self.corrections
    }

    /// All entries in ascending sequence order
    #[inline]
    pub fn entries(&self) -> &[OccurrenceEntry] {
        &self.entries
    }

    /// Iterate entries in ascending sequence order
    pub fn iter(&self) -> std::slice::Iter<'_, OccurrenceEntry> {
        self.entries.iter()
    }

    /// Entry with the given sequence ordinal
    pub fn get(&self, sequence: u64) -> Option<&OccurrenceEntry> {
        let slot = usize::try_from(sequence.checked_sub(1)?).ok()?;
        self.entries.get(slot)
    }

    /// Latest entry whose start tag is on `line`.
    ///
    /// "Latest wins" is a heuristic: a failure reported against a line is
    /// attributed to the last element opened there, which is not
    /// necessarily the element the validator was looking at.
    pub fn entry_at_line(&self, line: u32) -> Option<&OccurrenceEntry> {
        self.last_on_line
            .get(&line)
            .and_then(|&slot| self.entries.get(slot))
    }

    /// Address of the latest element opened on `line`
    pub fn address_at_line(&self, line: u32) -> Option<&str> {
        self.entry_at_line(line).map(|e| e.address.as_str())
    }

    /// Take the entries, dropping the line index
    pub fn into_entries(self) -> Vec<OccurrenceEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a OccurrenceRegistry {
    type Item = &'a OccurrenceEntry;
    type IntoIter = std::slice::Iter<'a, OccurrenceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
