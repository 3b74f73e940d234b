//! Frame Stack and Sibling Counters
//!
//! One `Frame` per open element and one `CounterLevel` per nesting depth,
//! pushed and popped together. There is always one more level than there
//! are frames: the root level exists before the first element opens.

use std::collections::HashMap;
use std::ops::Range;

/// Bookkeeping for one open element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Local name of the element
    pub name: String,
    /// Same-named siblings opened before this one at this level
    pub occurrence_index: u32,
    /// Known at creation to be a repeated name (`occurrence_index > 0`)
    pub has_multiple: bool,
    /// Registry slot of this element's own entry
    pub entry: usize,
}

impl Frame {
    /// Create a frame for the `occurrence_index`-th sibling named `name`
    pub fn new(name: impl Into<String>, occurrence_index: u32, entry: usize) -> Self {
        Frame {
            name: name.into(),
            occurrence_index,
            has_multiple: occurrence_index > 0,
            entry,
        }
    }

    /// Whether the address segment for this frame carries `[index]`
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.has_multiple || self.occurrence_index > 0
    }
}

/// Where the first occurrence of a name was recorded
///
/// Kept until a second sibling appears, at which point every entry in
/// `entries` gets `[0]` inserted right after the first occurrence's own
/// segment, i.e. at byte `address_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstOccurrence {
    /// Registry slots recorded while the first occurrence was open
    pub entries: Range<usize>,
    /// Byte length of the first occurrence's unindexed address
    pub address_len: usize,
}

#[derive(Debug, Default)]
struct SiblingCount {
    seen: u32,
    first: Option<FirstOccurrence>,
}

/// Sibling counts for one nesting depth
#[derive(Debug, Default)]
pub struct CounterLevel {
    siblings: HashMap<String, SiblingCount>,
}

impl CounterLevel {
    /// Count another occurrence of `name`, returning how many were seen before
    pub fn bump(&mut self, name: &str) -> u32 {
        if let Some(count) = self.siblings.get_mut(name) {
            let seen = count.seen;
            count.seen += 1;
            return seen;
        }
        self.siblings.insert(
            name.to_owned(),
            SiblingCount {
                seen: 1,
                first: None,
            },
        );
        0
    }

    /// Occurrences of `name` opened so far at this level
    pub fn count(&self, name: &str) -> u32 {
        self.siblings.get(name).map_or(0, |c| c.seen)
    }

    /// Remember where the first occurrence of `name` was recorded
    pub fn note_first(&mut self, name: &str, entry: usize, address_len: usize) {
        if let Some(count) = self.siblings.get_mut(name) {
            count.first = Some(FirstOccurrence {
                entries: entry..entry + 1,
                address_len,
            });
        }
    }

    /// Extend the first occurrence's range to everything recorded up to `end`
    pub fn close_first(&mut self, name: &str, end: usize) {
        if let Some(first) = self.siblings.get_mut(name).and_then(|c| c.first.as_mut()) {
            first.entries.end = end.max(first.entries.end);
        }
    }

    /// Hand over the first occurrence record; only the second sibling needs it
    pub fn take_first(&mut self, name: &str) -> Option<FirstOccurrence> {
        self.siblings.get_mut(name).and_then(|c| c.first.take())
    }
}

/// Open frames plus the counter level for each depth
#[derive(Debug)]
pub struct FrameStack {
    frames: Vec<Frame>,
    levels: Vec<CounterLevel>,
}

impl FrameStack {
    /// Empty stack with the root counter level in place
    pub fn new() -> Self {
        FrameStack {
            frames: Vec::with_capacity(32),
            levels: vec![CounterLevel::default()],
        }
    }

    /// Current nesting depth
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open frames, root first
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Innermost open frame
    #[inline]
    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Counters for children of the innermost open frame
    pub fn level_mut(&mut self) -> &mut CounterLevel {
        if self.levels.is_empty() {
            self.levels.push(CounterLevel::default());
        }
        let last = self.levels.len() - 1;
        &mut self.levels[last]
    }

    /// Counters for the innermost frame and its siblings
    pub fn parent_level_mut(&mut self) -> Option<&mut CounterLevel> {
        let len = self.levels.len();
        if len < 2 {
            return None;
        }
        self.levels.get_mut(len - 2)
    }

    /// Open a frame and a fresh counter level for its children
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
        self.levels.push(CounterLevel::default());
    }

    /// Close the innermost frame, dropping its children's counters
    pub fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        self.levels.pop();
        Some(frame)
    }
}

impl Default for FrameStack {
    fn default() -> Self {
        Self::new()
    }
}
