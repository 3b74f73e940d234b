//! Event Driver
//!
//! Consumes element events in document order and keeps the frame stack,
//! the sibling counters and the registry in step. Each document needs its
//! own tracker; nothing here is shared between documents.

use tracing::{debug, warn};

use super::builder;
use super::frame::{Frame, FrameStack};
use super::registry::OccurrenceRegistry;
use crate::core::unified_scanner::ScanHandler;
use crate::error::{AddressError, Result};
use crate::reader::events::{local_name, ElementEvent};

/// Single-pass address tracker for one document
#[derive(Debug)]
pub struct AddressTracker {
    stack: FrameStack,
    registry: OccurrenceRegistry,
    current: String,
}

impl AddressTracker {
    /// Fresh tracker positioned at the document root
    pub fn new() -> Self {
        AddressTracker {
            stack: FrameStack::new(),
            registry: OccurrenceRegistry::new(),
            current: builder::ROOT.to_string(),
        }
    }

    /// Handle a start-element event. Returns the sequence ordinal recorded.
    pub fn open(&mut self, name: &str, line: u32) -> Result<u64> {
        if name.is_empty() {
            return Err(AddressError::EmptyName { line });
        }

        let slot = self.registry.next_slot();
        let level = self.stack.level_mut();
        let seen = level.bump(name);

        // Second sibling: the first one's subtree must now say [0]
        if seen == 1 {
            if let Some(first) = level.take_first(name) {
                let rewritten = self.registry.backfill(&first);
                debug!(
                    name,
                    parent = %self.current,
                    rewritten,
                    "name repeats at this level; indexed first occurrence"
                );
            }
        }

        self.stack.push(Frame::new(name, seen, slot));
        builder::render_into(self.stack.frames(), &mut self.current);

        if seen == 0 {
            if let Some(level) = self.stack.parent_level_mut() {
                level.note_first(name, slot, self.current.len());
            }
        }

        Ok(self.registry.record(line, name, &self.current))
    }

    /// Handle an end-element event.
    ///
    /// A close with nothing open, or naming an element other than the
    /// innermost open one, is skipped: matching tags is the producer's job.
    pub fn close(&mut self, name: Option<&str>, line: u32) {
        let Some(top) = self.stack.top() else {
            warn!(line, "close event with no open element; skipped");
            return;
        };
        if let Some(name) = name {
            if name != top.name {
                warn!(line, expected = %top.name, found = name, "mismatched close event; skipped");
                return;
            }
        }

        if let Some(frame) = self.stack.pop() {
            if frame.occurrence_index == 0 {
                let end = self.registry.next_slot();
                self.stack.level_mut().close_first(&frame.name, end);
            }
        }
        builder::render_into(self.stack.frames(), &mut self.current);
    }

    /// Dispatch one event
    pub fn handle(&mut self, event: &ElementEvent) -> Result<()> {
        match event {
            ElementEvent::Open { name, line } => self.open(name, *line).map(|_| ()),
            ElementEvent::Close { name, line } => {
                self.close(name.as_deref(), *line);
                Ok(())
            }
        }
    }

    /// Address of the innermost open element, or `/`
    #[inline]
    pub fn current_address(&self) -> &str {
        &self.current
    }

    /// Current nesting depth
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Entries recorded so far
    #[inline]
    pub fn registry(&self) -> &OccurrenceRegistry {
        &self.registry
    }

    /// End of input: discard nesting state and hand over the registry
    pub fn finish(self) -> OccurrenceRegistry {
        if self.stack.depth() > 0 {
            debug!(
                open = self.stack.depth(),
                address = %self.current,
                "document ended with open elements"
            );
        }
        debug!(
            entries = self.registry.len(),
            corrections = self.registry.corrections(),
            "address map complete"
        );
        self.registry
    }
}

impl Default for AddressTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Run a tracker over an event sequence
pub fn drive<I>(events: I) -> Result<OccurrenceRegistry>
where
    I: IntoIterator<Item = ElementEvent>,
{
    let mut tracker = AddressTracker::new();
    for event in events {
        tracker.handle(&event)?;
    }
    Ok(tracker.finish())
}

/// ScanHandler adapter feeding scanned tags into an AddressTracker.
///
/// Handler methods cannot fail, so the first error is parked here and
/// every later event is ignored.
#[derive(Debug, Default)]
pub struct ScanTracker {
    tracker: AddressTracker,
    error: Option<AddressError>,
}

impl ScanTracker {
    /// Adapter around a fresh tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter around a tracker that may already hold open elements
    pub fn with_tracker(tracker: AddressTracker) -> Self {
        ScanTracker {
            tracker,
            error: None,
        }
    }

    /// The wrapped tracker
    pub fn tracker(&self) -> &AddressTracker {
        &self.tracker
    }

    /// The wrapped tracker, for injecting events outside the scan
    pub fn tracker_mut(&mut self) -> &mut AddressTracker {
        &mut self.tracker
    }

    /// Remove a parked error, if any
    pub fn take_error(&mut self) -> Option<AddressError> {
        self.error.take()
    }

    /// Surface a parked error or hand over the registry
    pub fn finish(self) -> Result<OccurrenceRegistry> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tracker.finish()),
        }
    }
}

impl ScanHandler for ScanTracker {
    fn start_element(&mut self, name: &[u8], line: u32, _is_empty: bool) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.tracker.open(&local_name(name), line) {
            self.error = Some(err);
        }
    }

    fn end_element(&mut self, name: &[u8], line: u32) {
        if self.error.is_some() {
            return;
        }
        self.tracker.close(Some(&local_name(name)), line);
    }
}
