//! Element Event Types
//!
//! The event vocabulary the address tracker consumes: an element opened or
//! closed, with its local name and source line.

use std::borrow::Cow;

use crate::core::unified_scanner::{ScanHandler, UnifiedScanner};

/// One element boundary in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementEvent {
    /// Start of an element: `<name ...>` or the opening half of `<name/>`
    Open { name: String, line: u32 },
    /// End of an element. Producers that cannot report the name may omit it.
    Close { name: Option<String>, line: u32 },
}

impl ElementEvent {
    /// Open event for `name` on `line`
    pub fn open(name: impl Into<String>, line: u32) -> Self {
        ElementEvent::Open {
            name: name.into(),
            line,
        }
    }

    /// Close event for `name` on `line`
    pub fn close(name: impl Into<String>, line: u32) -> Self {
        ElementEvent::Close {
            name: Some(name.into()),
            line,
        }
    }

    /// Source line of the event
    pub fn line(&self) -> u32 {
        match self {
            ElementEvent::Open { line, .. } | ElementEvent::Close { line, .. } => *line,
        }
    }

    /// Check if this is an open event
    pub fn is_open(&self) -> bool {
        matches!(self, ElementEvent::Open { .. })
    }
}

/// Split a name into prefix and local name at the colon
fn split_name(name: &[u8]) -> (Option<&[u8]>, &[u8]) {
    if let Some(pos) = memchr::memchr(b':', name) {
        (Some(&name[..pos]), &name[pos + 1..])
    } else {
        (None, name)
    }
}

/// Local part of a possibly prefixed name, as text
pub fn local_name(name: &[u8]) -> Cow<'_, str> {
    let (_, local) = split_name(name);
    String::from_utf8_lossy(local)
}

/// ScanHandler that materialises events
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<ElementEvent>,
}

impl EventCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the collected events
    pub fn into_events(self) -> Vec<ElementEvent> {
        self.events
    }
}

impl ScanHandler for EventCollector {
    fn start_element(&mut self, name: &[u8], line: u32, _is_empty: bool) {
        self.events.push(ElementEvent::open(local_name(name), line));
    }

    fn end_element(&mut self, name: &[u8], line: u32) {
        self.events.push(ElementEvent::close(local_name(name), line));
    }
}

/// Scan a complete document and return its element events
pub fn collect_events(input: &[u8]) -> Vec<ElementEvent> {
    let mut collector = EventCollector::new();
    UnifiedScanner::new(input).scan(&mut collector);
    collector.into_events()
}
