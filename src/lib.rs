//! XPathMap - Positional addresses for streamed XML
//!
//! Assigns every element of a document an XPath-like address
//! (`/a/b[1]/c`) in one left-to-right pass, and answers "which element
//! starts on line N" so a validator's line-only failure can be pointed at
//! an element.
//!
//! Strategies:
//! A: Single shot over a byte slice (map_document, address_at_line)
//! B: Chunk-fed streaming (StreamingTracker, track_reader)
//! C: Parallel over independent documents (map_documents_parallel)
//!
//! Diagnostics:
//! Locator + MessageRules turn `(line, column, message)` failures into
//! reports carrying the element address and a normalized message.

pub mod address;
mod core;
pub mod diagnostic;
pub mod error;
pub mod reader;
pub mod strategy;

#[cfg(feature = "nif")]
mod nif;
#[cfg(feature = "nif")]
mod resource;
#[cfg(feature = "nif")]
mod term;

pub use address::{drive, AddressTracker, OccurrenceEntry, OccurrenceRegistry, ScanTracker};
pub use diagnostic::{Locator, LocatorConfig, MessageRules, Report, ValidationFailure};
pub use error::{AddressError, Result};
pub use reader::{collect_events, ElementEvent};
pub use strategy::{map_documents_parallel, track_reader, StreamingTracker};

use crate::core::unified_scanner::UnifiedScanner;

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Strategy A: Single Shot
// ============================================================================

/// Map a complete document to its occurrence registry
pub fn map_document(input: &[u8]) -> Result<OccurrenceRegistry> {
    let mut handler = ScanTracker::new();
    UnifiedScanner::new(input).scan(&mut handler);
    handler.finish()
}

/// Address of the last element opened on `line`, if any
pub fn address_at_line(input: &[u8], line: u32) -> Result<Option<String>> {
    let registry = map_document(input)?;
    Ok(registry.address_at_line(line).map(str::to_owned))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_document() {
        let registry = map_document(b"<a>\n  <b/>\n  <b/>\n</a>").unwrap();
        let addresses: Vec<_> = registry.iter().map(|e| e.address.as_str()).collect();
        assert_eq!(addresses, vec!["/a", "/a/b[0]", "/a/b[1]"]);
    }

    #[test]
    fn test_address_at_line() {
        let doc = b"<a>\n  <b>\n    <c/>\n  </b>\n  <b/>\n</a>";
        assert_eq!(
            address_at_line(doc, 3).unwrap().as_deref(),
            Some("/a/b[0]/c")
        );
        assert_eq!(address_at_line(doc, 4).unwrap(), None);
        assert_eq!(address_at_line(doc, 99).unwrap(), None);
    }

    #[test]
    fn test_empty_name_is_error() {
        assert!(matches!(
            map_document(b"<a><x:/></a>"),
            Err(AddressError::EmptyName { line: 1 })
        ));
    }

    #[test]
    fn test_single_shot_matches_events() {
        let doc = b"<r><p:a/><a><b/></a></r>";
        let from_scan = map_document(doc).unwrap();
        let from_events = drive(collect_events(doc)).unwrap();
        assert_eq!(from_scan, from_events);
    }
}
