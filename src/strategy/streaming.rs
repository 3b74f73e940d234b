//! Streaming Address Mapping
//!
//! Feeds a document in chunks of any size. Each feed scans as far as the
//! buffered bytes allow and keeps only the unfinished tail (a tag, comment
//! or similar construct split by the chunk boundary), so memory is bounded
//! by the largest single construct rather than the document.

use std::io::{ErrorKind, Read};

use crate::address::{OccurrenceRegistry, ScanTracker};
use crate::core::unified_scanner::UnifiedScanner;
use crate::error::{AddressError, Result};

/// Chunk size used when pulling from a reader
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Stateful chunk-fed address mapper
#[derive(Debug)]
pub struct StreamingTracker {
    /// Unconsumed tail carried between feeds
    buffer: Vec<u8>,
    /// Line on which `buffer[0]` lies
    line: u32,
    handler: ScanTracker,
    poisoned: bool,
}

impl StreamingTracker {
    /// Create a new streaming tracker
    pub fn new() -> Self {
        Self::with_handler(ScanTracker::new())
    }

    /// Streaming tracker around a prepared handler
    pub fn with_handler(handler: ScanTracker) -> Self {
        StreamingTracker {
            buffer: Vec::with_capacity(DEFAULT_CHUNK_SIZE),
            line: 1,
            handler,
            poisoned: false,
        }
    }

    /// Feed a chunk of data
    pub fn feed(&mut self, chunk: &[u8]) -> Result<()> {
        if self.poisoned {
            return Err(AddressError::Poisoned);
        }
        self.buffer.extend_from_slice(chunk);

        let mut scanner = UnifiedScanner::partial(&self.buffer, self.line);
        let consumed = scanner.scan(&mut self.handler);
        self.line = scanner.line_at(consumed);
        self.buffer.drain(..consumed);

        if let Some(err) = self.handler.take_error() {
            self.poisoned = true;
            return Err(err);
        }
        Ok(())
    }

    /// Bytes held back waiting for the rest of a construct
    #[inline]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Entries recorded so far
    pub fn registry(&self) -> &OccurrenceRegistry {
        self.handler.tracker().registry()
    }

    /// Address of the innermost open element
    pub fn current_address(&self) -> &str {
        self.handler.tracker().current_address()
    }

    /// Scan whatever is left and hand over the registry
    pub fn finish(mut self) -> Result<OccurrenceRegistry> {
        if self.poisoned {
            return Err(AddressError::Poisoned);
        }
        if !self.buffer.is_empty() {
            UnifiedScanner::tail(&self.buffer, self.line).scan(&mut self.handler);
        }
        self.handler.finish()
    }
}

impl Default for StreamingTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a document read from any `Read` source
pub fn track_reader<R: Read>(reader: R) -> Result<OccurrenceRegistry> {
    track_reader_with(reader, DEFAULT_CHUNK_SIZE)
}

/// Map a document read in chunks of `chunk_size` bytes
pub fn track_reader_with<R: Read>(mut reader: R, chunk_size: usize) -> Result<OccurrenceRegistry> {
    let mut tracker = StreamingTracker::new();
    let mut chunk = vec![0u8; chunk_size.max(1)];

    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        tracker.feed(&chunk[..read])?;
    }

    tracker.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn addresses(registry: &OccurrenceRegistry) -> Vec<(u32, String)> {
        registry
            .iter()
            .map(|e| (e.line, e.address.clone()))
            .collect()
    }

    #[test]
    fn test_streaming_simple() {
        let mut tracker = StreamingTracker::new();
        tracker.feed(b"<root>\n").unwrap();
        tracker.feed(b"<item/>\n").unwrap();
        tracker.feed(b"<item/>\n</root>").unwrap();

        let registry = tracker.finish().unwrap();
        assert_eq!(
            addresses(&registry),
            vec![
                (1, "/root".to_string()),
                (2, "/root/item[0]".to_string()),
                (3, "/root/item[1]".to_string()),
            ]
        );
    }

    #[test]
    fn test_streaming_split_tags() {
        let mut tracker = StreamingTracker::new();
        tracker.feed(b"<ro").unwrap();
        assert_eq!(tracker.pending(), 3);
        tracker.feed(b"ot><i").unwrap();
        assert_eq!(tracker.current_address(), "/root");
        tracker.feed(b"tem/></root>").unwrap();
        assert_eq!(tracker.pending(), 0);

        let registry = tracker.finish().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.address_at_line(1), Some("/root/item"));
    }

    #[test]
    fn test_streaming_split_comment_hides_markup() {
        let mut tracker = StreamingTracker::new();
        tracker.feed(b"<a><!-- <b> ").unwrap();
        tracker.feed(b"--></a>").unwrap();
        let registry = tracker.finish().unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_streaming_line_carry_over() {
        let mut tracker = StreamingTracker::new();
        tracker.feed(b"<a>\n\n<b").unwrap();
        tracker.feed(b"/>\n<c/></a>").unwrap();
        let registry = tracker.finish().unwrap();
        assert_eq!(registry.address_at_line(3), Some("/a/b"));
        assert_eq!(registry.address_at_line(4), Some("/a/c"));
    }

    #[test]
    fn test_streaming_error_poisons() {
        let mut tracker = StreamingTracker::new();
        assert!(matches!(
            tracker.feed(b"<a><x:></x:>"),
            Err(AddressError::EmptyName { line: 1 })
        ));
        assert!(matches!(tracker.feed(b"<b/>"), Err(AddressError::Poisoned)));
        assert!(matches!(tracker.finish(), Err(AddressError::Poisoned)));
    }

    #[test]
    fn test_track_reader_small_chunks() {
        let doc = b"<a>\n  <b><c/></b>\n  <b/>\n</a>\n".to_vec();
        let registry = track_reader_with(Cursor::new(doc), 3).unwrap();
        assert_eq!(
            addresses(&registry),
            vec![
                (1, "/a".to_string()),
                (2, "/a/b[0]".to_string()),
                (2, "/a/b[0]/c".to_string()),
                (3, "/a/b[1]".to_string()),
            ]
        );
    }

    #[test]
    fn test_track_reader_default_chunks() {
        let registry = track_reader(Cursor::new(b"<a><b/></a>".to_vec())).unwrap();
        assert_eq!(registry.address_at_line(1), Some("/a/b"));
    }
}
