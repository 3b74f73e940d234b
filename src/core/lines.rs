//! Line tracking for byte offsets
//!
//! Counts `\n` bytes with memchr between successive offsets, so a forward
//! scan pays for each byte once no matter how many tags it reports.

use memchr::memchr_iter;

/// Forward-only byte offset to 1-based line mapper
#[derive(Debug, Clone, Copy)]
pub struct LineCounter {
    line: u32,
    pos: usize,
}

impl LineCounter {
    /// Counter positioned at the start of a document
    #[inline]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Counter whose offset 0 lies on `line` (resuming a stream mid-document)
    #[inline]
    pub fn starting_at(line: u32) -> Self {
        LineCounter { line, pos: 0 }
    }

    /// Line of the byte at `offset`.
    ///
    /// Offsets must not decrease between calls; an offset behind the last
    /// one answers with the last known line.
    pub fn line_at(&mut self, input: &[u8], offset: usize) -> u32 {
        let offset = offset.min(input.len());
        if offset > self.pos {
            let newlines = memchr_iter(b'\n', &input[self.pos..offset]).count();
            self.line = self.line.saturating_add(newlines as u32);
            self.pos = offset;
        }
        self.line
    }

    /// Last computed line
    #[inline]
    pub fn current(&self) -> u32 {
        self.line
    }
}

impl Default for LineCounter {
    fn default() -> Self {
        Self::new()
    }
}
