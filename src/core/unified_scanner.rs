//! Element Scanner with ScanHandler Trait
//!
//! Tokenizes just enough XML to report element boundaries with their
//! source lines. Comments, CDATA, processing instructions, DOCTYPE and
//! text are skipped, so markup inside them never yields element events.
//!
//! The scanner is lenient: it does not check well-formedness. In partial
//! mode it stops at the first construct the input does not yet finish and
//! reports where that construct began, letting a stream resume there once
//! more bytes arrive.

use super::lines::LineCounter;
use super::scanner::{is_name_start_char, Scanner};

/// Trait for receiving element events
///
/// Names are passed as raw bytes exactly as written in the tag, including
/// any namespace prefix. `line` is the 1-based line of the tag's `<`.
pub trait ScanHandler {
    /// Called when an element opens. Self-closing elements (`<br/>`)
    /// arrive with `is_empty` set and are followed by `end_element`.
    fn start_element(&mut self, name: &[u8], line: u32, is_empty: bool);

    /// Called when an element closes
    fn end_element(&mut self, name: &[u8], line: u32);
}

/// Scanner that dispatches element boundaries to a ScanHandler
pub struct UnifiedScanner<'a> {
    input: &'a [u8],
    scanner: Scanner<'a>,
    lines: LineCounter,
    partial: bool,
}

impl<'a> UnifiedScanner<'a> {
    /// Scanner over a complete document
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            scanner: Scanner::new(input),
            lines: LineCounter::new(),
            partial: false,
        }
    }

    /// Scanner over a prefix of a stream whose first byte lies on `first_line`
    pub fn partial(input: &'a [u8], first_line: u32) -> Self {
        Self {
            input,
            scanner: Scanner::new(input),
            lines: LineCounter::starting_at(first_line),
            partial: true,
        }
    }

    /// Scanner over the final piece of a stream whose first byte lies on `first_line`
    pub fn tail(input: &'a [u8], first_line: u32) -> Self {
        Self {
            partial: false,
            ..Self::partial(input, first_line)
        }
    }

    /// Scan, calling handler methods for each element boundary.
    ///
    /// Returns the number of bytes consumed. Outside partial mode this is
    /// always the input length.
    pub fn scan<H: ScanHandler>(&mut self, handler: &mut H) -> usize {
        while let Some(lt) = self.scanner.find_byte(b'<') {
            self.scanner.set_position(lt);
            if !self.scan_markup(handler) {
                return lt;
            }
        }
        self.scanner.exhaust();
        self.input.len()
    }

    /// Line of the byte at `offset`; must not precede the last tag reported
    pub fn line_at(&mut self, offset: usize) -> u32 {
        self.lines.line_at(self.input, offset)
    }

    /// Scan markup starting with '<'. Returns false when the construct is
    /// unfinished in partial mode; the position is then left at its start.
    fn scan_markup<H: ScanHandler>(&mut self, handler: &mut H) -> bool {
        let start = self.scanner.position();
        self.scanner.advance(1);

        match self.scanner.peek() {
            None => self.unfinished(start),
            Some(b'/') => {
                self.scanner.advance(1);
                self.scan_end_tag(start, handler)
            }
            Some(b'!') => {
                self.scanner.advance(1);
                self.scan_declaration(start)
            }
            Some(b'?') => {
                self.scanner.advance(1);
                self.skip_past(start, b"?>")
            }
            Some(c) if is_name_start_char(c) => self.scan_start_tag(start, handler),
            Some(_) => {
                // Stray '<' (e.g. "<1invalid/>") is text; resume after it
                true
            }
        }
    }

    /// Scan a start tag; `start` is the offset of its '<'
    fn scan_start_tag<H: ScanHandler>(&mut self, start: usize, handler: &mut H) -> bool {
        let Some(name) = self.scanner.read_name() else {
            return true;
        };

        let Some(gt) = self.scanner.find_tag_end_quoted() else {
            return self.unfinished(start);
        };

        let is_empty = gt > start && self.input[gt - 1] == b'/';
        self.scanner.set_position(gt + 1);

        let line = self.lines.line_at(self.input, start);
        handler.start_element(name, line, is_empty);
        if is_empty {
            handler.end_element(name, line);
        }
        true
    }

    /// Scan an end tag; the cursor sits just after "</"
    fn scan_end_tag<H: ScanHandler>(&mut self, start: usize, handler: &mut H) -> bool {
        self.scanner.skip_whitespace();

        let name = self.scanner.read_name();
        let Some(gt) = self.scanner.find_byte(b'>') else {
            if self.partial {
                return self.unfinished(start);
            }
            // Unterminated end tag at end of document still closes its element
            if let Some(name) = name {
                let line = self.lines.line_at(self.input, start);
                handler.end_element(name, line);
            }
            self.scanner.exhaust();
            return true;
        };
        self.scanner.set_position(gt + 1);

        if let Some(name) = name {
            let line = self.lines.line_at(self.input, start);
            handler.end_element(name, line);
        }
        true
    }

    /// Skip a comment, CDATA section, DOCTYPE or other `<!` construct;
    /// the cursor sits just after "<!"
    fn scan_declaration(&mut self, start: usize) -> bool {
        if self.scanner.starts_with(b"--") {
            self.scanner.advance(2);
            return self.skip_past(start, b"-->");
        }
        if self.scanner.starts_with(b"[CDATA[") {
            self.scanner.advance(7);
            return self.skip_past(start, b"]]>");
        }
        if self.scanner.could_start_with(b"--") || self.scanner.could_start_with(b"[CDATA[") {
            return self.unfinished(start);
        }
        match self.scanner.peek() {
            Some(b'D') | Some(b'd') => self.skip_doctype(start),
            _ => match self.scanner.find_tag_end_quoted() {
                Some(gt) => {
                    self.scanner.set_position(gt + 1);
                    true
                }
                None => self.unfinished(start),
            },
        }
    }

    /// Skip DOCTYPE, honouring an internal subset in brackets
    fn skip_doctype(&mut self, start: usize) -> bool {
        let mut depth = 0usize;
        while let Some(c) = self.scanner.peek() {
            match c {
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => {
                    self.scanner.advance(1);
                    return true;
                }
                _ => {}
            }
            self.scanner.advance(1);
        }
        self.unfinished(start)
    }

    /// Move past the next `terminator`, or report the construct as unfinished
    fn skip_past(&mut self, start: usize, terminator: &[u8]) -> bool {
        match self.scanner.find_seq(terminator) {
            Some(pos) => {
                self.scanner.set_position(pos + terminator.len());
                true
            }
            None => self.unfinished(start),
        }
    }

    /// In partial mode rewind to `start` and stop; otherwise the construct
    /// swallows the rest of the document
    fn unfinished(&mut self, start: usize) -> bool {
        if self.partial {
            self.scanner.set_position(start);
            false
        } else {
            self.scanner.exhaust();
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test handler that records events as strings
    #[derive(Default)]
    struct TestHandler {
        events: Vec<String>,
    }

    impl ScanHandler for TestHandler {
        fn start_element(&mut self, name: &[u8], line: u32, is_empty: bool) {
            let name = String::from_utf8_lossy(name);
            let marker = if is_empty { "/" } else { "" };
            self.events.push(format!("+{}{}@{}", name, marker, line));
        }

        fn end_element(&mut self, name: &[u8], line: u32) {
            self.events
                .push(format!("-{}@{}", String::from_utf8_lossy(name), line));
        }
    }

    fn scan(input: &[u8]) -> Vec<String> {
        let mut handler = TestHandler::default();
        UnifiedScanner::new(input).scan(&mut handler);
        handler.events
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(scan(b"<root/>"), vec!["+root/@1", "-root@1"]);
    }

    #[test]
    fn test_nested_elements_with_lines() {
        let input = b"<a>\n  <b>text</b>\n  <b/>\n</a>";
        assert_eq!(
            scan(input),
            vec!["+a@1", "+b@2", "-b@2", "+b/@3", "-b@3", "-a@4"]
        );
    }

    #[test]
    fn test_attributes_with_gt_in_quotes() {
        assert_eq!(
            scan(b"<a expr=\"x > 1\" other='/'><b/></a>"),
            vec!["+a@1", "+b/@1", "-b@1", "-a@1"]
        );
    }

    #[test]
    fn test_skips_comment_cdata_pi_doctype() {
        let input = b"<?xml version=\"1.0\"?>\n<!DOCTYPE a [<!ELEMENT a ANY>]>\n<a><!-- <x/> --><![CDATA[<y/>]]><?pi <z/>?></a>";
        assert_eq!(scan(input), vec!["+a@3", "-a@3"]);
    }

    #[test]
    fn test_invalid_markup_is_text() {
        assert_eq!(scan(b"<1bad/><good/>"), vec!["+good/@1", "-good@1"]);
    }

    #[test]
    fn test_prefixed_names_kept_raw() {
        assert_eq!(scan(b"<if:a></if:a>"), vec!["+if:a@1", "-if:a@1"]);
    }

    #[test]
    fn test_partial_stops_at_unfinished_tag() {
        let input = b"<a>\n<b/><c at";
        let mut handler = TestHandler::default();
        let mut scanner = UnifiedScanner::partial(input, 1);
        let consumed = scanner.scan(&mut handler);
        assert_eq!(consumed, 8);
        assert_eq!(scanner.line_at(consumed), 2);
        assert_eq!(handler.events, vec!["+a@1", "+b/@2", "-b@2"]);
    }

    #[test]
    fn test_partial_stops_at_unfinished_comment() {
        let input = b"<a><!-- <b/> -";
        let mut handler = TestHandler::default();
        let consumed = UnifiedScanner::partial(input, 1).scan(&mut handler);
        assert_eq!(consumed, 3);
        assert_eq!(handler.events, vec!["+a@1"]);
    }

    #[test]
    fn test_partial_stops_at_ambiguous_bang() {
        let input = b"<a><!";
        let mut handler = TestHandler::default();
        let consumed = UnifiedScanner::partial(input, 1).scan(&mut handler);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_partial_consumes_trailing_text() {
        let input = b"<a>some text";
        let mut handler = TestHandler::default();
        let consumed = UnifiedScanner::partial(input, 1).scan(&mut handler);
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn test_complete_mode_closes_unterminated_end_tag() {
        assert_eq!(scan(b"<a></a"), vec!["+a@1", "-a@1"]);
    }

    #[test]
    fn test_complete_mode_drops_unterminated_start_tag() {
        assert_eq!(scan(b"<a><b x=\"1"), vec!["+a@1"]);
    }
}
