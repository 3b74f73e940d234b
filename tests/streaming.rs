//! Chunked and reader-driven mapping must agree with single-shot mapping.

use std::io::{self, Read};

use xpathmap::strategy::streaming::track_reader_with;
use xpathmap::{map_document, map_documents_parallel, track_reader, AddressError, StreamingTracker};

const DOCUMENT: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE config [
  <!ENTITY note "<b/>">
]>
<config xmlns:if="urn:ietf:interfaces">
  <!-- disabled: <interface/> -->
  <if:interface enabled="true" descr='a > b'>
    <name>eth0</name>
    <mtu>1500</mtu>
  </if:interface>
  <if:interface>
    <name>eth1</name>
    <description><![CDATA[<mtu>9000</mtu>]]></description>
  </if:interface>
  <?refresh interval="5"?>
  <routing><static/><static/><static/></routing>
</config>
"#;

fn stream(doc: &[u8], chunk_size: usize) -> xpathmap::Result<xpathmap::OccurrenceRegistry> {
    let mut tracker = StreamingTracker::new();
    for chunk in doc.chunks(chunk_size) {
        tracker.feed(chunk)?;
    }
    tracker.finish()
}

#[test]
fn every_chunk_size_matches_single_shot() {
    let expected = map_document(DOCUMENT).unwrap();
    assert_eq!(expected.len(), 11);

    for size in 1..=DOCUMENT.len() {
        let streamed = stream(DOCUMENT, size).unwrap();
        assert_eq!(streamed, expected, "chunk size {}", size);
    }
}

#[test]
fn streamed_addresses() {
    let map = stream(DOCUMENT, 7).unwrap();
    let at = |line| map.address_at_line(line);
    assert_eq!(at(5), Some("/config"));
    assert_eq!(at(7), Some("/config/interface[0]"));
    assert_eq!(at(8), Some("/config/interface[0]/name"));
    assert_eq!(at(13), Some("/config/interface[1]/description"));
    assert_eq!(at(16), Some("/config/routing/static[2]"));
    assert_eq!(at(6), None);
}

#[test]
fn tracker_holds_only_unfinished_tail() {
    let mut tracker = StreamingTracker::new();
    tracker.feed(b"<config>\n  <interface>\n").unwrap();
    assert_eq!(tracker.pending(), 0);
    tracker.feed(b"  <!-- half a comm").unwrap();
    assert_eq!(tracker.pending(), b"<!-- half a comm".len());
    tracker.feed(b"ent -->\n  </interface>\n").unwrap();
    assert_eq!(tracker.pending(), 0);
    assert_eq!(tracker.current_address(), "/config");
    assert_eq!(tracker.registry().len(), 2);
}

#[test]
fn split_utf8_names() {
    let doc = "<données>\n<élément/>\n<élément/>\n</données>".as_bytes();
    let expected = map_document(doc).unwrap();
    assert_eq!(
        expected.address_at_line(3),
        Some("/données/élément[1]")
    );
    for size in 1..=4 {
        assert_eq!(stream(doc, size).unwrap(), expected);
    }
}

/// Reader that hands out one byte at a time and is interrupted before each
struct Trickle<'a> {
    data: &'a [u8],
    interrupt: bool,
}

impl Read for Trickle<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.interrupt = !self.interrupt;
        if self.interrupt {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "again"));
        }
        match (self.data.split_first(), buf.first_mut()) {
            (Some((&byte, rest)), Some(slot)) => {
                *slot = byte;
                self.data = rest;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[test]
fn reader_retries_interrupted_reads() {
    let reader = Trickle {
        data: DOCUMENT,
        interrupt: false,
    };
    let map = track_reader_with(reader, 64).unwrap();
    assert_eq!(map, map_document(DOCUMENT).unwrap());
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
    }
}

#[test]
fn reader_errors_surface_as_io() {
    assert!(matches!(track_reader(Broken), Err(AddressError::Io(_))));
}

#[test]
fn parallel_documents_keep_order() {
    let docs: Vec<&[u8]> = vec![DOCUMENT, b"<x/>", b"<y><z/><z/></y>"];
    let results = map_documents_parallel(&docs);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap(), &map_document(DOCUMENT).unwrap());
    assert_eq!(results[1].as_ref().unwrap().address_at_line(1), Some("/x"));
    assert_eq!(results[2].as_ref().unwrap().len(), 3);
}
