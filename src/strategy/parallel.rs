//! Parallel Address Mapping
//!
//! Uses Rayon to map independent documents concurrently. Every document
//! gets its own tracker; no state crosses documents.

use rayon::prelude::*;

use crate::address::OccurrenceRegistry;
use crate::error::Result;
use crate::map_document;

/// Map multiple documents in parallel; results keep the input order
pub fn map_documents_parallel(docs: &[&[u8]]) -> Vec<Result<OccurrenceRegistry>> {
    docs.par_iter().map(|doc| map_document(doc)).collect()
}

/// Look up one line in each of several documents in parallel
pub fn addresses_at_line_parallel(docs: &[&[u8]], line: u32) -> Vec<Result<Option<String>>> {
    docs.par_iter()
        .map(|doc| {
            map_document(doc).map(|registry| registry.address_at_line(line).map(str::to_owned))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_map() {
        let docs: [&[u8]; 3] = [b"<a><b/><b/></a>", b"<x/>", b"<p:/>"];

        let results = map_documents_parallel(&docs);
        assert_eq!(results.len(), 3);
        assert_eq!(
            results[0].as_ref().ok().and_then(|r| r.address_at_line(1)),
            Some("/a/b[1]")
        );
        assert_eq!(results[1].as_ref().map(|r| r.len()).ok(), Some(1));
        assert!(results[2].is_err());
    }

    #[test]
    fn test_parallel_line_lookup() {
        let docs: [&[u8]; 2] = [b"<a>\n<b/>\n</a>", b"<a/>"];
        let results = addresses_at_line_parallel(&docs, 2);
        assert_eq!(results[0].as_ref().ok(), Some(&Some("/a/b".to_string())));
        assert_eq!(results[1].as_ref().ok(), Some(&None));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let doc: &[u8] = b"<r><a><b/><b/></a><a/></r>";
        let docs = vec![doc; 8];
        let expected = map_document(doc).unwrap();
        for result in map_documents_parallel(&docs) {
            assert_eq!(result.unwrap(), expected);
        }
    }
}
