//! Mapping Strategy Module
//!
//! - Single shot: `map_document` over a complete byte slice (crate root)
//! - Streaming: chunk-fed tracker for large or incrementally read documents
//! - Parallel: many independent documents at once

pub mod parallel;
pub mod streaming;

pub use parallel::map_documents_parallel;
pub use streaming::{track_reader, StreamingTracker};
