//! Core XML scanning primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - LineCounter: byte offset to source line mapping
//! - UnifiedScanner: ScanHandler-based element scanner with partial-input support

pub mod lines;
pub mod scanner;
pub mod unified_scanner;
