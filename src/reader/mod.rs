//! XML Reader Module
//!
//! Turns raw bytes into the element events the tracker consumes.

pub mod events;

pub use events::{collect_events, local_name, ElementEvent};
