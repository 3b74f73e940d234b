//! Address Builder
//!
//! Renders the open frames as `/a/b[1]/c`. A segment carries an index only
//! once its name is known to repeat at that level, so a first occurrence
//! renders bare until a later sibling proves otherwise.

use std::fmt::Write;

use super::frame::Frame;

/// Address of the document root (no open elements)
pub const ROOT: &str = "/";

/// Marker inserted after a first occurrence once a sibling shows up
pub const FIRST_INDEX: &str = "[0]";

/// Render the address for a stack of frames, root first
pub fn render(frames: &[Frame]) -> String {
    let mut address = String::new();
    render_into(frames, &mut address);
    address
}

/// Render into an existing buffer, replacing its contents
pub fn render_into(frames: &[Frame], out: &mut String) {
    out.clear();
    if frames.is_empty() {
        out.push_str(ROOT);
        return;
    }

    for frame in frames {
        out.push('/');
        out.push_str(&frame.name);
        if frame.is_indexed() {
            // Writing to a String cannot fail
            let _ = write!(out, "[{}]", frame.occurrence_index);
        }
    }
}
