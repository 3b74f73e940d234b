//! Validation Diagnostics
//!
//! Turns a failure reported by an external validator into something a user
//! can act on: the element address at the failing line plus a normalized
//! message.

pub mod report;
pub mod rules;

pub use report::{LocatedDocument, Locator, LocatorConfig, Report, ValidationFailure};
pub use rules::{MessageRule, MessageRules, RuleSpec};
