//! Failure Reports
//!
//! Joins a validator failure (line, column, raw message) with the address
//! map of the document it was raised against.

use std::fmt;

use serde::Deserialize;

use super::rules::MessageRules;
use crate::address::{builder, OccurrenceRegistry, ScanTracker};
use crate::core::unified_scanner::UnifiedScanner;
use crate::error::Result;

/// How documents are prepared before mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Treat the document as enclosed in a synthetic element of this name.
    /// Fragments with several top-level elements are validated this way;
    /// the wrapper segment is stripped from reported addresses.
    pub wrapper: Option<String>,
}

impl LocatorConfig {
    /// Config that wraps documents in `<name>...</name>`
    pub fn wrapped(name: impl Into<String>) -> Self {
        LocatorConfig {
            wrapper: Some(name.into()),
        }
    }
}

/// A failure reported by the external validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub line: u32,
    pub column: Option<u32>,
    pub message: String,
}

impl ValidationFailure {
    /// Failure on `line` with no column information
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        ValidationFailure {
            line,
            column: None,
            message: message.into(),
        }
    }

    /// Attach a column
    pub fn at_column(mut self, column: u32) -> Self {
        self.column = Some(column);
        self
    }
}

/// User-facing description of a failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub line: u32,
    pub column: Option<u32>,
    /// None when no element starts on the failing line
    pub address: Option<String>,
    pub message: String,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}", self.line)?;
        if let Some(column) = self.column {
            write!(f, ", Column {}", column)?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "For XPath: {}",
            self.address.as_deref().unwrap_or("<unknown>")
        )?;
        write!(f, "Error: {}", self.message)
    }
}

/// Builds address maps and reports for documents
#[derive(Debug, Clone, Default)]
pub struct Locator {
    config: LocatorConfig,
    rules: MessageRules,
}

impl Locator {
    /// Locator with the given preparation and message rules
    pub fn new(config: LocatorConfig, rules: MessageRules) -> Self {
        Locator { config, rules }
    }

    /// Map a complete document
    pub fn locate(&self, document: &[u8]) -> Result<LocatedDocument<'_>> {
        let mut handler = ScanTracker::new();
        if let Some(wrapper) = &self.config.wrapper {
            handler.tracker_mut().open(wrapper, 1)?;
        }

        UnifiedScanner::new(document).scan(&mut handler);

        if let Some(wrapper) = &self.config.wrapper {
            let last_line = memchr::memchr_iter(b'\n', document).count() as u32 + 1;
            handler.tracker_mut().close(Some(wrapper), last_line);
        }

        Ok(LocatedDocument {
            registry: handler.finish()?,
            locator: self,
        })
    }

    /// Message rules in use
    pub fn rules(&self) -> &MessageRules {
        &self.rules
    }
}

/// A mapped document ready to explain failures
#[derive(Debug)]
pub struct LocatedDocument<'a> {
    registry: OccurrenceRegistry,
    locator: &'a Locator,
}

impl LocatedDocument<'_> {
    /// The raw address map, wrapper segment included
    pub fn registry(&self) -> &OccurrenceRegistry {
        &self.registry
    }

    /// Address of the latest element opened on `line`, wrapper stripped
    pub fn address_at_line(&self, line: u32) -> Option<String> {
        let address = self.registry.address_at_line(line)?;
        Some(match &self.locator.config.wrapper {
            Some(wrapper) => strip_wrapper(address, wrapper).to_owned(),
            None => address.to_owned(),
        })
    }

    /// Explain a validator failure
    pub fn report(&self, failure: &ValidationFailure) -> Report {
        Report {
            line: failure.line,
            column: failure.column,
            address: self.address_at_line(failure.line),
            message: self.locator.rules.normalize(&failure.message),
        }
    }
}

/// Remove a leading `/wrapper` segment
fn strip_wrapper<'a>(address: &'a str, wrapper: &str) -> &'a str {
    let Some(rest) = address
        .strip_prefix('/')
        .and_then(|a| a.strip_prefix(wrapper))
    else {
        return address;
    };
    if rest.is_empty() {
        builder::ROOT
    } else if rest.starts_with('/') {
        rest
    } else {
        address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AddressError;

    #[test]
    fn test_strip_wrapper() {
        assert_eq!(strip_wrapper("/root/a/b[1]", "root"), "/a/b[1]");
        assert_eq!(strip_wrapper("/root", "root"), "/");
        assert_eq!(strip_wrapper("/rooted/a", "root"), "/rooted/a");
        assert_eq!(strip_wrapper("/other", "root"), "/other");
    }

    #[test]
    fn test_report_with_wrapper() {
        let doc = b"<interface>\n  <name>eth0</name>\n</interface>\n<interface>\n  <name>eth1</name>\n</interface>";
        let locator = Locator::new(LocatorConfig::wrapped("root"), MessageRules::default());
        let located = locator.locate(doc).unwrap();

        assert_eq!(located.registry().entries()[0].address, "/root");
        assert_eq!(
            located.address_at_line(2).as_deref(),
            Some("/interface[0]/name")
        );

        let failure = ValidationFailure::new(
            5,
            "Schema node with name name was not found under interface",
        )
        .at_column(9);
        let report = located.report(&failure);
        assert_eq!(report.address.as_deref(), Some("/interface[1]/name"));
        assert_eq!(
            report.to_string(),
            "Line 5, Column 9\nFor XPath: /interface[1]/name\nError: Element not found in schema definition"
        );
    }

    #[test]
    fn test_report_without_address() {
        let locator = Locator::default();
        let located = locator.locate(b"<a>\n\n</a>").unwrap();
        let report = located.report(&ValidationFailure::new(2, "boom"));
        assert_eq!(report.address, None);
        assert_eq!(report.to_string(), "Line 2\nFor XPath: <unknown>\nError: boom");
    }

    #[test]
    fn test_locate_propagates_empty_name() {
        let locator = Locator::new(LocatorConfig::wrapped("root"), MessageRules::empty());
        assert!(matches!(
            locator.locate(b"<a><p:/></a>"),
            Err(AddressError::EmptyName { line: 1 })
        ));
    }

    #[test]
    fn test_config_from_json() {
        let config: LocatorConfig = serde_json::from_str(r#"{"wrapper": "root"}"#).unwrap();
        assert_eq!(config, LocatorConfig::wrapped("root"));
        let empty: LocatorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.wrapper, None);
    }
}
