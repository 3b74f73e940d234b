//! Message Normalisation Rules
//!
//! Ordered `(pattern, replacement)` pairs that turn raw validator and parser
//! text into user-facing messages. Rules run in order, each as replace-all
//! over the previous rule's output, so specific patterns must precede the
//! general ones that would otherwise swallow them.

use std::borrow::Cow;

use regex::Regex;
use serde::Deserialize;
use tracing::error;

use crate::error::{AddressError, Result};

/// Serialized form of a rule: `{ "pattern": "...", "replacement": "..." }`
#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub replacement: String,
}

/// A compiled rule
#[derive(Debug, Clone)]
pub struct MessageRule {
    pattern: Regex,
    replacement: String,
}

impl MessageRule {
    /// Compile a rule
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| AddressError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(MessageRule {
            pattern: regex,
            replacement: replacement.into(),
        })
    }

    /// Source text of the pattern
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replacement text (`$n` refers to capture groups)
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

/// Ordered rule table
#[derive(Debug, Clone)]
pub struct MessageRules {
    rules: Vec<MessageRule>,
}

/// Rules shipped by default, most specific first
const DEFAULT_RULES: &[(&str, &str)] = &[
    // Value validation
    (r"regular expression '\[0-9\]\[0-9\]'", "XX"),
    (r"Value '.*' does not match .*", "Invalid value format"),
    // Element content
    (
        r"ParseError at \[row,col\]:\[\d+,\d+\]\s*Message: Element content can not contain child START_ELEMENT when using Typed Access methods",
        "Invalid element content - expected simple text value but found nested XML elements",
    ),
    (
        r"Element content can not contain child START_ELEMENT when using Typed Access methods",
        "Invalid element content - expected simple value but found nested elements",
    ),
    // Schema lookup
    (
        r"Schema for node with name .* and namespace .* does not exist in parent .*",
        "Unknown element - not defined in the YANG schema",
    ),
    (
        r"Schema node with name .* was not found under .*",
        "Element not found in schema definition",
    ),
    // Duplicates
    (
        r#"Duplicate element ".*" in namespace ".*" with parent ".*" in XML input"#,
        "Duplicate element found - only one instance allowed",
    ),
    // Namespaces
    (r"Failed to convert namespace .*", "Invalid XML namespace"),
    (
        r"Choose suitable module name for element .*:",
        "Ambiguous element name - multiple modules define this element",
    ),
    // Mount points
    (r"Mount point .* not attached", "Mount point configuration missing"),
    (
        r"Unhandled mount-aware schema .*",
        "Unsupported mount point schema type",
    ),
    // Type conversion
    (
        r"Unexpected value while expecting a .*",
        "Invalid data type - value does not match expected type",
    ),
    // Generic parse errors, after the specific ParseError rule above
    (
        r"ParseError at \[row,col\]:\[\d+,\d+\]\s*Message: .*",
        "XML structure error - invalid element nesting or content",
    ),
    (r"Unable to read anyxml value", "Failed to parse XML content"),
    // Value assignment
    (
        r"Node '.*' has already set its value to '.*'",
        "Duplicate value assignment - element value already set",
    ),
    (
        r"No TransformerFactory supporting StAXResult found",
        "XML processing configuration error",
    ),
    (r"Failed parsing JSON source: .* to Json", "JSON parsing failed"),
    // Parent placement
    (r"Illegal parent node .*", "Invalid parent element for this context"),
    (r"Unexpected parent .*", "Element found in unexpected location"),
    (r"Codec for .* is not available", "Data type codec not available"),
];

impl MessageRules {
    /// Table with no rules; messages pass through unchanged
    pub fn empty() -> Self {
        MessageRules { rules: Vec::new() }
    }

    /// Compile rules in the given order
    pub fn new<I, P, R>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| MessageRule::new(pattern.as_ref(), replacement))
            .collect::<Result<Vec<_>>>()?;
        Ok(MessageRules { rules })
    }

    /// Load rules from a JSON array of `{pattern, replacement}` objects
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(json)?;
        Self::new(specs.into_iter().map(|s| (s.pattern, s.replacement)))
    }

    /// Append a rule after the existing ones
    pub fn push(&mut self, pattern: &str, replacement: impl Into<String>) -> Result<()> {
        self.rules.push(MessageRule::new(pattern, replacement)?);
        Ok(())
    }

    /// Apply every rule in order
    pub fn normalize(&self, message: &str) -> String {
        let mut out = message.to_owned();
        for rule in &self.rules {
            if let Cow::Owned(replaced) =
                rule.pattern.replace_all(&out, rule.replacement.as_str())
            {
                out = replaced;
            }
        }
        out
    }

    /// Rules in application order
    pub fn rules(&self) -> &[MessageRule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for MessageRules {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.iter().copied()).unwrap_or_else(|err| {
            error!(%err, "built-in message rules failed to compile");
            Self::empty()
        })
    }
}
