//! Common types used throughout coda-connect
//!
//! Shared type aliases and small enums used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Value Format
// ============================================================================

/// How the API renders cell values in row responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueFormat {
    /// Plain scalars
    #[default]
    Simple,
    /// Plain scalars, multi-value cells as arrays
    SimpleWithArrays,
    /// Formatted values with structured annotations
    Rich,
}

impl ValueFormat {
    /// Wire representation used in query strings
    pub fn as_str(self) -> &'static str {
        match self {
            ValueFormat::Simple => "simple",
            ValueFormat::SimpleWithArrays => "simpleWithArrays",
            ValueFormat::Rich => "rich",
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(ValueFormat::Simple),
            "simpleWithArrays" => Ok(ValueFormat::SimpleWithArrays),
            "rich" => Ok(ValueFormat::Rich),
            other => Err(crate::Error::invalid_input(format!(
                "unknown value format '{other}' (expected simple, simpleWithArrays or rich)"
            ))),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy used when retrying rate-limited calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Same delay every attempt
    Constant,
    /// Delay grows linearly
    Linear,
    /// Delay doubles every attempt
    #[default]
    Exponential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_format_wire_names() {
        assert_eq!(ValueFormat::Simple.to_string(), "simple");
        assert_eq!(ValueFormat::SimpleWithArrays.to_string(), "simpleWithArrays");
        assert_eq!(ValueFormat::Rich.to_string(), "rich");
        assert_eq!(
            serde_json::to_string(&ValueFormat::SimpleWithArrays).unwrap(),
            "\"simpleWithArrays\""
        );
    }

    #[test]
    fn test_value_format_parse() {
        assert_eq!("rich".parse::<ValueFormat>().unwrap(), ValueFormat::Rich);
        assert!("fancy".parse::<ValueFormat>().is_err());
    }

    #[test]
    fn test_backoff_default() {
        assert_eq!(BackoffType::default(), BackoffType::Exponential);
    }
}
