//! Validation failures.
//!
//! Failures are data, not exceptions: a validation pass accumulates them in
//! an ordered flat list, and only the caller decides whether a non-empty
//! list is an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The rule that was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rule {
    /// Wrong value type for the schema.
    Type,
    /// `multipleOf` remainder check failed.
    MultipleOf,
    /// Value exceeds the maximum.
    Maximum,
    /// Value is below the minimum.
    Minimum,
    /// String exceeds the maximum length.
    MaxLength,
    /// String is below the minimum length.
    MinLength,
    /// Stringified value does not match the pattern.
    Pattern,
    /// Stringified value does not match the enforced format.
    Format,
    /// Array exceeds the maximum item count.
    MaxItems,
    /// Array is below the minimum item count.
    MinItems,
    /// Array items are not pairwise distinct.
    UniqueItems,
    /// Object exceeds the maximum property count.
    MaxProperties,
    /// Object is below the minimum property count.
    MinProperties,
    /// A required property is missing or null.
    Required,
    /// A deprecated schema received a non-default value.
    Deprecated,
    /// Value is not one of the allowed enum values.
    Enum,
    /// Null where the schema does not accept null.
    Nullable,
    /// Not exactly one `oneOf` branch validated cleanly.
    OneOf,
    /// An `allOf` branch failed to validate.
    AllOf,
    /// No `anyOf` branch validated cleanly.
    AnyOf,
    /// The `not` subschema validated cleanly.
    Not,
    /// Raised by a custom validation hook.
    Custom,
}

impl Rule {
    /// The rule identifier as it appears in serialized failures.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::MultipleOf => "multipleOf",
            Self::Maximum => "maximum",
            Self::Minimum => "minimum",
            Self::MaxLength => "maxLength",
            Self::MinLength => "minLength",
            Self::Pattern => "pattern",
            Self::Format => "format",
            Self::MaxItems => "maxItems",
            Self::MinItems => "minItems",
            Self::UniqueItems => "uniqueItems",
            Self::MaxProperties => "maxProperties",
            Self::MinProperties => "minProperties",
            Self::Required => "required",
            Self::Deprecated => "deprecated",
            Self::Enum => "enum",
            Self::Nullable => "nullable",
            Self::OneOf => "oneOf",
            Self::AllOf => "allOf",
            Self::AnyOf => "anyOf",
            Self::Not => "not",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    /// Path to the offending value: field names and array indices from the
    /// root. Empty when added without an explicit path at the root cursor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    /// The name of the schema that raised the failure, if it is named.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// The broken rule.
    pub rule: Rule,
    /// Details, mentioning the value and the bound where applicable.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl Validation {
    /// A failure for the given rule, with no path; adding it to a cursor
    /// fills in the cursor's path.
    #[must_use]
    pub fn rule(rule: Rule) -> Self {
        Self {
            path: Vec::new(),
            schema: None,
            rule,
            message: String::new(),
        }
    }

    /// Attaches a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches the originating schema name.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Pins an explicit path.
    #[must_use]
    pub fn at(mut self, path: Vec<String>) -> Self {
        self.path = path;
        self
    }
}

/// The error form of a non-empty failure list, for callers that treat
/// validation failures as an error.
#[derive(Debug)]
pub struct ValidationFailed {
    /// The accumulated failures, in validation order.
    pub failures: Vec<Validation>,
}

impl fmt::Display for ValidationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.failures.len() {
            0 => write!(f, "no validation errors"),
            1 => write!(f, "1 validation error"),
            n => write!(f, "{n} validation errors"),
        }
    }
}

impl std::error::Error for ValidationFailed {}
