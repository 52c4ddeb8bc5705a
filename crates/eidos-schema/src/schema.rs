//! The JSON-Schema-compatible schema node.
//!
//! [`Schema`] is a single struct covering the schema subset this crate
//! derives and validates: the `type` keyword, value constraints, object and
//! array structure, and the composite combinators (`oneOf`, `anyOf`,
//! `allOf`, `not`). Every keyword is optional and absent keywords are
//! omitted from serialized output.
//!
//! A schema that has been *promoted* carries its registered name in a
//! non-serialized marker; promoted schemas are referenced by `$ref`
//! wherever they recur instead of being inlined.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The `$ref` prefix used for named schemas.
pub const REF_PREFIX: &str = "#/components/schemas/";

/// The `type` keyword values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type.
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
    /// Null type.
    Null,
}

/// The `additionalProperties` keyword: either a blanket policy or a schema
/// for the extra values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// Extra properties allowed (`true`) or disallowed (`false`). The
    /// closed-object policy is advisory; validation does not flag unknown
    /// properties.
    Allowed(bool),
    /// Extra properties must match this schema.
    Schema(Box<Schema>),
}

impl AdditionalProperties {
    /// The value schema, when one is set.
    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            Self::Allowed(_) => None,
            Self::Schema(schema) => Some(schema),
        }
    }
}

/// A schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Reference to a named schema. A reference node carries no other
    /// meaningful keywords.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "$ref")]
    pub reference: Option<String>,

    /// The registered name when this schema has been promoted. Promoted
    /// schemas must be referenced, never mutated in place by referents.
    #[serde(skip)]
    pub named: Option<String>,

    /// The schema type, if a single one is known.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "type")]
    pub schema_type: Option<SchemaType>,
    /// Short human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Numbers must be a multiple of this value.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "multipleOf"
    )]
    pub multiple_of: Option<f64>,
    /// Upper numeric bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Compare the maximum with `>=` instead of `>`.
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        rename = "exclusiveMaximum"
    )]
    pub exclusive_maximum: bool,
    /// Lower numeric bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Compare the minimum with `<=` instead of `<`.
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        rename = "exclusiveMinimum"
    )]
    pub exclusive_minimum: bool,
    /// Maximum string length.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxLength")]
    pub max_length: Option<u64>,
    /// Minimum string length.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "minLength")]
    pub min_length: Option<u64>,
    /// Regex the stringified value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Maximum array length.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "maxItems")]
    pub max_items: Option<u64>,
    /// Minimum array length.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "minItems")]
    pub min_items: Option<u64>,
    /// Array items must be pairwise distinct.
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        rename = "uniqueItems"
    )]
    pub unique_items: bool,
    /// Maximum object property count.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "maxProperties"
    )]
    pub max_properties: Option<u64>,
    /// Minimum object property count.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "minProperties"
    )]
    pub min_properties: Option<u64>,
    /// Properties that must be present and non-null.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Fixed set of allowed values.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "enum")]
    pub enum_values: Vec<Value>,
    /// Semantic format hint (e.g. `date-time`, `email`, `uuid`). Only
    /// enforced when a type's validation options ask for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Default value.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "default")]
    pub default_value: Option<Value>,
    /// Must validate against every subschema.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "allOf")]
    pub all_of: Vec<Schema>,
    /// Must validate against exactly one subschema.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "oneOf")]
    pub one_of: Vec<Schema>,
    /// Must validate against at least one subschema.
    #[serde(default, skip_serializing_if = "Vec::is_empty", rename = "anyOf")]
    pub any_of: Vec<Schema>,
    /// Must not validate against the subschema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<Schema>>,
    /// Schema for array items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Object properties by wire name, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Policy or schema for properties not listed in `properties`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        rename = "additionalProperties"
    )]
    pub additional_properties: Option<AdditionalProperties>,
    /// Whether `null` is accepted in addition to the declared type.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    /// Value may appear in responses but should not be sent in requests.
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        rename = "readOnly"
    )]
    pub read_only: bool,
    /// Value may be sent in requests but should not appear in responses.
    #[serde(
        default,
        skip_serializing_if = "std::ops::Not::not",
        rename = "writeOnly"
    )]
    pub write_only: bool,
    /// Example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Whether the schema is deprecated.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

impl Schema {
    /// Create a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self {
            schema_type: Some(SchemaType::String),
            ..Default::default()
        }
    }

    /// Create an integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self {
            schema_type: Some(SchemaType::Integer),
            ..Default::default()
        }
    }

    /// Create a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self {
            schema_type: Some(SchemaType::Number),
            ..Default::default()
        }
    }

    /// Create a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self {
            schema_type: Some(SchemaType::Boolean),
            ..Default::default()
        }
    }

    /// Create a null schema.
    #[must_use]
    pub fn null() -> Self {
        Self {
            schema_type: Some(SchemaType::Null),
            ..Default::default()
        }
    }

    /// Create an array schema with the given item schema.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some(SchemaType::Array),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    /// Create an object schema.
    #[must_use]
    pub fn object() -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            ..Default::default()
        }
    }

    /// Create a reference schema pointing at the named schema.
    #[must_use]
    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("{REF_PREFIX}{}", escape_ref_part(name))),
            ..Default::default()
        }
    }

    /// Add a property to an object schema.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Mark a property as required.
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// The registered name when this schema has been promoted.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.named.as_deref()
    }

    /// The referenced schema name, when this node is a reference.
    #[must_use]
    pub fn reference_name(&self) -> Option<String> {
        let reference = self.reference.as_deref()?;
        let escaped = reference.strip_prefix(REF_PREFIX).unwrap_or(reference);
        Some(unescape_ref_part(escaped))
    }

    /// Returns the reference form of this schema: a `$ref` node when the
    /// schema is named, the schema itself otherwise.
    #[must_use]
    pub fn as_reference(&self) -> Schema {
        match &self.named {
            Some(name) => Schema::reference(name),
            None => self.clone(),
        }
    }

    /// Whether this schema accepts `null`, via the inline flag or the
    /// `oneOf(reference, null)` combinator form.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        self.nullable
            || (self.one_of.len() == 2
                && self.one_of[1].schema_type == Some(SchemaType::Null))
    }

    /// The inner schema of a wrapper node: the first `oneOf` branch or a
    /// lone `allOf` entry. Wrapper nodes arise when a named schema is made
    /// nullable or annotated without being mutated in place.
    #[must_use]
    pub fn inner_schema(&self) -> Option<&Schema> {
        if !self.one_of.is_empty() {
            return self.one_of.first();
        }
        if self.all_of.len() == 1 {
            return self.all_of.first();
        }
        None
    }
}

/// Resolves named schemas for `$ref` nodes. Implemented by the schema
/// builder; the validator resolves references through this.
pub trait SchemaResolver: Send + Sync {
    /// Returns the schema registered under `name`, if any.
    fn resolve(&self, name: &str) -> Option<Schema>;
}

/// A resolver with no named schemas.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchemas;

impl SchemaResolver for NoSchemas {
    fn resolve(&self, _name: &str) -> Option<Schema> {
        None
    }
}

/// Escapes a name for use inside a reference path (`~` to `~0`, `/` to
/// `~1`).
#[must_use]
pub fn escape_ref_part(part: &str) -> String {
    part.replace('~', "~0").replace('/', "~1")
}

/// Reverses [`escape_ref_part`].
#[must_use]
pub fn unescape_ref_part(part: &str) -> String {
    part.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_builders() {
        let string = Schema::string();
        assert_eq!(string.schema_type, Some(SchemaType::String));

        let array = Schema::array(Schema::integer());
        assert_eq!(array.schema_type, Some(SchemaType::Array));
        assert_eq!(
            array.items.as_deref().and_then(|s| s.schema_type),
            Some(SchemaType::Integer)
        );

        let object = Schema::object()
            .property("name", Schema::string())
            .required_property("name");
        assert!(object.properties.contains_key("name"));
        assert_eq!(object.required, vec!["name"]);
    }

    #[test]
    fn test_reference_round_trip() {
        let reference = Schema::reference("User");
        assert_eq!(
            reference.reference.as_deref(),
            Some("#/components/schemas/User")
        );
        assert_eq!(reference.reference_name().as_deref(), Some("User"));
    }

    #[test]
    fn test_reference_escaping() {
        let reference = Schema::reference("a/b~c");
        assert_eq!(
            reference.reference.as_deref(),
            Some("#/components/schemas/a~1b~0c")
        );
        assert_eq!(reference.reference_name().as_deref(), Some("a/b~c"));
    }

    #[test]
    fn test_as_reference_for_named_schema() {
        let mut schema = Schema::object();
        schema.named = Some("User".to_owned());

        let reference = schema.as_reference();
        assert_eq!(
            reference.reference.as_deref(),
            Some("#/components/schemas/User")
        );
        assert!(reference.properties.is_empty());

        let inline = Schema::string();
        assert_eq!(inline.as_reference(), inline);
    }

    #[test]
    fn test_is_nullable_both_forms() {
        let mut flagged = Schema::string();
        flagged.nullable = true;
        assert!(flagged.is_nullable());

        let combined = Schema {
            one_of: vec![Schema::reference("User"), Schema::null()],
            ..Default::default()
        };
        assert!(combined.is_nullable());

        assert!(!Schema::string().is_nullable());
    }

    #[test]
    fn test_serialization_omits_unset_keywords() {
        let schema = Schema::string();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json, serde_json::json!({"type": "string"}));
    }

    #[test]
    fn test_serialization_renames_keywords() {
        let schema = Schema {
            schema_type: Some(SchemaType::Integer),
            multiple_of: Some(2.0),
            minimum: Some(0.0),
            exclusive_minimum: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "integer",
                "multipleOf": 2.0,
                "minimum": 0.0,
                "exclusiveMinimum": true,
            })
        );
    }

    #[test]
    fn test_additional_properties_untagged() {
        let closed = Schema {
            additional_properties: Some(AdditionalProperties::Allowed(false)),
            ..Schema::object()
        };
        let json = serde_json::to_value(&closed).unwrap();
        assert_eq!(json["additionalProperties"], serde_json::json!(false));

        let mapped = Schema {
            additional_properties: Some(AdditionalProperties::Schema(Box::new(
                Schema::integer(),
            ))),
            ..Schema::object()
        };
        let json = serde_json::to_value(&mapped).unwrap();
        assert_eq!(
            json["additionalProperties"],
            serde_json::json!({"type": "integer"})
        );
    }

    #[test]
    fn test_named_marker_not_serialized() {
        let mut schema = Schema::object();
        schema.named = Some("User".to_owned());
        let json = serde_json::to_string(&schema).unwrap();
        assert!(!json.contains("User"));
    }
}
