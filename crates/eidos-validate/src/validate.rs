//! The validation walk.
//!
//! [`validate`] walks a value and its schema in lockstep, appending
//! structured failures to the cursor's shared list. The destination type is
//! carried alongside where it is known, so per-type options and hooks
//! resolve by type identity at every level of the walk.
//!
//! Composite rules (`oneOf`, `allOf`, `anyOf`, `not`) always evaluate
//! against a detached cursor: only the branch's pass/fail outcome reaches
//! the parent list, never its sub-failures.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use regex::Regex;
use serde_json::{Map, Value};

use eidos_schema::{
    descriptor_of, find_struct_field, format_pattern, AdditionalProperties, Describe,
    DescriptorKind, Schema, SchemaResolver, SchemaType, TypeRef,
};

use crate::failure::{Rule, Validation, ValidationFailed};
use crate::options::ValidationProvider;

/// A cursor over one validation pass: the current path, a shared handle to
/// the ordered failure list, and the providers consulted during the walk.
///
/// Cursors created with [`next`](Self::next) share the failure list;
/// [`detach`](Self::detach) creates a cursor with an independent list for
/// isolated sub-passes.
pub struct Validator {
    path: Vec<String>,
    failures: Rc<RefCell<Vec<Validation>>>,
    provider: Arc<dyn ValidationProvider>,
    schemas: Arc<dyn SchemaResolver>,
}

impl Validator {
    /// Creates a root cursor with an empty path and failure list.
    #[must_use]
    pub fn new(provider: Arc<dyn ValidationProvider>, schemas: Arc<dyn SchemaResolver>) -> Self {
        Self {
            path: Vec::new(),
            failures: Rc::new(RefCell::new(Vec::new())),
            provider,
            schemas,
        }
    }

    /// A child cursor one path segment deeper. The failure list is shared:
    /// adding through the child adds to this cursor's list too.
    #[must_use]
    pub fn next(&self, segment: impl Into<String>) -> Validator {
        let mut path = self.path.clone();
        path.push(segment.into());
        Validator {
            path,
            failures: Rc::clone(&self.failures),
            provider: Arc::clone(&self.provider),
            schemas: Arc::clone(&self.schemas),
        }
    }

    /// A cursor with the same path but an independent failure list.
    #[must_use]
    pub fn detach(&self) -> Validator {
        Validator {
            path: self.path.clone(),
            failures: Rc::new(RefCell::new(Vec::new())),
            provider: Arc::clone(&self.provider),
            schemas: Arc::clone(&self.schemas),
        }
    }

    /// Splices a detached cursor's failures into this cursor's list.
    pub fn attach(&mut self, detached: Validator) {
        if Rc::ptr_eq(&self.failures, &detached.failures) {
            return;
        }
        let moved = detached.failures.take();
        self.failures.borrow_mut().extend(moved);
    }

    /// Appends a failure. A failure without an explicit path inherits this
    /// cursor's path.
    pub fn add(&mut self, mut failure: Validation) {
        if failure.path.is_empty() {
            failure.path = self.path.clone();
        }
        self.failures.borrow_mut().push(failure);
    }

    /// Whether any failures have been recorded.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.borrow().is_empty()
    }

    /// A snapshot of the failures recorded so far.
    #[must_use]
    pub fn failures(&self) -> Vec<Validation> {
        self.failures.borrow().clone()
    }

    /// The cursor's current path.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Converts a non-empty failure list into an error.
    pub fn finish(self) -> Result<(), ValidationFailed> {
        let failures = self.failures.borrow().clone();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailed { failures })
        }
    }

    fn provider(&self) -> Arc<dyn ValidationProvider> {
        Arc::clone(&self.provider)
    }

    fn schemas(&self) -> Arc<dyn SchemaResolver> {
        Arc::clone(&self.schemas)
    }
}

/// Validates a value of type `T` against a schema, appending failures to
/// the cursor's shared list.
pub fn validate<T: Describe>(schema: &Schema, value: &Value, v: &mut Validator) {
    validate_at(schema, value, Some(TypeRef::of::<T>()), v);
}

/// Validates a value against a schema, with the destination type carried
/// where known.
pub fn validate_at(schema: &Schema, value: &Value, target: Option<TypeRef>, v: &mut Validator) {
    let target = target.map(concrete_target);

    // A full-validation hook replaces the structural walk entirely.
    if let Some(tref) = target {
        if let Some(hook) = v.provider().full_validate(tref.id()) {
            hook(value, v);
            return;
        }
    }

    let resolved;
    let schema = match schema.reference_name() {
        Some(name) => match v.schemas().resolve(&name) {
            Some(found) => {
                resolved = found;
                &resolved
            }
            None => return,
        },
        None => schema,
    };

    let options = target
        .map(|t| v.provider().options(t.id()))
        .unwrap_or_default();
    if options.skip {
        return;
    }

    if value.is_null() {
        if !schema.is_nullable() && schema.schema_type != Some(SchemaType::Null) {
            v.add(fail(Rule::Nullable, schema));
        }
        // No further checks apply to null.
        return;
    }

    if options.fail_deprecated && schema.deprecated && !is_zero(value) {
        v.add(fail(Rule::Deprecated, schema));
    }

    if schema.schema_type == Some(SchemaType::Null) {
        v.add(
            fail(Rule::Type, schema)
                .with_message(format!("{} is not null", display(value))),
        );
    }

    match value {
        Value::Number(number) => {
            if let Some(number) = number.as_f64() {
                validate_number(schema, number, value, v);
            }
        }
        Value::String(text) => validate_string(schema, text, v),
        Value::Array(items) => validate_array(schema, items, target, v),
        Value::Object(fields) => validate_object(schema, fields, target, v),
        Value::Bool(_) | Value::Null => {}
    }

    if let Some(pattern) = &schema.pattern {
        if let Some(compiled) = compiled_pattern(pattern) {
            let text = display(value);
            if !compiled.is_match(&text) {
                v.add(fail(Rule::Pattern, schema).with_message(format!(
                    "{text} does not match the pattern {pattern}"
                )));
            }
        }
    }

    if options.enforce_format {
        if let Some(format) = &schema.format {
            if let Some(compiled) = format_pattern(format) {
                let text = display(value);
                if !compiled.is_match(&text) {
                    v.add(fail(Rule::Format, schema).with_message(format!(
                        "{text} does not match the format {format}"
                    )));
                }
            }
        }
    }

    if !schema.enum_values.is_empty() {
        let text = display(value);
        let allowed = schema
            .enum_values
            .iter()
            .any(|candidate| display(candidate) == text);
        if !allowed {
            v.add(fail(Rule::Enum, schema).with_message(format!(
                "{text} does not match one of the enum values {}",
                Value::Array(schema.enum_values.clone())
            )));
        }
    }

    if !schema.one_of.is_empty() {
        let mut matches = 0;
        for branch in &schema.one_of {
            let mut detached = v.detach();
            validate_at(branch, value, target, &mut detached);
            if !detached.has_failures() {
                matches += 1;
                if matches > 1 {
                    break;
                }
            }
        }
        if matches != 1 {
            v.add(fail(Rule::OneOf, schema).with_message(format!(
                "{} does not match exactly one of the possible schemas",
                display(value)
            )));
        }
    }

    if !schema.all_of.is_empty() {
        for branch in &schema.all_of {
            let mut detached = v.detach();
            validate_at(branch, value, target, &mut detached);
            if detached.has_failures() {
                v.add(fail(Rule::AllOf, schema).with_message(format!(
                    "{} does not match all of the possible schemas",
                    display(value)
                )));
                break;
            }
        }
    }

    if !schema.any_of.is_empty() {
        let mut valid = false;
        for branch in &schema.any_of {
            let mut detached = v.detach();
            validate_at(branch, value, target, &mut detached);
            if !detached.has_failures() {
                valid = true;
                break;
            }
        }
        if !valid {
            v.add(fail(Rule::AnyOf, schema).with_message(format!(
                "{} does not match any of the possible schemas",
                display(value)
            )));
        }
    }

    if let Some(not) = &schema.not {
        let mut detached = v.detach();
        validate_at(not, value, target, &mut detached);
        if !detached.has_failures() {
            v.add(fail(Rule::Not, schema)
                .with_message(format!("{} matches the not schema", display(value))));
        }
    }

    if let Some(tref) = target {
        if let Some(hook) = v.provider().post_validate(tref.id()) {
            hook(value, v);
        }
    }
}

fn validate_number(schema: &Schema, number: f64, raw: &Value, v: &mut Validator) {
    if let Some(maximum) = schema.maximum {
        let invalid = if schema.exclusive_maximum {
            number >= maximum
        } else {
            number > maximum
        };
        if invalid {
            v.add(fail(Rule::Maximum, schema).with_message(format!(
                "{} exceeds the maximum of {maximum}",
                display(raw)
            )));
        }
    }
    if let Some(minimum) = schema.minimum {
        let invalid = if schema.exclusive_minimum {
            number <= minimum
        } else {
            number < minimum
        };
        if invalid {
            v.add(fail(Rule::Minimum, schema).with_message(format!(
                "{} is below the minimum of {minimum}",
                display(raw)
            )));
        }
    }
    if let Some(multiple_of) = schema.multiple_of {
        if multiple_of != 0.0 && number % multiple_of != 0.0 {
            v.add(fail(Rule::MultipleOf, schema).with_message(format!(
                "{} is not a multiple of {multiple_of}",
                display(raw)
            )));
        }
    }
}

fn validate_string(schema: &Schema, text: &str, v: &mut Validator) {
    let length = text.chars().count() as u64;

    if let Some(min_length) = schema.min_length {
        if length < min_length {
            v.add(fail(Rule::MinLength, schema).with_message(format!(
                "{length} does not meet the minimum length of {min_length}"
            )));
        }
    }
    if let Some(max_length) = schema.max_length {
        if length > max_length {
            v.add(fail(Rule::MaxLength, schema).with_message(format!(
                "{length} exceeds the maximum length of {max_length}"
            )));
        }
    }
}

fn validate_array(schema: &Schema, items: &[Value], target: Option<TypeRef>, v: &mut Validator) {
    let count = items.len() as u64;

    if let Some(min_items) = schema.min_items {
        if count < min_items {
            v.add(fail(Rule::MinItems, schema).with_message(format!(
                "{count} does not meet the minimum items of {min_items}"
            )));
        }
    }
    if let Some(max_items) = schema.max_items {
        if count > max_items {
            v.add(fail(Rule::MaxItems, schema).with_message(format!(
                "{count} exceeds the maximum items of {max_items}"
            )));
        }
    }

    if let Some(item_schema) = &schema.items {
        let element = target.and_then(|t| match descriptor_of(t).kind() {
            DescriptorKind::List(element) | DescriptorKind::FixedList(element, _) => Some(*element),
            _ => None,
        });
        for (index, item) in items.iter().enumerate() {
            let mut item_cursor = v.next(index.to_string());
            validate_at(item_schema, item, element, &mut item_cursor);
        }
    }

    if schema.unique_items {
        let mut seen = HashSet::new();
        for item in items {
            // Stringified equality; reporting stops at the first duplicate.
            if !seen.insert(display(item)) {
                v.add(fail(Rule::UniqueItems, schema).with_message(format!(
                    "{} is not a unique item",
                    display(item)
                )));
                break;
            }
        }
    }
}

fn validate_object(
    schema: &Schema,
    fields: &Map<String, Value>,
    target: Option<TypeRef>,
    v: &mut Validator,
) {
    let desc = target.map(descriptor_of);

    if !schema.properties.is_empty() {
        let struct_fields = desc.as_ref().and_then(|d| match d.kind() {
            DescriptorKind::Struct(struct_fields) => Some(struct_fields.as_slice()),
            _ => None,
        });

        for (property, property_schema) in &schema.properties {
            match fields.get(property) {
                None | Some(Value::Null) => {
                    let required = schema
                        .required
                        .iter()
                        .any(|candidate| candidate.eq_ignore_ascii_case(property));
                    if required {
                        let mut cursor = v.next(property.clone());
                        cursor.add(
                            fail(Rule::Required, schema)
                                .with_message(format!("{property} is a required field")),
                        );
                    }
                }
                Some(present) => {
                    let field_target = struct_fields
                        .and_then(|f| find_struct_field(f, property).map(|(_, tref)| tref));
                    let mut cursor = v.next(property.clone());
                    validate_at(property_schema, present, field_target, &mut cursor);
                }
            }
        }
        // Properties the schema does not list are not flagged; the closed
        // object policy is advisory only.
        return;
    }

    let count = fields.len() as u64;
    if let Some(min_properties) = schema.min_properties {
        if count < min_properties {
            v.add(fail(Rule::MinProperties, schema).with_message(format!(
                "{count} does not meet the minimum properties of {min_properties}"
            )));
        }
    }
    if let Some(max_properties) = schema.max_properties {
        if count > max_properties {
            v.add(fail(Rule::MaxProperties, schema).with_message(format!(
                "{count} exceeds the maximum properties of {max_properties}"
            )));
        }
    }

    if let Some(value_schema) = schema
        .additional_properties
        .as_ref()
        .and_then(AdditionalProperties::schema)
    {
        let value_target = desc.as_ref().and_then(|d| match d.kind() {
            DescriptorKind::Map(values) => Some(*values),
            _ => None,
        });
        for (key, value) in fields {
            let mut cursor = v.next(key.clone());
            validate_at(value_schema, value, value_target, &mut cursor);
        }
    }
}

fn fail(rule: Rule, schema: &Schema) -> Validation {
    let mut failure = Validation::rule(rule);
    if let Some(name) = schema.name() {
        failure = failure.with_schema(name);
    }
    failure
}

/// Strips optional wrappers so options and hooks key on the concrete type.
fn concrete_target(tref: TypeRef) -> TypeRef {
    match descriptor_of(tref).kind() {
        DescriptorKind::Optional(inner) => concrete_target(*inner),
        _ => tref,
    }
}

/// Stringifies a value for pattern, format, enum, and uniqueness checks.
/// Strings stringify to their content, everything else to its JSON form.
fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Whether a value is its kind's default.
fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

static PATTERNS: OnceLock<DashMap<String, Option<Arc<Regex>>>> = OnceLock::new();

/// Compiles and caches a schema pattern. An invalid pattern disables the
/// check and is reported once through tracing.
fn compiled_pattern(pattern: &str) -> Option<Arc<Regex>> {
    let cache = PATTERNS.get_or_init(DashMap::new);
    if let Some(found) = cache.get(pattern) {
        return found.clone();
    }
    let compiled = match Regex::new(pattern) {
        Ok(regex) => Some(Arc::new(regex)),
        Err(error) => {
            tracing::warn!(pattern, %error, "invalid schema pattern, skipping check");
            None
        }
    };
    cache.insert(pattern.to_owned(), compiled.clone());
    compiled
}
