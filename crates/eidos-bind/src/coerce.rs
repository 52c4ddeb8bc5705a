//! Coercion of value trees toward a destination type.
//!
//! Coercion walks the destination descriptor in parallel with the tree.
//! Struct fields are matched case-insensitively by wire name (and the
//! emitted key is normalized to the declared wire name, so the strict
//! decoder that runs afterwards agrees with the match); array nodes recurse
//! into the element type; scalar leaves parse toward the destination leaf
//! kind. A comma-separated scalar destined for an array is split and each
//! part parsed independently.
//!
//! Coercion never fails: a leaf that cannot be parsed keeps its original
//! string, and the authoritative wrong-type error surfaces later from the
//! strict structural decode shared with body decoding.

use serde_json::{Map, Number, Value};

use eidos_schema::{
    descriptor_of, find_struct_field, DescriptorKind, ScalarKind, TypeDescriptor, TypeRef,
};

use crate::tree::ValueNode;

/// Coerces a value tree toward the destination type, producing the JSON
/// value handed to the strict transfer step.
#[must_use]
pub fn coerce(node: &ValueNode, target: TypeRef) -> Value {
    coerce_node(node, &descriptor_of(target))
}

fn coerce_node(node: &ValueNode, desc: &TypeDescriptor) -> Value {
    // Optional wrappers are transparent except for empty scalars, which
    // become null.
    if let DescriptorKind::Optional(inner) = desc.kind() {
        return match node {
            ValueNode::Unset => Value::Null,
            ValueNode::Scalar(raw) if raw.is_empty() => Value::Null,
            _ => coerce_node(node, &descriptor_of(*inner)),
        };
    }

    match node {
        ValueNode::Unset => Value::Null,
        ValueNode::Scalar(raw) => coerce_scalar(raw, desc),
        ValueNode::Array(items) => match desc.kind() {
            DescriptorKind::List(element) | DescriptorKind::FixedList(element, _) => {
                let element = descriptor_of(*element);
                Value::Array(items.iter().map(|item| coerce_node(item, &element)).collect())
            }
            _ => node.to_value(),
        },
        ValueNode::Object(fields) => match desc.kind() {
            DescriptorKind::Struct(struct_fields) => {
                let mut out = Map::new();
                for (key, child) in fields {
                    match find_struct_field(struct_fields, key) {
                        Some((wire_name, value_type)) => {
                            out.insert(wire_name, coerce(child, value_type));
                        }
                        None => {
                            out.insert(key.clone(), child.to_value());
                        }
                    }
                }
                Value::Object(out)
            }
            _ => node.to_value(),
        },
    }
}

fn coerce_scalar(raw: &str, desc: &TypeDescriptor) -> Value {
    match desc.kind() {
        DescriptorKind::Scalar(ScalarKind::String) => Value::String(raw.to_owned()),
        DescriptorKind::Scalar(ScalarKind::Integer) => {
            parse_integer(raw).unwrap_or_else(|| Value::String(raw.to_owned()))
        }
        DescriptorKind::Scalar(ScalarKind::Float) => {
            parse_float(raw).unwrap_or_else(|| Value::String(raw.to_owned()))
        }
        DescriptorKind::Scalar(ScalarKind::Boolean) => parse_bool_literal(raw)
            .map(Value::Bool)
            .unwrap_or_else(|| Value::String(raw.to_owned())),
        DescriptorKind::List(element) => split_scalar_list(raw, *element, None)
            .unwrap_or_else(|| Value::String(raw.to_owned())),
        DescriptorKind::FixedList(element, len) => split_scalar_list(raw, *element, Some(*len))
            .unwrap_or_else(|| Value::String(raw.to_owned())),
        _ => Value::String(raw.to_owned()),
    }
}

/// Splits a comma-separated scalar into an array of the element kind. The
/// split is all-or-nothing: any part that fails to parse keeps the whole
/// original string.
fn split_scalar_list(raw: &str, element: TypeRef, limit: Option<usize>) -> Option<Value> {
    let element = descriptor_of(element);
    let mut parts: Vec<&str> = raw.split(',').collect();
    if let Some(limit) = limit {
        parts.truncate(limit);
    }
    let mut items = Vec::with_capacity(parts.len());
    for part in parts {
        items.push(parse_scalar_strict(part, &element)?);
    }
    Some(Value::Array(items))
}

fn parse_scalar_strict(raw: &str, desc: &TypeDescriptor) -> Option<Value> {
    match desc.kind() {
        DescriptorKind::Scalar(ScalarKind::String) => Some(Value::String(raw.to_owned())),
        DescriptorKind::Scalar(ScalarKind::Integer) => parse_integer(raw),
        DescriptorKind::Scalar(ScalarKind::Float) => parse_float(raw),
        DescriptorKind::Scalar(ScalarKind::Boolean) => parse_bool_literal(raw).map(Value::Bool),
        DescriptorKind::Optional(inner) => {
            if raw.is_empty() {
                Some(Value::Null)
            } else {
                parse_scalar_strict(raw, &descriptor_of(*inner))
            }
        }
        _ => None,
    }
}

fn parse_integer(raw: &str) -> Option<Value> {
    if let Ok(signed) = raw.parse::<i64>() {
        return Some(Value::Number(Number::from(signed)));
    }
    raw.parse::<u64>()
        .ok()
        .map(|unsigned| Value::Number(Number::from(unsigned)))
}

fn parse_float(raw: &str) -> Option<Value> {
    let parsed = raw.parse::<f64>().ok()?;
    Number::from_f64(parsed).map(Value::Number)
}

/// Parses the boolean literal set accepted on the wire.
#[must_use]
pub fn parse_bool_literal(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
