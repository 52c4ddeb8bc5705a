//! The per-field annotation mini-language.
//!
//! Annotations are `key=value` pairs separated by commas; a backslash
//! escapes a following comma (or pipe, inside enum lists). Recognized keys
//! override the computed property schema: titles, descriptions, formats,
//! patterns, bounds, enum sets, and the deprecated/required/nullable/
//! read-only/write-only flags.
//!
//! Values that fail to parse for numeric or boolean keys are ignored with a
//! warning; annotation handling is never fatal.

use serde_json::Value;

use crate::Schema;

/// Splits `input` on `delim`, honoring backslash escapes of the delimiter.
/// Backslashes before any other character are kept verbatim.
#[must_use]
pub fn split_escaped(input: &str, delim: char) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' && chars.peek() == Some(&delim) {
            current.push(delim);
            chars.next();
        } else if ch == delim {
            tokens.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    tokens.push(current);
    tokens
}

/// Applies an annotation string to the given schema.
///
/// Example: `title=Count,minimum=0,maximum=10`. Flag keys (`deprecated`,
/// `required`, `nullable`, `readonly`, `writeonly`) take no value; the
/// exclusive-bound keys accept an optional boolean value and default to
/// `true` when bare.
pub fn apply_annotations(schema: &mut Schema, annotation: &str) {
    for option in split_escaped(annotation, ',') {
        let (key, value) = match option.split_once('=') {
            Some((key, value)) => (key.trim(), value),
            None => (option.trim(), option.trim()),
        };

        match key.to_ascii_lowercase().as_str() {
            "title" => schema.title = Some(value.to_owned()),
            "desc" | "description" => schema.description = Some(value.to_owned()),
            "format" => schema.format = Some(value.to_owned()),
            "pattern" => schema.pattern = Some(value.to_owned()),
            "deprecated" => schema.deprecated = true,
            "required" => schema.nullable = false,
            "nullable" | "null" => schema.nullable = true,
            "readonly" => schema.read_only = true,
            "writeonly" => schema.write_only = true,
            "enum" => {
                schema.enum_values = split_escaped(value, '|')
                    .into_iter()
                    .filter(|constant| !constant.is_empty())
                    .map(Value::String)
                    .collect();
            }
            "minlength" => apply_integer(&mut schema.min_length, key, value),
            "maxlength" => apply_integer(&mut schema.max_length, key, value),
            "minitems" => apply_integer(&mut schema.min_items, key, value),
            "maxitems" => apply_integer(&mut schema.max_items, key, value),
            "multipleof" => apply_number(&mut schema.multiple_of, key, value),
            "maximum" | "max" => apply_number(&mut schema.maximum, key, value),
            "minimum" | "min" => apply_number(&mut schema.minimum, key, value),
            "exclusivemaximum" | "exclusivemax" => {
                apply_flag(&mut schema.exclusive_maximum, key, value);
            }
            "exclusiveminimum" | "exclusivemin" => {
                apply_flag(&mut schema.exclusive_minimum, key, value);
            }
            "" => {}
            other => {
                tracing::debug!(key = other, "ignoring unrecognized annotation key");
            }
        }
    }
}

fn apply_integer(slot: &mut Option<u64>, key: &str, value: &str) {
    match value.parse::<u64>() {
        Ok(parsed) => *slot = Some(parsed),
        Err(_) => tracing::warn!(key, value, "ignoring unparseable annotation value"),
    }
}

fn apply_number(slot: &mut Option<f64>, key: &str, value: &str) {
    match value.parse::<f64>() {
        Ok(parsed) => *slot = Some(parsed),
        Err(_) => tracing::warn!(key, value, "ignoring unparseable annotation value"),
    }
}

fn apply_flag(slot: &mut bool, key: &str, value: &str) {
    // A bare flag (no `=value`) means true.
    let value = if value == key { "true" } else { value };
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => *slot = true,
        "0" | "f" | "F" | "FALSE" | "false" | "False" => *slot = false,
        _ => tracing::warn!(key, value, "ignoring unparseable annotation value"),
    }
}
