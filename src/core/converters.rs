// src/core/converters.rs

//! Ready-made transform hooks for [`CommandOption::transform_with`](crate::core::option::CommandOption::transform_with).
//!
//! Each converter reads the raw text the parser produced. For options that
//! allow multiple values, the conversion is applied to every item of the list.
//! The `parse_optional_*` variants store null when the user passes blank text.

use crate::{core::option::HookError, models::Value};

const VALID_TRUE_STRINGS: &[&str] = &["true"];
const VALID_FALSE_STRINGS: &[&str] = &["false"];

/// Applies `convert` to a text value, or to each text item of a list.
fn convert_text(
    value: Value,
    convert: &dyn Fn(&str) -> Result<Value, HookError>,
) -> Result<Value, HookError> {
    match value {
        Value::Str(text) => convert(&text),
        Value::List(items) => items
            .into_iter()
            .map(|item| convert_text(item, convert))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List),
        other => Err(HookError::invalid(format!("expected text, found '{}'", other))),
    }
}

/// `None` when the value is blank text, otherwise the result of `convert`.
fn optional<F>(value: Value, convert: F) -> Result<Option<Value>, HookError>
where
    F: Fn(Value) -> Result<Value, HookError>,
{
    match &value {
        Value::Str(text) if text.trim().is_empty() => Ok(None),
        _ => convert(value).map(Some),
    }
}

fn boolean_from(text: &str) -> Result<Value, HookError> {
    let normalized = text.trim().to_lowercase();
    if VALID_TRUE_STRINGS.contains(&normalized.as_str()) {
        Ok(Value::Bool(true))
    } else if VALID_FALSE_STRINGS.contains(&normalized.as_str()) {
        Ok(Value::Bool(false))
    } else {
        Err(HookError::invalid("invalid boolean value"))
    }
}

fn int_from(text: &str) -> Result<i64, HookError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| HookError::invalid(format!("invalid integer value: '{}'", text)))
}

fn any_int_from(text: &str) -> Result<Value, HookError> {
    int_from(text).map(Value::Int)
}

fn non_negative_int_from(text: &str) -> Result<Value, HookError> {
    match int_from(text)? {
        i if i < 0 => Err(HookError::invalid("value must be a non-negative integer")),
        i => Ok(Value::Int(i)),
    }
}

fn positive_int_from(text: &str) -> Result<Value, HookError> {
    match int_from(text)? {
        i if i < 1 => Err(HookError::invalid("value must be a positive integer")),
        i => Ok(Value::Int(i)),
    }
}

/// `true` / `false`, case-insensitive, surrounding whitespace ignored.
pub fn parse_boolean(value: Value) -> Result<Value, HookError> {
    convert_text(value, &boolean_from)
}

/// Like [`parse_boolean`], but blank text becomes null.
pub fn parse_optional_boolean(value: Value) -> Result<Option<Value>, HookError> {
    optional(value, parse_boolean)
}

/// Converts decimal text to an integer.
pub fn parse_int(value: Value) -> Result<Value, HookError> {
    convert_text(value, &any_int_from)
}

/// Like [`parse_int`], but blank text becomes null.
pub fn parse_optional_int(value: Value) -> Result<Option<Value>, HookError> {
    optional(value, parse_int)
}

/// An integer that is zero or greater.
pub fn parse_non_negative_int(value: Value) -> Result<Value, HookError> {
    convert_text(value, &non_negative_int_from)
}

/// Like [`parse_non_negative_int`], but blank text becomes null.
pub fn parse_optional_non_negative_int(value: Value) -> Result<Option<Value>, HookError> {
    optional(value, parse_non_negative_int)
}

/// An integer that is one or greater.
pub fn parse_positive_int(value: Value) -> Result<Value, HookError> {
    convert_text(value, &positive_int_from)
}

/// Like [`parse_positive_int`], but blank text becomes null.
pub fn parse_optional_positive_int(value: Value) -> Result<Option<Value>, HookError> {
    optional(value, parse_positive_int)
}

/// Splits one line of comma-separated values into a list of strings.
///
/// Fields may be wrapped in double quotes to contain commas; a doubled quote
/// inside a quoted field is a literal quote. Whitespace is kept as typed.
pub fn parse_csv_string(value: Value) -> Result<Value, HookError> {
    match value {
        Value::Str(text) => split_csv_line(&text).map(Value::from),
        other => Err(HookError::invalid(format!("expected text, found '{}'", other))),
    }
}

/// Like [`parse_csv_string`], but blank text becomes null.
pub fn parse_optional_csv_string(value: Value) -> Result<Option<Value>, HookError> {
    optional(value, parse_csv_string)
}

fn split_csv_line(line: &str) -> Result<Vec<String>, HookError> {
    if line.is_empty() {
        return Ok(Vec::new());
    }

    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                return Err(HookError::invalid("value must be a single line"));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(HookError::invalid("unterminated quoted field"));
    }
    fields.push(field);
    Ok(fields)
}

// MARK: --- UNIT TESTS ---
