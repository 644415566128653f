// src/core/validators.rs

//! Ready-made validate hooks for [`CommandOption::validate_with`](crate::core::option::CommandOption::validate_with).
//! Like the converters, they check every item of a multi-valued option.

use regex::Regex;

use crate::{core::converters, core::option::HookError, models::Value};

/// Runs `check` on a text value, or on each text item of a list.
fn check_text(value: &Value, check: &dyn Fn(&str) -> Result<(), HookError>) -> Result<(), HookError> {
    match value {
        Value::Str(text) => check(text),
        Value::List(items) => items.iter().try_for_each(|item| check_text(item, check)),
        other => Err(HookError::invalid(format!("expected text, found '{}'", other))),
    }
}

fn boolean_text(text: &str) -> Result<(), HookError> {
    converters::parse_boolean(Value::from(text)).map(|_| ())
}

fn int_text(text: &str) -> Result<(), HookError> {
    converters::parse_int(Value::from(text)).map(|_| ())
}

/// Accepts the same text [`converters::parse_boolean`] does.
pub fn validate_boolean(value: &Value) -> Result<(), HookError> {
    check_text(value, &boolean_text)
}

/// Accepts any text that parses as a signed integer.
pub fn validate_int(value: &Value) -> Result<(), HookError> {
    check_text(value, &int_text)
}

/// Builds a hook accepting values that match `pattern` somewhere in the text.
/// Anchor the pattern to require a full match.
pub fn validate_regex(
    pattern: &str,
) -> Result<impl Fn(&Value) -> Result<(), HookError> + 'static, regex::Error> {
    let regex = Regex::new(pattern)?;
    Ok(move |value: &Value| {
        check_text(value, &|text: &str| {
            if regex.is_match(text) {
                Ok(())
            } else {
                Err(HookError::invalid(format!(
                    "value '{}' does not match the pattern '{}'",
                    text,
                    regex.as_str()
                )))
            }
        })
    })
}

// MARK: --- UNIT TESTS ---
