// src/models.rs

use std::collections::BTreeMap;
use std::fmt;

use crate::constants::OPTION_PREFIX;

// --- RUNTIME VALUES ---
// These are the values that flow from the argument parsers, through the
// validate/transform hooks, and into a command's action.

/// A single parsed argument value.
///
/// Parsers only ever produce `Str`, `Bool` (flags) and `List` (repeated options);
/// `Int` and nested lists appear once transform hooks have converted the raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Raw text as typed.
    Str(String),
    /// A flag, or a converted boolean.
    Bool(bool),
    /// A converted integer.
    Int(i64),
    /// Values of a repeated option.
    List(Vec<Value>),
}

impl Value {
    /// Returns the string contents if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the items if this is a `List`.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Appends `value`, converting `self` into a list first if it is a scalar.
    /// The existing scalar becomes the first element so insertion order is kept.
    pub fn push(&mut self, value: Value) {
        match self {
            Self::List(items) => items.push(value),
            scalar => {
                let first = std::mem::replace(scalar, Self::List(Vec::with_capacity(2)));
                if let Self::List(items) = scalar {
                    items.push(first);
                    items.push(value);
                }
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Int(i) => write!(f, "{}", i),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(values: Vec<String>) -> Self {
        Self::List(values.into_iter().map(Self::Str).collect())
    }
}

/// Strips the leading option prefix characters from a trigger (`--name` -> `name`).
pub fn keyword_of(trigger: &str) -> &str {
    trigger.trim_start_matches(OPTION_PREFIX)
}

/// Named arguments handed to a command's action.
///
/// An entry can be present with no value (`None`): the option is known to the
/// command but the user did not supply it and it has no default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedArgs {
    entries: BTreeMap<String, Option<Value>>,
}

impl NamedArgs {
    /// Creates an empty set of named arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<Value>) {
        self.entries.insert(key.into(), value);
    }

    /// Adds `value` under `key`, accumulating repeated keys into a list in the
    /// order they were supplied.
    pub fn append(&mut self, key: &str, value: Value) {
        match self.entries.get_mut(key) {
            Some(Some(existing)) => existing.push(value),
            Some(slot) => *slot = Some(value),
            None => {
                self.entries.insert(key.to_string(), Some(value));
            }
        }
    }

    /// Removes and returns the entry for `key`.
    pub fn remove(&mut self, key: &str) -> Option<Option<Value>> {
        self.entries.remove(key)
    }

    /// Returns the value for `key` if it is present and not null.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    /// Whether `key` has an entry at all, null or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether `key` has a non-null value.
    pub fn is_present(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the string value for `key`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Returns the integer value for `key`, if it is an integer.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    /// Returns the state of a flag. Absent, null and non-boolean entries read as `false`.
    pub fn get_flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Returns the string items of a multi-valued entry. A scalar string is
    /// returned as a one-element list.
    pub fn get_list(&self, key: &str) -> Vec<&str> {
        match self.get(key) {
            Some(Value::List(items)) => items.iter().filter_map(Value::as_str).collect(),
            Some(Value::Str(s)) => vec![s.as_str()],
            _ => Vec::new(),
        }
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Number of entries, null ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites every key to its keyword form (leading dashes stripped).
    ///
    /// If two keys collapse onto the same keyword, a non-null value wins over a null one.
    pub fn into_keywords(self) -> Self {
        let mut entries: BTreeMap<String, Option<Value>> = BTreeMap::new();
        for (key, value) in self.entries {
            let keyword = keyword_of(&key).to_string();
            match entries.get_mut(&keyword) {
                Some(slot) if slot.is_none() => *slot = value,
                Some(_) => {}
                None => {
                    entries.insert(keyword, value);
                }
            }
        }
        Self { entries }
    }
}

/// The result of running a parser strategy over a command's unconsumed arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Tokens that were not options.
    pub positional: Vec<String>,
    /// Option values keyed by trigger name or keyword.
    pub named: NamedArgs,
}

// MARK: --- UNIT TESTS ---
