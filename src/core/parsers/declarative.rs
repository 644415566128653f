// src/core/parsers/declarative.rs

use std::collections::{HashMap, HashSet};

use super::{ArgumentParser, ParseError, looks_like_option};
use crate::{
    core::{command::CommandUsage, option::CommandOption},
    models::{NamedArgs, ParsedArgs, Value},
    system::writer::Writer,
};

/// The default strategy: an optparse-style parser bound to a command's declared options.
///
/// # Logic:
/// - Every option name and alias is a trigger for that option.
/// - A value option consumes the next token (even one starting with `-`), or the
///   text after `=` in `--name=value`.
/// - A flag never consumes a token; its presence stores `true`.
/// - Options allowing multiple values collect every occurrence into a list.
/// - `--` ends option processing; everything after it is positional.
/// - `-h`/`--help`, unless a declared option claims them, stop parsing with an
///   empty [`CommandUsage`] so only the usage is shown.
/// - Any other token is positional.
///
/// Named values are keyed by the option's name (`--name`). Options the user did
/// not supply are present with their declared default, or null.
#[derive(Debug)]
pub struct DeclarativeParser<'a> {
    options: Vec<&'a CommandOption>,
}

impl<'a> DeclarativeParser<'a> {
    /// Binds the parser to the options it recognises.
    pub fn new(options: impl IntoIterator<Item = &'a CommandOption>) -> Self {
        Self {
            options: options.into_iter().collect(),
        }
    }

    /// Maps every trigger (name and aliases) to the option it sets.
    fn trigger_table(&self) -> HashMap<&'a str, &'a CommandOption> {
        let mut table = HashMap::new();
        for &option in &self.options {
            for trigger in option.triggers() {
                table.insert(trigger, option);
            }
        }
        table
    }
}

impl ArgumentParser for DeclarativeParser<'_> {
    fn parse(&self, args: &[String], _writer: &mut dyn Writer) -> Result<ParsedArgs, ParseError> {
        let triggers = self.trigger_table();

        let mut named = NamedArgs::new();
        for option in &self.options {
            named.insert(option.name(), option.declared_default().cloned());
        }

        let mut positional = Vec::new();
        let mut unexpected = Vec::new();
        let mut missing_values = Vec::new();
        // Multi-valued options whose default has already been replaced by user input.
        let mut collected: HashSet<&str> = HashSet::new();

        let mut tokens = args.iter();
        while let Some(token) = tokens.next() {
            if token == "--" {
                positional.extend(tokens.by_ref().cloned());
                break;
            }

            if !looks_like_option(token) {
                positional.push(token.clone());
                continue;
            }

            let (trigger, inline_value) = match token.split_once('=') {
                Some((t, v)) if t.starts_with("--") => (t, Some(v)),
                _ => (token.as_str(), None),
            };

            let Some(option) = triggers.get(trigger) else {
                if matches!(trigger, "-h" | "--help") {
                    log::debug!("Help requested with '{}'", token);
                    return Err(CommandUsage::default().into());
                }
                log::trace!("Unrecognised option token '{}'", token);
                unexpected.push(token.clone());
                continue;
            };

            if option.is_flag() {
                if inline_value.is_some() {
                    // Flags do not take values; `--force=yes` is not a valid trigger.
                    unexpected.push(token.clone());
                } else {
                    named.insert(option.name(), Some(Value::Bool(true)));
                }
                continue;
            }

            let value = match inline_value {
                Some(v) => v.to_string(),
                None => match tokens.next() {
                    Some(v) => v.clone(),
                    None => {
                        missing_values.push(trigger.to_string());
                        continue;
                    }
                },
            };
            log::trace!("Option '{}' set to '{}'", option.name(), value);

            if option.allows_multiple() {
                if collected.insert(option.name()) {
                    named.insert(option.name(), Some(Value::List(vec![Value::Str(value)])));
                } else {
                    named.append(option.name(), Value::Str(value));
                }
            } else {
                named.insert(option.name(), Some(Value::Str(value)));
            }
        }

        if !unexpected.is_empty() || !missing_values.is_empty() {
            return Err(CommandUsage {
                unexpected,
                missing_values,
                ..CommandUsage::default()
            }
            .into());
        }

        Ok(ParsedArgs { positional, named })
    }
}

// MARK: --- UNIT TESTS ---
