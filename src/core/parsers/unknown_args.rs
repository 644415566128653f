// src/core/parsers/unknown_args.rs

use super::{AbortMode, AbortReason, ArgumentParser, ParseError};
use crate::{
    constants::{EX_USAGE, OPTION_PREFIX},
    core::paths::launch_script,
    models::{NamedArgs, ParsedArgs, Value},
    system::writer::Writer,
};

/// A parser for commands whose valid options cannot be listed ahead of time,
/// e.g. commands that forward their options to a plugin or remote backend.
///
/// Arguments are read as `--key value` pairs. A key followed by another key, or
/// by nothing, is a flag and stores `true`, replacing anything stored before.
/// Repeating a key with values collects them into a list in the order given. Keys are stored without their leading dashes.
///
/// Only a fixed set of required options is known; they are checked once the
/// whole argument list has been read. `-h`/`--help`, a token that is not a key,
/// or a missing required option print this parser's usage and abort.
#[derive(Debug, Clone)]
pub struct UnknownArgsParser {
    path: String,
    program: Option<String>,
    required: Vec<(String, String)>,
    abort_mode: AbortMode,
}

impl UnknownArgsParser {
    /// `path` is the section/command path shown in the usage line, e.g. `plugins configure`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            program: None,
            required: Vec::new(),
            abort_mode: AbortMode::default(),
        }
    }

    /// Adds a required option, given by its full trigger (`--id`) and a description.
    pub fn require(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.required.push((name.into(), description.into()));
        self
    }

    /// Chooses between exiting the process and returning an error on abort.
    pub fn abort_mode(mut self, mode: AbortMode) -> Self {
        self.abort_mode = mode;
        self
    }

    /// Overrides the program name shown in usage (defaults to the launch script).
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    /// Required triggers with their descriptions.
    pub fn required_options(&self) -> &[(String, String)] {
        &self.required
    }

    fn abort(&self, writer: &mut dyn Writer, reason: AbortReason) -> ParseError {
        log::debug!("Unknown-args parser for '{}' aborting: {}", self.path, reason);
        self.usage(writer);
        if self.abort_mode == AbortMode::Exit {
            std::process::exit(EX_USAGE);
        }
        ParseError::Aborted(reason)
    }
}

/// Strips one or two leading dashes. Returns `None` for tokens that are not keys.
fn arg_name(token: &str) -> Option<&str> {
    token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix(OPTION_PREFIX))
}

impl ArgumentParser for UnknownArgsParser {
    fn parse(&self, args: &[String], writer: &mut dyn Writer) -> Result<ParsedArgs, ParseError> {
        let mut named = NamedArgs::new();
        let mut unmet: Vec<&str> = self.required.iter().map(|(name, _)| name.as_str()).collect();

        let mut tokens = args.iter().peekable();
        while let Some(token) = tokens.next() {
            // Required options are listed by full trigger, so compare before stripping.
            unmet.retain(|name| *name != token.as_str());

            let name = match arg_name(token) {
                Some(name) if !matches!(name, "h" | "help") => name,
                _ => return Err(self.abort(writer, AbortReason::Unparsable)),
            };

            let takes_value = tokens
                .peek()
                .is_some_and(|next| !next.starts_with(OPTION_PREFIX));
            let value = if takes_value { tokens.next().cloned() } else { None };

            match value {
                Some(value) => {
                    log::trace!("Key '{}' = '{}'", name, value);
                    named.append(name, Value::Str(value));
                }
                None => {
                    // A flag reading replaces any values collected so far.
                    log::trace!("Key '{}' read as a flag", name);
                    named.insert(name, Some(Value::Bool(true)));
                }
            }
        }

        if !unmet.is_empty() {
            return Err(self.abort(writer, AbortReason::MissingRequired));
        }

        Ok(ParsedArgs {
            positional: Vec::new(),
            named,
        })
    }

    fn usage(&self, writer: &mut dyn Writer) {
        let program = self.program.clone().unwrap_or_else(launch_script);
        writer.write(&format!("Usage: {} {} [OPTION, ..]", program, self.path));
        writer.write("");
        writer.write("Valid options follow one of the following formats:");
        writer.write("  --<option> <value>");
        writer.write("  --<flag>");
        writer.write("");

        if !self.required.is_empty() {
            writer.write("The following options are required:");
            let max_width = self.required.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
            for (name, description) in &self.required {
                writer.write(&format!("  {:<width$} - {}", name, description, width = max_width));
            }
        }
    }
}

// MARK: --- UNIT TESTS ---
