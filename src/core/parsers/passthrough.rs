// src/core/parsers/passthrough.rs

use super::{ArgumentParser, ParseError};
use crate::{
    core::paths::launch_script,
    models::{NamedArgs, ParsedArgs},
    system::writer::Writer,
};

/// Performs no parsing at all: every argument reaches the action as a
/// positional value, in order, and there are no named values.
#[derive(Debug, Clone)]
pub struct PassThroughParser {
    path: String,
    program: Option<String>,
}

impl PassThroughParser {
    /// `path` is the section/command path shown in the usage line.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            program: None,
        }
    }

    /// Overrides the program name shown in usage (defaults to the launch script).
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }
}

impl ArgumentParser for PassThroughParser {
    fn parse(&self, args: &[String], _writer: &mut dyn Writer) -> Result<ParsedArgs, ParseError> {
        Ok(ParsedArgs {
            positional: args.to_vec(),
            named: NamedArgs::new(),
        })
    }

    fn usage(&self, writer: &mut dyn Writer) {
        let program = self.program.clone().unwrap_or_else(launch_script);
        writer.write(&format!("Usage: {} {} [OPTION, ..]", program, self.path));
    }
}
