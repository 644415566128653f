// src/core/parsers/mod.rs

//! # Argument Parser Strategies
//!
//! A command hands the arguments left over after tree resolution to one of
//! these strategies, which splits them into positional and named values.
//!
//! - **`declarative`**: the default. Driven by the options the command declares;
//!   rejects unknown triggers.
//! - **`unknown_args`**: for commands whose options cannot be listed ahead of
//!   time. Reads `--key value` / `--flag` pairs without a schema.
//! - **`passthrough`**: no interpretation at all; everything is positional.

use std::fmt;
use thiserror::Error;

use crate::{
    core::command::CommandUsage,
    models::ParsedArgs,
    system::writer::Writer,
};

/// The default, option-driven parser.
pub mod declarative;
/// Raw argument forwarding.
pub mod passthrough;
/// Parsing of options not known ahead of time.
pub mod unknown_args;

pub use declarative::DeclarativeParser;
pub use passthrough::PassThroughParser;
pub use unknown_args::UnknownArgsParser;

/// Why a schema-less parser gave up after printing its usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// A token could not be read as an option, or help was requested.
    Unparsable,
    /// One or more required options were never supplied.
    MissingRequired,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparsable => write!(f, "arguments could not be parsed"),
            Self::MissingRequired => write!(f, "required options were not specified"),
        }
    }
}

/// How a parser behaves once it has decided to abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbortMode {
    /// Terminate the process with the usage exit code.
    #[default]
    Exit,
    /// Return [`ParseError::Aborted`] so the caller (usually a test) can inspect it.
    Error,
}

/// Why a parser strategy could not produce arguments.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The arguments do not fit the declared options.
    #[error(transparent)]
    Usage(#[from] CommandUsage),
    /// The parser printed its usage and gave up.
    #[error("Parsing aborted: {0}")]
    Aborted(AbortReason),
}

/// Turns a command's unconsumed arguments into positional and named values.
///
/// Named keys may be returned either as triggers (`--name`) or keywords
/// (`name`); the command normalises them to keywords before use.
pub trait ArgumentParser {
    fn parse(&self, args: &[String], writer: &mut dyn Writer) -> Result<ParsedArgs, ParseError>;

    /// Prints a short usage summary for this strategy, if it has one.
    fn usage(&self, _writer: &mut dyn Writer) {}
}

/// Whether `token` is shaped like an option trigger rather than a plain value.
/// A lone `-` is conventionally a value (stdin), not a trigger.
pub(crate) fn looks_like_option(token: &str) -> bool {
    token.len() > 1 && token.starts_with(crate::constants::OPTION_PREFIX)
}
