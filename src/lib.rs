//! # cmdtree
//!
//! A hierarchical command dispatcher. An application builds a tree of
//! [`Section`]s and [`Command`]s, declares each command's [`CommandOption`]s,
//! then hands argv to [`Cli::run`], which finds the deepest node the
//! arguments name, parses and validates the rest, and calls the command's
//! action.
//!
//! ```no_run
//! use cmdtree::{Cli, CommandOption, TerminalWriter};
//!
//! let mut cli = Cli::new(TerminalWriter::default());
//! let users = cli.create_section("users", "manage users")?;
//! users
//!     .create_command("create", "creates a user", |_, named| {
//!         println!("creating {}", named.get_str("username").unwrap_or_default());
//!         Ok(None)
//!     })?
//!     .add_option(CommandOption::new("--username", "login name"))?;
//!
//! let args: Vec<String> = std::env::args().skip(1).collect();
//! std::process::exit(cli.run(&args)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
/// Exit codes and fixed strings.
pub mod constants;
pub mod core;
/// Argument values handed to hooks and actions.
pub mod models;
pub mod system;

pub use cli::Cli;
pub use crate::core::{
    command::{Command, CommandError, CommandUsage},
    option::{CommandOption, HookError, OptionGroup},
    parsers::{AbortMode, ArgumentParser, PassThroughParser, UnknownArgsParser},
    resolver::{Node, resolve},
    section::{Section, StructureError},
};
pub use models::{NamedArgs, ParsedArgs, Value};
pub use system::writer::{RecordingWriter, TerminalWriter, Writer};
