// src/cli/mod.rs

//! # Embedding-Facing Runner
//!
//! [`Cli`] owns the root of the command tree and the writer usage text goes
//! to. An application assembles the tree once at start-up, then hands each
//! argument vector to [`Cli::run`] and exits with the code it returns.
//!
//! - **`usage`**: rendering of section listings, command usage and the tree map.
//! - **`args`**: the `clap` definition of the demo binary's own global flags.

use colored::Color;
use std::fmt;

use crate::{
    constants::{DEFAULT_INDENT_STEP, EX_USAGE},
    core::{
        command::{Command, CommandError},
        paths::launch_script,
        resolver::{Node, resolve},
        section::{Section, StructureError},
    },
    models::NamedArgs,
    system::writer::{TerminalWriter, Writer},
};

/// Command-line flags of the demo binary.
pub mod args;
pub mod usage;

/// A command tree plus everything needed to dispatch into it.
pub struct Cli<W: Writer = TerminalWriter> {
    root: Section,
    writer: W,
    program_name: Option<String>,
    indent_step: usize,
}

impl<W: Writer> Cli<W> {
    /// Creates an empty tree that writes usage text to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            root: Section::new("", ""),
            writer,
            program_name: None,
            indent_step: DEFAULT_INDENT_STEP,
        }
    }

    /// Overrides the program name shown in usage lines (defaults to the launch script).
    pub fn with_program_name(mut self, program_name: impl Into<String>) -> Self {
        self.program_name = Some(program_name.into());
        self
    }

    /// Sets how many spaces each nesting level is indented by in usage output.
    pub fn with_indent_step(mut self, indent_step: usize) -> Self {
        self.indent_step = indent_step;
        self
    }

    /// The program name shown in usage lines.
    pub fn program_name(&self) -> String {
        self.program_name.clone().unwrap_or_else(launch_script)
    }

    /// The root section.
    pub fn root(&self) -> &Section {
        &self.root
    }

    /// The root section, mutably.
    pub fn root_mut(&mut self) -> &mut Section {
        &mut self.root
    }

    /// The writer usage text goes to.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// The writer, mutably.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes the runner and returns its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    // --- Tree management ---

    /// Adds a top-level section.
    pub fn add_section(&mut self, section: Section) -> Result<&mut Section, StructureError> {
        self.root.add_subsection(section)
    }

    /// Creates and adds an empty top-level section.
    pub fn create_section(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Section, StructureError> {
        self.root.create_subsection(name, description)
    }

    /// Looks up a top-level section.
    pub fn find_section(&self, name: &str) -> Option<&Section> {
        self.root.find_subsection(name)
    }

    /// Looks up a top-level section, mutably.
    pub fn find_section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.root.find_subsection_mut(name)
    }

    /// Removes a top-level section; `None` if there was none.
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        self.root.remove_subsection(name)
    }

    /// Adds a command at the root, invoked without any section path.
    pub fn add_command(&mut self, command: Command) -> Result<&mut Command, StructureError> {
        self.root.add_command(command)
    }

    /// Creates a root command from its parts and adds it.
    pub fn create_command<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        action: F,
    ) -> Result<&mut Command, StructureError>
    where
        F: Fn(&[String], &NamedArgs) -> anyhow::Result<Option<i32>> + 'static,
    {
        self.root.create_command(name, description, action)
    }

    /// Looks up a root command.
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.root.find_command(name)
    }

    /// Looks up a root command, mutably.
    pub fn find_command_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.root.find_command_mut(name)
    }

    /// Removes a root command; `None` if there was none.
    pub fn remove_command(&mut self, name: &str) -> Option<Command> {
        self.root.remove_command(name)
    }

    // --- Dispatch ---

    /// Resolves `args` (without the program name) against the tree and runs
    /// the command it names.
    ///
    /// # Logic:
    /// 1. If resolution stops at a section, that section's listing is printed
    ///    and `EX_USAGE` returned.
    /// 2. Otherwise the command executes. Usage problems print the command's
    ///    usage with the details and return `EX_USAGE`.
    /// 3. Any other failure (an aborted parse, a faulty hook, a failing
    ///    action) is returned to the caller.
    pub fn run(&mut self, args: &[String]) -> Result<i32, CommandError> {
        log::debug!("Dispatching args: {:?}", args);
        let program = self.program_name();
        let step = self.indent_step;

        let (node, remaining) = resolve(&self.root, args);
        log::debug!("Resolved to {} with remaining args: {:?}", node, remaining);

        let command = match node {
            Node::Section(section) => {
                usage::print_section(&mut self.writer, section, &program, 0, step);
                return Ok(EX_USAGE);
            }
            Node::Command(command) => command,
        };

        match command.execute(&mut self.writer, remaining) {
            Ok(code) => {
                log::debug!("Command '{}' finished with exit code {}", command.name(), code);
                Ok(code)
            }
            Err(CommandError::Usage(problems)) => {
                log::debug!("Incorrect usage of '{}': {}", command.name(), problems);
                usage::print_command_usage(&mut self.writer, command, Some(&problems), 0, step);
                Ok(EX_USAGE)
            }
            Err(e) => Err(e),
        }
    }

    /// Prints the whole command tree, optionally with each command's options.
    pub fn print_cli_map(
        &mut self,
        show_options: bool,
        section_color: Option<Color>,
        command_color: Option<Color>,
    ) {
        let style = usage::MapStyle {
            show_options,
            section_color,
            command_color,
            step: self.indent_step,
        };
        usage::print_cli_map(&mut self.writer, &self.root, style);
    }
}

impl<W: Writer> fmt::Debug for Cli<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("root", &self.root)
            .field("program_name", &self.program_name)
            .field("indent_step", &self.indent_step)
            .finish_non_exhaustive()
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EX_DATAERR, EX_OK};
    use crate::core::{converters, option::CommandOption};
    use crate::models::Value;
    use crate::system::writer::RecordingWriter;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Calls = Rc<RefCell<Vec<NamedArgs>>>;

    fn to_args(params: &[&str]) -> Vec<String> {
        params.iter().map(|s| s.to_string()).collect()
    }

    /// root -> users -> create (--username required, --group optional)
    ///                  list   (--limit positive int)
    fn users_cli() -> (Cli<RecordingWriter>, Calls) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let mut cli = Cli::new(RecordingWriter::new()).with_program_name("demo");

        let sink = Rc::clone(&calls);
        let users = cli.create_section("users", "manage users").unwrap();
        users
            .create_command("create", "creates a user", move |_, named| {
                sink.borrow_mut().push(named.clone());
                Ok(None)
            })
            .unwrap()
            .create_option("--username", "login name", true)
            .unwrap()
            .create_option("--group", "primary group", false)
            .unwrap();
        users
            .create_command("list", "lists users", |_, named| {
                Ok(named.get_int("limit").and_then(|limit| i32::try_from(limit).ok()))
            })
            .unwrap()
            .add_option(
                CommandOption::new("--limit", "maximum rows")
                    .optional()
                    .transform_with(converters::parse_positive_int),
            )
            .unwrap();
        (cli, calls)
    }

    #[test]
    fn test_run_invokes_action_with_keywords() {
        let (mut cli, calls) = users_cli();
        let code = cli.run(&to_args(&["users", "create", "--username", "alice"])).unwrap();
        assert_eq!(code, EX_OK);

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].get_str("username"), Some("alice"));
        assert!(calls[0].contains_key("group"));
        assert!(!calls[0].is_present("group"));
    }

    #[test]
    fn test_run_missing_required_prints_usage() {
        let (mut cli, calls) = users_cli();
        let code = cli.run(&to_args(&["users", "create"])).unwrap();
        assert_eq!(code, EX_USAGE);
        assert!(calls.borrow().is_empty());

        let writer = cli.writer();
        assert_eq!(writer.lines()[0], "Command: create");
        assert!(writer.contains("The following options are required but were not specified:"));
        assert_eq!(writer.lines().last().map(String::as_str), Some("  --username"));
    }

    #[test]
    fn test_run_help_prints_clean_usage() {
        let (mut cli, calls) = users_cli();
        let code = cli.run(&to_args(&["users", "create", "--help"])).unwrap();
        assert_eq!(code, EX_USAGE);
        assert!(calls.borrow().is_empty());

        let writer = cli.writer();
        assert_eq!(writer.lines()[0], "Command: create");
        assert!(writer.contains("Available Arguments:"));
        assert!(!writer.contains("The following options"));
        assert!(!writer.contains("  --help"));
    }

    #[test]
    fn test_run_unknown_command_prints_section() {
        let (mut cli, _) = users_cli();
        let code = cli.run(&to_args(&["users", "bogus"])).unwrap();
        assert_eq!(code, EX_USAGE);
        let writer = cli.writer();
        assert_eq!(writer.lines()[0], "Usage: demo [SUB_SECTION, ..] COMMAND");
        assert!(writer.contains("Available Commands:"));
        assert!(writer.contains("  create - creates a user"));
    }

    #[test]
    fn test_run_without_args_prints_root() {
        let (mut cli, _) = users_cli();
        assert_eq!(cli.run(&[]).unwrap(), EX_USAGE);
        assert!(cli.writer().contains("  users - manage users"));
    }

    #[test]
    fn test_run_unexpected_option_prints_usage() {
        let (mut cli, _) = users_cli();
        let code = cli
            .run(&to_args(&["users", "create", "--username", "a", "--colour", "red"]))
            .unwrap();
        assert_eq!(code, EX_USAGE);
        assert!(cli
            .writer()
            .contains("The following options were specified but do not exist on the command:"));
        assert!(cli.writer().contains("  --colour"));
    }

    #[test]
    fn test_run_passes_through_action_exit_code() {
        let (mut cli, _) = users_cli();
        assert_eq!(cli.run(&to_args(&["users", "list", "--limit", "7"])).unwrap(), 7);
    }

    #[test]
    fn test_run_transform_failure_returns_dataerr() {
        let (mut cli, _) = users_cli();
        assert_eq!(cli.run(&to_args(&["users", "list", "--limit", "0"])).unwrap(), EX_DATAERR);
        assert_eq!(
            cli.writer().lines(),
            &[
                "Validation failed for argument [--limit]:",
                "  value must be a positive integer",
            ]
        );
    }

    #[test]
    fn test_run_action_error_propagates() {
        let mut cli = Cli::new(RecordingWriter::new());
        cli.create_command("explode", "", |_, _| anyhow::bail!("no fuel"))
            .unwrap();
        let err = cli.run(&to_args(&["explode"])).unwrap_err();
        assert!(matches!(err, CommandError::Action { ref command, .. } if command == "explode"));
    }

    #[test]
    fn test_tree_management_on_root() {
        let (mut cli, _) = users_cli();
        assert!(cli.create_command("users", "", |_, _| Ok(None)).is_err());
        assert!(cli.find_section("users").is_some());
        assert!(cli.remove_section("users").is_some());
        assert!(cli.remove_section("users").is_none());
        assert_eq!(cli.run(&to_args(&["users", "create"])).unwrap(), EX_USAGE);
        assert!(!cli.writer().contains("Command: create"));
    }

    #[test]
    fn test_commands_found_mut_can_gain_options() {
        let (mut cli, calls) = users_cli();
        cli.find_section_mut("users")
            .and_then(|s| s.find_command_mut("create"))
            .unwrap()
            .create_flag("--admin", "grant admin rights")
            .unwrap();
        cli.run(&to_args(&["users", "create", "--username", "root", "--admin"]))
            .unwrap();
        assert_eq!(calls.borrow()[0].get("admin"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_debug_lists_tree_and_settings() {
        let (cli, _) = users_cli();
        let debug = format!("{:?}", cli);
        assert!(debug.starts_with("Cli {"));
        assert!(debug.contains("program_name: Some(\"demo\")"));
        assert!(debug.contains("indent_step: 2"));
    }

    #[test]
    fn test_print_cli_map_uses_indent_step() {
        let (cli, _) = users_cli();
        let mut cli = cli.with_indent_step(4);
        cli.print_cli_map(false, None, None);
        assert!(cli.writer().contains("    create: creates a user"));
    }
}
