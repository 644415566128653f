// src/core/command.rs

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

use crate::{
    cli::usage,
    constants::{EX_DATAERR, EX_OK},
    core::{
        option::{CommandOption, HookError, OptionGroup},
        parsers::{AbortReason, ArgumentParser, DeclarativeParser, ParseError},
        section::StructureError,
    },
    models::{NamedArgs, ParsedArgs, Value, keyword_of},
    system::writer::Writer,
};

lazy_static! {
    /// Shape of a trigger the declarative parser can match: `-x` or `--name`.
    static ref OPTION_TRIGGER_RE: Regex =
        Regex::new(r"^(-[A-Za-z0-9]|--[A-Za-z0-9][A-Za-z0-9_.-]*)$")
            .expect("option trigger pattern is valid");
}

/// The callable a command runs. It receives the positional arguments and the
/// named arguments keyed by keyword; returning `Ok(None)` means success.
pub type Action = Box<dyn Fn(&[String], &NamedArgs) -> anyhow::Result<Option<i32>>>;

/// The user invoked a command incorrectly. Always caught by the runner, which
/// prints the command's usage alongside these details.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq)]
#[error("Incorrect command usage (missing: {missing:?}, unexpected: {unexpected:?}, without value: {missing_values:?})")]
pub struct CommandUsage {
    /// Names of required options that were not supplied.
    pub missing: Vec<String>,
    /// Option tokens the command does not define.
    pub unexpected: Vec<String>,
    /// Triggers of value options given as the last token, with nothing to consume.
    pub missing_values: Vec<String>,
}

impl CommandUsage {
    /// Only required options that were not supplied.
    pub fn missing(missing: Vec<String>) -> Self {
        Self {
            missing,
            ..Self::default()
        }
    }

    /// Only option tokens the command does not define.
    pub fn unexpected(unexpected: Vec<String>) -> Self {
        Self {
            unexpected,
            ..Self::default()
        }
    }
}

/// Everything that can stop a command from producing an exit code.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command was invoked incorrectly.
    #[error(transparent)]
    Usage(#[from] CommandUsage),
    /// An alternate parser gave up after printing its usage.
    #[error("Parsing aborted: {0}")]
    Aborted(AbortReason),
    /// A hook failed with something other than a rejection.
    #[error("The hook for option '{option}' failed")]
    HookFault {
        /// Name of the option whose hook failed.
        option: String,
        /// The hook's error.
        #[source]
        source: anyhow::Error,
    },
    /// The action itself returned an error.
    #[error("Command '{command}' failed")]
    Action {
        /// Name of the command that failed.
        command: String,
        /// The action's error.
        #[source]
        source: anyhow::Error,
    },
}

impl From<ParseError> for CommandError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Usage(usage) => Self::Usage(usage),
            ParseError::Aborted(reason) => Self::Aborted(reason),
        }
    }
}

/// Outcome of running the validate and transform hooks.
enum HookOutcome {
    Accepted,
    Rejected { option: String, message: String },
}

/// A leaf of the command tree: an action plus the options it accepts.
pub struct Command {
    name: String,
    description: String,
    usage_description: Option<String>,
    action: Action,
    options: Vec<CommandOption>,
    option_groups: Vec<OptionGroup>,
    parser: Option<Box<dyn ArgumentParser>>,
}

impl Command {
    /// Creates a command with no options that runs `action`.
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, action: F) -> Self
    where
        F: Fn(&[String], &NamedArgs) -> anyhow::Result<Option<i32>> + 'static,
    {
        Self::from_action(name, description, Box::new(action))
    }

    /// Creates a command from an already boxed action.
    pub fn from_action(
        name: impl Into<String>,
        description: impl Into<String>,
        action: Action,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            usage_description: None,
            action,
            options: Vec::new(),
            option_groups: Vec::new(),
            parser: None,
        }
    }

    /// Extra text shown only in this command's full usage.
    pub fn with_usage_description(mut self, usage_description: impl Into<String>) -> Self {
        self.usage_description = Some(usage_description.into());
        self
    }

    /// Replaces the declarative parser with another strategy.
    pub fn with_parser(mut self, parser: impl ArgumentParser + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Same as [`with_parser`](Self::with_parser), for a command already in the tree.
    pub fn set_parser(&mut self, parser: impl ArgumentParser + 'static) -> &mut Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// The name the command is invoked by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description shown in listings.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Longer text shown in the command's own usage.
    pub fn usage_description(&self) -> Option<&str> {
        self.usage_description.as_deref()
    }

    /// Options added directly to the command, in the order they were added.
    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }

    /// Option groups, in the order added.
    pub fn option_groups(&self) -> &[OptionGroup] {
        &self.option_groups
    }

    /// Whether a non-declarative parser strategy is set.
    pub fn has_custom_parser(&self) -> bool {
        self.parser.is_some()
    }

    /// Every option of the command: its own first, then each group's in order.
    pub fn all_options(&self) -> impl Iterator<Item = &CommandOption> {
        self.options
            .iter()
            .chain(self.option_groups.iter().flat_map(|g| g.options().iter()))
    }

    /// Adds an option or flag. Its name and aliases must be well-formed and
    /// not already used by any option of this command.
    pub fn add_option(&mut self, option: CommandOption) -> Result<&mut Self, StructureError> {
        self.verify_triggers(std::iter::once(&option))?;
        self.options.push(option);
        Ok(self)
    }

    /// Adds a flag; identical to [`add_option`](Self::add_option).
    pub fn add_flag(&mut self, flag: CommandOption) -> Result<&mut Self, StructureError> {
        self.add_option(flag)
    }

    /// Adds an option group. Its options share the command's trigger namespace.
    pub fn add_option_group(&mut self, group: OptionGroup) -> Result<&mut Self, StructureError> {
        self.verify_triggers(group.options().iter())?;
        self.option_groups.push(group);
        Ok(self)
    }

    /// Creates and adds a value option.
    pub fn create_option(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Result<&mut Self, StructureError> {
        self.add_option(CommandOption::new(name, description).required(required))
    }

    /// Creates and adds a flag.
    pub fn create_flag(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Self, StructureError> {
        self.add_option(CommandOption::flag(name, description))
    }

    fn verify_triggers<'a>(
        &self,
        new_options: impl Iterator<Item = &'a CommandOption>,
    ) -> Result<(), StructureError> {
        let mut taken: HashSet<&str> = self.all_options().flat_map(|o| o.triggers()).collect();
        // `-v` and `--v` are distinct triggers but share the keyword `v`.
        let mut taken_keywords: HashSet<&str> = taken.iter().copied().map(keyword_of).collect();
        for option in new_options {
            let mut own_keywords = HashSet::new();
            for trigger in option.triggers() {
                if !OPTION_TRIGGER_RE.is_match(trigger) {
                    return Err(StructureError::MalformedTrigger {
                        trigger: trigger.to_string(),
                    });
                }
                if !taken.insert(trigger) || taken_keywords.contains(keyword_of(trigger)) {
                    return Err(StructureError::DuplicateTrigger {
                        command: self.name.clone(),
                        trigger: trigger.to_string(),
                    });
                }
                own_keywords.insert(keyword_of(trigger));
            }
            taken_keywords.extend(own_keywords);
        }
        Ok(())
    }

    /// Runs the command against the arguments left after tree resolution.
    ///
    /// # Logic:
    /// 1. The parser strategy splits `args` into positional and named values,
    ///    then validate and transform hooks run on every supplied value.
    ///    A rejected value prints a message and yields `EX_DATAERR`.
    /// 2. Required options that are absent or null raise [`CommandUsage`].
    /// 3. Flags the user did not give are set to `false`.
    /// 4. The action runs with keyword-keyed named values; `None` becomes `EX_OK`.
    pub fn execute(&self, writer: &mut dyn Writer, args: &[String]) -> Result<i32, CommandError> {
        log::debug!("Executing command '{}' with args: {:?}", self.name, args);

        let ParsedArgs {
            positional,
            mut named,
        } = self.parse_arguments(writer, args)?;

        if let HookOutcome::Rejected { option, message } = self.apply_hooks(&mut named)? {
            usage::print_validation_error(writer, &option, &message);
            return Ok(EX_DATAERR);
        }

        let missing: Vec<String> = self
            .all_options()
            .filter(|o| o.is_required() && !named.is_present(o.keyword()))
            .map(|o| o.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CommandUsage::missing(missing).into());
        }

        for flag in self.all_options().filter(|o| o.is_flag()) {
            if !named.is_present(flag.keyword()) {
                named.insert(flag.keyword(), Some(Value::Bool(false)));
            }
        }

        let exit_code = (self.action)(positional.as_slice(), &named).map_err(|source| CommandError::Action {
            command: self.name.clone(),
            source,
        })?;
        Ok(exit_code.unwrap_or(EX_OK))
    }

    /// Runs the parser strategy and normalises named keys to keywords.
    pub fn parse_arguments(
        &self,
        writer: &mut dyn Writer,
        args: &[String],
    ) -> Result<ParsedArgs, ParseError> {
        let parsed = match &self.parser {
            Some(parser) => {
                log::debug!("Command '{}' uses a custom parser", self.name);
                parser.parse(args, writer)?
            }
            None => DeclarativeParser::new(self.all_options()).parse(args, writer)?,
        };

        Ok(ParsedArgs {
            positional: parsed.positional,
            named: parsed.named.into_keywords(),
        })
    }

    /// Validates, then transforms, every option value the user actually supplied.
    fn apply_hooks(&self, named: &mut NamedArgs) -> Result<HookOutcome, CommandError> {
        for option in self.all_options() {
            let (Some(validate), Some(value)) = (option.validator(), named.get(option.keyword()))
            else {
                continue;
            };
            match validate(value) {
                Ok(()) => {}
                Err(HookError::Invalid(message)) => {
                    return Ok(HookOutcome::Rejected {
                        option: option.name().to_string(),
                        message,
                    });
                }
                Err(HookError::Fault(source)) => return Err(hook_fault(option, source)),
            }
        }

        for option in self.all_options() {
            let Some(transform) = option.transformer() else {
                continue;
            };
            let Some(value) = named.get(option.keyword()).cloned() else {
                continue;
            };
            match transform(value) {
                Ok(converted) => named.insert(option.keyword(), converted),
                Err(HookError::Invalid(message)) => {
                    return Ok(HookOutcome::Rejected {
                        option: option.name().to_string(),
                        message,
                    });
                }
                Err(HookError::Fault(source)) => return Err(hook_fault(option, source)),
            }
        }

        Ok(HookOutcome::Accepted)
    }
}

fn hook_fault(option: &CommandOption, source: anyhow::Error) -> CommandError {
    log::warn!("Hook for option '{}' failed unexpectedly: {}", option.name(), source);
    CommandError::HookFault {
        option: option.name().to_string(),
        source,
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("usage_description", &self.usage_description)
            .field("options", &self.options)
            .field("option_groups", &self.option_groups)
            .field("custom_parser", &self.parser.is_some())
            .finish()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command [{}]", self.name)
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parsers::{AbortMode, PassThroughParser, UnknownArgsParser};
    use crate::system::writer::RecordingWriter;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Captured = Rc<RefCell<Option<(Vec<String>, NamedArgs)>>>;

    fn to_args(params: &[&str]) -> Vec<String> {
        params.iter().map(|s| s.to_string()).collect()
    }

    /// A command whose action records what it was called with.
    fn capturing_command(name: &str) -> (Command, Captured) {
        let captured: Captured = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&captured);
        let command = Command::new(name, "test command", move |args, named| {
            *sink.borrow_mut() = Some((args.to_vec(), named.clone()));
            Ok(None)
        });
        (command, captured)
    }

    fn run(command: &Command, params: &[&str]) -> (Result<i32, CommandError>, RecordingWriter) {
        let mut writer = RecordingWriter::new();
        let result = command.execute(&mut writer, &to_args(params));
        (result, writer)
    }

    #[test]
    fn test_optional_only_command_with_no_args() {
        let (mut command, captured) = capturing_command("list");
        command
            .add_option(CommandOption::new("--limit", "").optional().default_value("10"))
            .unwrap()
            .add_option(CommandOption::new("--group", "").optional())
            .unwrap()
            .add_flag(CommandOption::flag("--all", ""))
            .unwrap();

        let (result, _) = run(&command, &[]);
        assert_eq!(result.unwrap(), EX_OK);

        let (args, named) = captured.borrow_mut().take().unwrap();
        assert!(args.is_empty());
        assert_eq!(named.get("all"), Some(&Value::Bool(false)));
        assert_eq!(named.get_str("limit"), Some("10"));
        assert!(named.contains_key("group"));
        assert!(!named.is_present("group"));
    }

    #[test]
    fn test_missing_required_lists_exactly_the_absent_options() {
        let (mut command, captured) = capturing_command("create");
        command
            .create_option("--username", "", true)
            .unwrap()
            .create_option("--password", "", true)
            .unwrap()
            .create_option("--group", "", false)
            .unwrap();

        let (result, _) = run(&command, &["--password", "secret"]);
        match result {
            Err(CommandError::Usage(usage)) => {
                assert_eq!(usage.missing, vec!["--username".to_string()]);
                assert!(usage.unexpected.is_empty());
            }
            other => panic!("expected usage error, got {:?}", other),
        }
        assert!(captured.borrow().is_none());
    }

    #[test]
    fn test_required_options_in_groups_are_checked() {
        let (mut command, _) = capturing_command("deploy");
        command
            .add_option_group(
                OptionGroup::new("Target").with_option(CommandOption::new("--env", "environment")),
            )
            .unwrap();
        let (result, _) = run(&command, &[]);
        assert!(matches!(result, Err(CommandError::Usage(u)) if u.missing == vec!["--env".to_string()]));
    }

    #[test]
    fn test_flags_in_groups_default_to_false() {
        let (mut command, captured) = capturing_command("deploy");
        command
            .add_option_group(
                OptionGroup::new("Behaviour").with_option(CommandOption::flag("--dry-run", "")),
            )
            .unwrap();
        run(&command, &[]).0.unwrap();
        let (_, named) = captured.borrow_mut().take().unwrap();
        assert_eq!(named.get("dry-run"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_positional_args_pass_through() {
        let (mut command, captured) = capturing_command("copy");
        command.create_flag("-r", "recursive").unwrap();
        run(&command, &["src", "-r", "dst"]).0.unwrap();
        let (args, named) = captured.borrow_mut().take().unwrap();
        assert_eq!(args, to_args(&["src", "dst"]));
        assert!(named.get_flag("r"));
    }

    #[test]
    fn test_action_exit_code_is_passed_through() {
        let command = Command::new("fail", "", |_, _| Ok(Some(3)));
        assert_eq!(run(&command, &[]).0.unwrap(), 3);
    }

    #[test]
    fn test_action_error_propagates() {
        let command = Command::new("boom", "", |_, _| Err(anyhow::anyhow!("kaboom")));
        let (result, _) = run(&command, &[]);
        match result {
            Err(CommandError::Action { command, source }) => {
                assert_eq!(command, "boom");
                assert_eq!(source.to_string(), "kaboom");
            }
            other => panic!("expected action error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_failure_prints_message_and_returns_dataerr() {
        let (mut command, captured) = capturing_command("resize");
        command
            .add_option(CommandOption::new("--size", "").validate_with(|v| match v.as_str() {
                Some(s) if s.parse::<u32>().is_ok() => Ok(()),
                _ => Err(HookError::invalid("size must be a number")),
            }))
            .unwrap();

        let (result, writer) = run(&command, &["--size", "big"]);
        assert_eq!(result.unwrap(), EX_DATAERR);
        assert_eq!(
            writer.lines(),
            &["Validation failed for argument [--size]:", "  size must be a number"]
        );
        assert!(captured.borrow().is_none());
    }

    #[test]
    fn test_validate_runs_on_raw_value_before_transform() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_by_validate = Rc::clone(&seen);
        let (mut command, captured) = capturing_command("scale");
        command
            .add_option(
                CommandOption::new("--count", "")
                    .validate_with(move |v| {
                        seen_by_validate.borrow_mut().push(v.clone());
                        Ok(())
                    })
                    .transform_with(|v| {
                        let text = v.as_str().unwrap_or_default();
                        text.parse::<i64>()
                            .map(Value::Int)
                            .map_err(|e| HookError::invalid(e.to_string()))
                    }),
            )
            .unwrap();

        run(&command, &["--count", "7"]).0.unwrap();
        assert_eq!(*seen.borrow(), vec![Value::from("7")]);
        let (_, named) = captured.borrow_mut().take().unwrap();
        assert_eq!(named.get_int("count"), Some(7));
    }

    #[test]
    fn test_transform_rejection_returns_dataerr() {
        let (mut command, _) = capturing_command("scale");
        command
            .add_option(CommandOption::new("--count", "").transform_with(|v| {
                v.as_str()
                    .and_then(|s| s.parse::<i64>().ok())
                    .map(Value::Int)
                    .ok_or_else(|| HookError::invalid("not an integer"))
            }))
            .unwrap();
        let (result, writer) = run(&command, &["--count", "many"]);
        assert_eq!(result.unwrap(), EX_DATAERR);
        assert!(writer.contains("Validation failed for argument [--count]:"));
        assert!(writer.contains("not an integer"));
    }

    #[test]
    fn test_hooks_skip_values_that_were_not_supplied() {
        let (mut command, captured) = capturing_command("list");
        command
            .add_option(
                CommandOption::new("--limit", "")
                    .optional()
                    .validate_with(|_| Err(HookError::invalid("never called")))
                    .transform_with(|_| Err::<Value, _>(HookError::invalid("never called"))),
            )
            .unwrap();
        assert_eq!(run(&command, &[]).0.unwrap(), EX_OK);
        let (_, named) = captured.borrow_mut().take().unwrap();
        assert!(named.contains_key("limit"));
        assert!(!named.is_present("limit"));
    }

    #[test]
    fn test_hook_fault_is_not_a_validation_failure() {
        let (mut command, _) = capturing_command("sync");
        command
            .add_option(
                CommandOption::new("--source", "")
                    .validate_with(|_| Err(HookError::Fault(anyhow::anyhow!("hook bug")))),
            )
            .unwrap();
        let (result, writer) = run(&command, &["--source", "x"]);
        assert!(matches!(result, Err(CommandError::HookFault { option, .. }) if option == "--source"));
        assert!(writer.lines().is_empty());
    }

    #[test]
    fn test_unexpected_option_raises_usage() {
        let (command, _) = capturing_command("plain");
        let (result, _) = run(&command, &["--nope"]);
        assert!(matches!(result, Err(CommandError::Usage(u)) if u.unexpected == to_args(&["--nope"])));
    }

    #[test]
    fn test_duplicate_triggers_are_rejected_across_groups_and_aliases() {
        let (mut command, _) = capturing_command("create");
        command
            .add_option(CommandOption::new("--username", "").alias("-u"))
            .unwrap();

        let err = command.add_option(CommandOption::new("--user", "").alias("-u")).unwrap_err();
        assert!(matches!(err, StructureError::DuplicateTrigger { trigger, .. } if trigger == "-u"));

        let group = OptionGroup::new("Extra").with_option(CommandOption::flag("--username", ""));
        assert!(command.add_option_group(group).is_err());
        assert_eq!(command.all_options().count(), 1);

        // Same keyword under a different prefix.
        command.add_option(CommandOption::flag("--v", "")).unwrap();
        let err = command.add_option(CommandOption::new("-v", "").optional()).unwrap_err();
        assert!(matches!(err, StructureError::DuplicateTrigger { trigger, .. } if trigger == "-v"));
        let err = command.add_option(CommandOption::new("--name", "").alias("--u")).unwrap_err();
        assert!(matches!(err, StructureError::DuplicateTrigger { trigger, .. } if trigger == "--u"));
        assert_eq!(command.all_options().count(), 2);

        // An option may repeat its own keyword across its triggers.
        assert!(command.add_option(CommandOption::new("--q", "").alias("-q")).is_ok());
    }

    #[test]
    fn test_malformed_triggers_are_rejected() {
        let (mut command, _) = capturing_command("create");
        for bad in ["username", "-", "---x", "-ab", "--"] {
            assert!(
                matches!(
                    command.add_option(CommandOption::new(bad, "")),
                    Err(StructureError::MalformedTrigger { .. })
                ),
                "trigger {:?} should be rejected",
                bad
            );
        }
        assert!(command.add_option(CommandOption::new("--dry-run", "")).is_ok());
        assert!(command.add_option(CommandOption::new("-n", "")).is_ok());
    }

    #[test]
    fn test_unknown_args_parser_keys_reach_action_as_keywords() {
        let (command, captured) = capturing_command("configure");
        let command = command.with_parser(
            UnknownArgsParser::new("plugins configure").abort_mode(AbortMode::Error),
        );
        run(&command, &["--name", "web", "--verbose"]).0.unwrap();
        let (args, named) = captured.borrow_mut().take().unwrap();
        assert!(args.is_empty());
        assert_eq!(named.get_str("name"), Some("web"));
        assert!(named.get_flag("verbose"));
    }

    #[test]
    fn test_unknown_args_abort_surfaces_as_error() {
        let (command, _) = capturing_command("configure");
        let command = command.with_parser(
            UnknownArgsParser::new("plugins configure")
                .require("--id", "identifier")
                .abort_mode(AbortMode::Error),
        );
        let (result, writer) = run(&command, &[]);
        assert!(matches!(result, Err(CommandError::Aborted(AbortReason::MissingRequired))));
        assert!(writer.contains("--id"));
    }

    #[test]
    fn test_pass_through_parser_forwards_raw_args() {
        let (command, captured) = capturing_command("exec");
        let command = command.with_parser(PassThroughParser::new("exec"));
        run(&command, &["--anything", "goes", "-x"]).0.unwrap();
        let (args, named) = captured.borrow_mut().take().unwrap();
        assert_eq!(args, to_args(&["--anything", "goes", "-x"]));
        assert!(named.is_empty());
    }
}
