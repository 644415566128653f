// src/core/option.rs

use std::fmt;
use thiserror::Error;

use crate::models::{Value, keyword_of};

/// What a validate or transform hook reports when it cannot accept a value.
#[derive(Error, Debug)]
pub enum HookError {
    /// The user supplied a value the hook rejects. This is an expected outcome:
    /// the command prints the message and exits with the data-format code.
    #[error("{0}")]
    Invalid(String),
    /// The hook itself is broken. This is not a user error and is propagated
    /// out of the dispatcher untouched.
    #[error(transparent)]
    Fault(#[from] anyhow::Error),
}

impl HookError {
    /// Shorthand for a rejection with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Checks a supplied value; `Ok(())` accepts it.
pub type ValidateFn = Box<dyn Fn(&Value) -> Result<(), HookError>>;

/// Replaces a supplied value with a converted one, or with null.
pub type TransformFn = Box<dyn Fn(Value) -> Result<Option<Value>, HookError>>;

/// Whether an option carries a value or is a bare on/off switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Consumes the following token as its value.
    Value,
    /// Takes no value; presence means `true`, absence `false`.
    Flag,
}

/// A named input to a command, either a value-bearing option or a flag.
///
/// Built with the constructor plus the chained setters below, then handed to
/// [`Command::add_option`](crate::core::command::Command::add_option), after which
/// it is owned by the command and never changes.
pub struct CommandOption {
    name: String,
    description: String,
    kind: OptionKind,
    required: bool,
    allow_multiple: bool,
    aliases: Vec<String>,
    default: Option<Value>,
    validate: Option<ValidateFn>,
    transform: Option<TransformFn>,
}

impl CommandOption {
    /// Creates a value-bearing option. Options are required unless
    /// [`optional`](Self::optional) is called.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind: OptionKind::Value,
            required: true,
            allow_multiple: false,
            aliases: Vec::new(),
            default: None,
            validate: None,
            transform: None,
        }
    }

    /// Creates a flag. Flags are always optional and single-valued.
    pub fn flag(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: OptionKind::Flag,
            required: false,
            ..Self::new(name, description)
        }
    }

    /// Sets whether the option must be supplied. Ignored for flags.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required && self.kind == OptionKind::Value;
        self
    }

    /// Marks the option as not required.
    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Collects every occurrence into a list instead of keeping the last one.
    /// Ignored for flags.
    pub fn allow_multiple(mut self) -> Self {
        self.allow_multiple = self.kind == OptionKind::Value;
        self
    }

    /// Adds another trigger that sets this option.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Adds several triggers that set this option.
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Value the action receives when the user does not supply the option.
    /// Ignored for flags, which always default to `false`.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        if self.kind == OptionKind::Value {
            self.default = Some(value.into());
        }
        self
    }

    /// Runs `validate` against the value whenever the user supplies one.
    pub fn validate_with<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Value) -> Result<(), HookError> + 'static,
    {
        self.validate = Some(Box::new(validate));
        self
    }

    /// Replaces a supplied value with what `transform` returns. Runs after validation.
    /// The hook may return a `Value` or an `Option<Value>`; `None` stores null.
    pub fn transform_with<F, V>(mut self, transform: F) -> Self
    where
        F: Fn(Value) -> Result<V, HookError> + 'static,
        V: Into<Option<Value>>,
    {
        self.transform = Some(Box::new(move |value| transform(value).map(Into::into)));
        self
    }

    /// The primary trigger, e.g. `--username`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text shown next to the option in usage.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether this is a value option or a flag.
    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Whether the option takes no value.
    pub fn is_flag(&self) -> bool {
        self.kind == OptionKind::Flag
    }

    /// Whether the command refuses to run without it.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether repeated occurrences collect into a list.
    pub fn allows_multiple(&self) -> bool {
        self.allow_multiple
    }

    /// Alternative triggers, in the order added.
    pub fn alias_list(&self) -> &[String] {
        &self.aliases
    }

    /// Value used when the option is not given.
    pub fn declared_default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The name with its leading dashes stripped; the key the action reads the value under.
    pub fn keyword(&self) -> &str {
        keyword_of(&self.name)
    }

    /// The name followed by every alias.
    pub fn triggers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub(crate) fn validator(&self) -> Option<&ValidateFn> {
        self.validate.as_ref()
    }

    pub(crate) fn transformer(&self) -> Option<&TransformFn> {
        self.transform.as_ref()
    }
}

impl fmt::Debug for CommandOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandOption")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("allow_multiple", &self.allow_multiple)
            .field("aliases", &self.aliases)
            .field("default", &self.default)
            .field("validate", &self.validate.is_some())
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

impl fmt::Display for CommandOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Option [{}]", self.name)
    }
}

/// A titled bag of options, used only to group them in usage output.
/// Parsing treats grouped options exactly like the command's own.
#[derive(Debug)]
pub struct OptionGroup {
    name: String,
    description: Option<String>,
    options: Vec<CommandOption>,
}

impl OptionGroup {
    /// Creates an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            options: Vec::new(),
        }
    }

    /// Sets the text shown under the group's name.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an option (or flag) to the group. Uniqueness is checked when the
    /// group is added to a command.
    pub fn with_option(mut self, option: CommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Heading the group is listed under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text listed under the group's name.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The group's options, in the order added.
    pub fn options(&self) -> &[CommandOption] {
        &self.options
    }
}

// MARK: --- UNIT TESTS ---
