// src/constants.rs

/// Exit code for a command that ran and did not report its own code (sysexits `EX_OK`).
pub const EX_OK: i32 = 0;

/// Exit code for an invocation that could not be matched to a command, or whose
/// options were missing or unrecognised (sysexits `EX_USAGE`).
pub const EX_USAGE: i32 = 64;

/// Exit code for an option value rejected by a validate or transform hook
/// (sysexits `EX_DATAERR`).
pub const EX_DATAERR: i32 = 65;

/// The character that marks a token as an option trigger.
pub const OPTION_PREFIX: char = '-';

/// Prepended to the description of required options in command usage.
pub const REQUIRED_OPTION_PREFIX: &str = "(required) ";

/// Prepended to the description of optional options in command usage.
pub const OPTIONAL_OPTION_PREFIX: &str = "";

/// Default number of spaces each nesting level is indented by in usage output.
pub const DEFAULT_INDENT_STEP: usize = 2;

/// The name of the directory (inside the system config dir) holding cmdtree settings.
pub const SETTINGS_DIR: &str = "cmdtree";

/// The name of the settings file (inside `SETTINGS_DIR`).
pub const SETTINGS_FILENAME: &str = "settings.toml";

/// Environment variable that points at an explicit settings file.
pub const SETTINGS_ENV_VAR: &str = "CMDTREE_CONFIG";
