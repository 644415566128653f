// src/core/mod.rs

//! # Command Tree Dispatcher
//!
//! The tree model and the pipeline that turns an argument vector into a call.
//!
//! ## Modules
//!
//! - **`option`**: the inputs a command declares (`CommandOption`, flags,
//!   `OptionGroup`) and the validate/transform hooks attached to them.
//! - **`command`**: a leaf of the tree. Owns its options and action, and runs the
//!   parse, validate, transform, required-check and flag-defaulting steps in `execute`.
//! - **`section`**: a namespace node holding subsections and commands, with the
//!   structural uniqueness checks.
//! - **`resolver`**: the longest-prefix walk from the root to the deepest node the
//!   arguments name.
//! - **`parsers`**: the strategies a command can use to split its arguments.
//! - **`converters`** / **`validators`**: reusable transform and validate hooks.
//! - **`paths`**: the launch-script name and the settings file location.

/// Commands and their execution.
pub mod command;
pub mod converters;
/// Options, flags and option groups.
pub mod option;
pub mod parsers;
/// Launch-script name and settings location.
pub mod paths;
/// Finding the node an argument list names.
pub mod resolver;
/// Sections of the command tree.
pub mod section;
pub mod validators;
