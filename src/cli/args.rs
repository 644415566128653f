// src/cli/args.rs

use clap::Parser;
use std::path::PathBuf;

/// cmdtree: a demo of a hierarchical command dispatcher.
///
/// The flags below configure the launcher itself. Everything after them is
/// the path through the command tree plus the command's own arguments, e.g.
/// `cmdtree --no-color users create --username alice`.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct LauncherArgs {
    /// Read settings from this file instead of the default location.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Wrap usage text at this many columns.
    #[arg(long, value_name = "COLUMNS")]
    pub wrap_width: Option<usize>,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,

    /// Section path, command and command arguments.
    #[arg(allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

// MARK: --- UNIT TESTS ---
