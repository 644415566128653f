// src/bin/cmdtree.rs

use anyhow::Result;
use clap::Parser;
use cmdtree::{
    AbortMode, Cli, Command, CommandOption, NamedArgs, OptionGroup, PassThroughParser,
    TerminalWriter, UnknownArgsParser,
    cli::args::LauncherArgs,
    core::{converters, validators},
    system::settings::{self, ColorMode, Settings},
};
use colored::*;

/// Users known to the demo `users list` command: (name, tags).
const DEMO_USERS: &[(&str, &[&str])] = &[
    ("alice", &["admin", "dev"]),
    ("bob", &["dev"]),
    ("carol", &["ops"]),
    ("dave", &["ops", "dev"]),
];

/// The main entry point of the `cmdtree` demo.
/// Sets up logging, loads settings, dispatches argv and owns the error policy.
fn main() {
    env_logger::init();

    match run_cli(LauncherArgs::parse()) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run_cli(args: LauncherArgs) -> Result<i32> {
    log::debug!("Launcher args parsed: {:?}", args);

    let mut settings = match &args.config {
        Some(path) => settings::load_settings_from(path)?,
        None => settings::load_settings()?,
    };
    if args.wrap_width.is_some() {
        settings.wrap_width = args.wrap_width;
    }
    if args.no_color {
        settings.color = ColorMode::Never;
    }
    settings.apply_color();
    log::debug!("Effective settings: {:?}", settings);

    let mut cli = build_cli(&settings)?;
    Ok(cli.run(&args.args)?)
}

/// Assembles the demo tree. Called again by the `map` command to render it.
fn build_cli(settings: &Settings) -> Result<Cli> {
    let mut cli = Cli::new(TerminalWriter::new(settings.wrap_width))
        .with_indent_step(settings.indent_step);
    if let Some(name) = &settings.program_name {
        cli = cli.with_program_name(name);
    }
    let program = cli.program_name();

    // --- Root commands ---
    cli.create_command("login", "persists user information across multiple calls", login)?
        .add_option(CommandOption::new("--username", "identifies the user").alias("-u"))?;
    cli.create_command("logout", "removes (fake) stored credentials", logout)?;

    let map_settings = settings.clone();
    cli.create_command(
        "map",
        "prints the map of all capabilities in the CLI",
        move |_, named| {
            let mut tree = build_cli(&map_settings)?;
            tree.print_cli_map(
                named.get_flag("options"),
                Some(Color::BrightBlue),
                Some(Color::BrightCyan),
            );
            Ok(None)
        },
    )?
    .create_flag("--options", "include each command's options")?;

    // --- users ---
    let users = cli.create_section("users", "manages users in the system")?;

    users
        .create_command("create", "creates a new user in the system", create_user)?
        .add_option(
            CommandOption::new("--username", "username for the new user")
                .validate_with(validators::validate_regex(r"^[a-z][a-z0-9_-]*$")?),
        )?
        .create_option("--password", "password for the new user", true)?
        .create_option("--group", "group in which to assign the new user", false)?;

    users
        .create_command("list", "lists the users in the system", list_users)?
        .add_option(
            CommandOption::new("--limit", "maximum number of users to show")
                .optional()
                .transform_with(converters::parse_positive_int),
        )?
        .add_option(
            CommandOption::new("--tag", "only users with this tag; may be repeated")
                .optional()
                .allow_multiple(),
        )?
        .create_flag("--verbose", "also show each user's tags")?;

    // --- demo ---
    let demo = cli.create_section("demo", "demonstrates option handling")?;
    let opt_args = Command::new(
        "opt-args",
        "configured with multiple arguments, many optional",
        show_arguments,
    )
    .with_usage_description(
        "Unspecified required arguments are listed at the bottom. The full \
         listing of specified arguments is displayed when successfully run.",
    );
    demo.add_command(opt_args)?
        .create_option(
            "--required-1",
            "required argument before this command will actually run",
            true,
        )?
        .create_option(
            "--optional-1",
            "optional argument, value will be displayed when specified",
            false,
        )?
        .create_option("--optional-2", "another optional argument", false)?
        .add_option_group(
            OptionGroup::new("Conversions")
                .with_description("values converted before the command runs")
                .with_option(
                    CommandOption::new("--enabled", "true or false")
                        .optional()
                        .validate_with(validators::validate_boolean)
                        .transform_with(converters::parse_boolean),
                )
                .with_option(
                    CommandOption::new("--items", "comma-separated list")
                        .optional()
                        .transform_with(converters::parse_optional_csv_string),
                )
                .with_option(CommandOption::flag("--quiet", "a flag; false unless given").alias("-q")),
        )?;

    // --- plugins ---
    let plugins = cli.create_section("plugins", "commands whose options are not known up front")?;

    let configure_parser = UnknownArgsParser::new("plugins configure")
        .program(program.clone())
        .require("--id", "identifier of the plugin to configure")
        .abort_mode(AbortMode::Exit);
    plugins.add_command(
        Command::new(
            "configure",
            "passes any --key value pairs to a plugin",
            configure_plugin,
        )
        .with_parser(configure_parser),
    )?;

    plugins.add_command(
        Command::new("exec", "forwards its arguments untouched", exec_plugin)
            .with_parser(PassThroughParser::new("plugins exec").program(program)),
    )?;

    Ok(cli)
}

// --- Actions ---

fn login(_: &[String], named: &NamedArgs) -> Result<Option<i32>> {
    let username = named.get_str("username").unwrap_or_default();
    println!("Welcome {}", username.bold());
    Ok(None)
}

fn logout(_: &[String], _: &NamedArgs) -> Result<Option<i32>> {
    println!("Successfully logged out");
    Ok(None)
}

fn create_user(_: &[String], named: &NamedArgs) -> Result<Option<i32>> {
    println!("{}", "Creating User".green().bold());
    println!("Username: {}", named.get_str("username").unwrap_or_default());
    println!("Password: {}", named.get_str("password").unwrap_or_default());
    println!("Group:    {}", named.get_str("group").unwrap_or("(none)"));
    Ok(None)
}

fn list_users(_: &[String], named: &NamedArgs) -> Result<Option<i32>> {
    let tags = named.get_list("tag");
    let limit = named
        .get_int("limit")
        .and_then(|limit| usize::try_from(limit).ok())
        .unwrap_or(usize::MAX);
    let verbose = named.get_flag("verbose");

    let matching = DEMO_USERS
        .iter()
        .filter(|(_, user_tags)| tags.is_empty() || tags.iter().any(|t| user_tags.contains(t)))
        .take(limit);

    for (name, user_tags) in matching {
        if verbose {
            println!("{} [{}]", name.cyan(), user_tags.join(", "));
        } else {
            println!("{}", name.cyan());
        }
    }
    Ok(None)
}

fn show_arguments(args: &[String], named: &NamedArgs) -> Result<Option<i32>> {
    println!("Supplied Arguments:");
    for (key, value) in named.iter() {
        let value = value.map_or_else(|| "(none)".to_string(), |v| v.to_string());
        println!("Key: {:<10}   Value: {}", key, value);
    }
    if !args.is_empty() {
        println!("Positional: {}", args.join(" "));
    }
    Ok(None)
}

fn configure_plugin(_: &[String], named: &NamedArgs) -> Result<Option<i32>> {
    let id = named.get_str("id").unwrap_or_default();
    println!("Configuring plugin {}", id.bold());
    for (key, value) in named.iter().filter(|(key, _)| *key != "id") {
        let value = value.map_or_else(String::new, |v| v.to_string());
        println!("  {} = {}", key, value);
    }
    Ok(None)
}

fn exec_plugin(args: &[String], _: &NamedArgs) -> Result<Option<i32>> {
    println!("Forwarding {} argument(s): {}", args.len(), args.join(" "));
    Ok(None)
}
