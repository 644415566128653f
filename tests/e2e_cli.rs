//! End-to-end tests for the `cmdtree` demo binary.
//!
//! Each test runs the real binary against the demo tree and checks the exit
//! code plus what was printed.

use assert_cmd::Command;
use assert_cmd::assert::Assert;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;

/// A command for the demo binary that ignores any settings file on the machine.
fn cmdtree() -> Command {
    let mut cmd = cargo_bin_cmd!("cmdtree");
    cmd.env("CMDTREE_CONFIG", "/nonexistent/cmdtree/settings.toml")
        .env_remove("RUST_LOG");
    cmd
}

/// Runs the demo with colours off and the given dispatched arguments.
fn run(args: &[&str]) -> Assert {
    cmdtree().arg("--no-color").args(args).assert()
}

// ============================================
// Resolution
// ============================================

mod resolution {
    use super::*;

    #[test]
    fn no_args_prints_root_listing() {
        run(&[])
            .code(EX_USAGE)
            .stdout(predicate::str::contains("[SUB_SECTION, ..] COMMAND"))
            .stdout(predicate::str::contains("Available Sections:"))
            .stdout(predicate::str::contains("plugins"))
            .stdout(predicate::str::contains("Available Commands:"))
            .stdout(predicate::str::contains("login"));
    }

    #[test]
    fn unknown_command_prints_section_listing() {
        run(&["users", "bogus"])
            .code(EX_USAGE)
            .stdout(predicate::str::contains("Description: manages users in the system"))
            .stdout(predicate::str::contains("Available Commands:"))
            .stdout(predicate::str::contains("create - creates a new user in the system"));
    }

    #[test]
    fn section_followed_by_option_stops_at_section() {
        run(&["users", "--help"])
            .code(EX_USAGE)
            .stdout(predicate::str::contains("Available Commands:"))
            .stdout(predicate::str::contains("Command:").not());
    }
}

// ============================================
// Declarative parsing
// ============================================

mod declarative {
    use super::*;

    #[test]
    fn create_user_succeeds() {
        run(&["users", "create", "--username", "alice", "--password", "secret"])
            .success()
            .stdout(predicate::str::contains("Creating User"))
            .stdout(predicate::str::contains("Username: alice"))
            .stdout(predicate::str::contains("Group:    (none)"));
    }

    #[test]
    fn missing_required_option_prints_command_usage() {
        run(&["users", "create", "--username", "alice"])
            .code(EX_USAGE)
            .stdout(predicate::str::contains("Command: create"))
            .stdout(predicate::str::contains("(required) password for the new user"))
            .stdout(predicate::str::contains(
                "The following options are required but were not specified:",
            ))
            .stdout(predicate::str::contains("  --password"))
            .stdout(predicate::str::contains("Creating User").not());
    }

    #[test]
    fn unexpected_option_is_reported() {
        run(&["users", "create", "--username", "a", "--password", "b", "--shell", "zsh"])
            .code(EX_USAGE)
            .stdout(predicate::str::contains(
                "The following options were specified but do not exist on the command:",
            ))
            .stdout(predicate::str::contains("  --shell"));
    }

    #[test]
    fn help_prints_usage_without_problems() {
        run(&["users", "create", "-h"])
            .code(EX_USAGE)
            .stdout(predicate::str::contains("Command: create"))
            .stdout(predicate::str::contains("Available Arguments:"))
            .stdout(predicate::str::contains("The following options").not());
    }

    #[test]
    fn alias_sets_option() {
        run(&["login", "-u", "bob"])
            .success()
            .stdout(predicate::str::contains("Welcome bob"));
    }

    #[test]
    fn validation_failure_exits_with_dataerr() {
        run(&["users", "create", "--username", "Alice", "--password", "x"])
            .code(EX_DATAERR)
            .stdout(predicate::str::contains(
                "Validation failed for argument [--username]:",
            ))
            .stdout(predicate::str::contains("Creating User").not());
    }

    #[test]
    fn transform_failure_exits_with_dataerr() {
        run(&["users", "list", "--limit", "0"])
            .code(EX_DATAERR)
            .stdout(predicate::str::contains("value must be a positive integer"));
    }

    #[test]
    fn repeated_option_and_flag_reach_action() {
        run(&["users", "list", "--tag", "ops", "--verbose"])
            .success()
            .stdout(predicate::str::contains("carol [ops]"))
            .stdout(predicate::str::contains("dave [ops, dev]"))
            .stdout(predicate::str::contains("alice").not());
    }

    #[test]
    fn converted_values_reach_action() {
        run(&[
            "demo",
            "opt-args",
            "--required-1",
            "x",
            "--enabled",
            "TRUE",
            "--items",
            "a,b",
            "-q",
        ])
        .success()
        .stdout(predicate::str::contains("Value: [a, b]"))
        .stdout(predicate::str::is_match(r"Key: enabled\s+Value: true").unwrap())
        .stdout(predicate::str::is_match(r"Key: quiet\s+Value: true").unwrap())
        .stdout(predicate::str::is_match(r"Key: optional-1\s+Value: \(none\)").unwrap());
    }
}

// ============================================
// Alternate parser strategies
// ============================================

mod alternate_parsers {
    use super::*;

    #[test]
    fn unknown_args_collects_arbitrary_keys() {
        run(&["plugins", "configure", "--id", "web", "--mode", "fast", "--debug"])
            .success()
            .stdout(predicate::str::contains("Configuring plugin web"))
            .stdout(predicate::str::contains("mode = fast"))
            .stdout(predicate::str::contains("debug = true"));
    }

    #[test]
    fn unknown_args_missing_required_exits_with_usage() {
        run(&["plugins", "configure", "--mode", "fast"])
            .code(EX_USAGE)
            .stdout(predicate::str::contains("The following options are required:"))
            .stdout(predicate::str::contains("--id"))
            .stdout(predicate::str::contains("Configuring").not());
    }

    #[test]
    fn pass_through_forwards_everything() {
        run(&["plugins", "exec", "--anything", "-x", "1"])
            .success()
            .stdout(predicate::str::contains("Forwarding 3 argument(s): --anything -x 1"));
    }
}

// ============================================
// Map, settings and errors
// ============================================

mod launcher {
    use super::*;

    #[test]
    fn map_prints_whole_tree() {
        run(&["map"])
            .success()
            .stdout(predicate::str::contains("users: manages users in the system"))
            .stdout(predicate::str::contains("  create:"))
            .stdout(predicate::str::contains("plugins: "))
            .stdout(predicate::str::contains("--username:").not());
    }

    #[test]
    fn map_with_options() {
        run(&["map", "--options"])
            .success()
            .stdout(predicate::str::contains("--username: username for the new user"));
    }

    #[test]
    fn program_name_comes_from_settings_file() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("settings.toml");
        fs::write(&config, "program_name = \"demo\"\ncolor = \"never\"\n").unwrap();

        cmdtree()
            .arg("--config")
            .arg(&config)
            .assert()
            .code(EX_USAGE)
            .stdout(predicate::str::starts_with(
                "Usage: demo [SUB_SECTION, ..] COMMAND",
            ));
    }

    #[test]
    fn malformed_settings_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("settings.toml");
        fs::write(&config, "wrap_width = \"wide\"\n").unwrap();

        cmdtree()
            .arg("--config")
            .arg(&config)
            .arg("logout")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error"))
            .stdout(predicate::str::contains("Successfully logged out").not());
    }

    #[test]
    fn shows_version() {
        cmdtree()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
