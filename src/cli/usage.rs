// src/cli/usage.rs

//! Text rendering for everything the dispatcher shows the user: section
//! listings, command usage, validation failures and the full tree map.
//! All output goes through a [`Writer`]; nothing here prints directly.

use colored::Color;

use crate::{
    constants::{OPTIONAL_OPTION_PREFIX, REQUIRED_OPTION_PREFIX},
    core::{command::Command, command::CommandUsage, option::CommandOption, section::Section},
    system::writer::Writer,
};

/// Length of the ` - ` separator between an aligned name and its description.
const SEPARATOR_WIDTH: usize = 3;

fn spaces(count: usize) -> String {
    " ".repeat(count)
}

/// Writes `name - description` lines with the names padded to a common width.
/// Descriptions that wrap continue under the description column.
fn write_aligned<'a>(
    writer: &mut dyn Writer,
    entries: impl IntoIterator<Item = (&'a str, String)>,
    indent: usize,
) {
    let entries: Vec<(&str, String)> = entries.into_iter().collect();
    let max_width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, description) in entries {
        let line = format!(
            "{}{:<width$} - {}",
            spaces(indent),
            name,
            description,
            width = max_width
        );
        let wrapped = writer.wrap(&line, None, indent + max_width + SEPARATOR_WIDTH);
        writer.write(&wrapped);
    }
}

/// Prints the direct children of `section`; does not recurse.
///
/// Shown when the arguments stop at a section rather than reaching a command.
pub fn print_section(
    writer: &mut dyn Writer,
    section: &Section,
    program: &str,
    indent: usize,
    step: usize,
) {
    writer.write(&format!("Usage: {} [SUB_SECTION, ..] COMMAND", program));
    if !section.description().is_empty() {
        writer.write(&format!("Description: {}", section.description()));
    }
    writer.write("");

    if section.has_subsections() {
        writer.write("Available Sections:");
        write_aligned(
            writer,
            section
                .subsections()
                .map(|s| (s.name(), s.description().to_string())),
            indent + step,
        );
    }

    if section.has_subsections() && section.has_commands() {
        writer.write("");
    }

    if section.has_commands() {
        writer.write("Available Commands:");
        write_aligned(
            writer,
            section
                .commands()
                .map(|c| (c.name(), c.description().to_string())),
            indent + step,
        );
    }
}

fn option_triggers(option: &CommandOption) -> String {
    option.triggers().collect::<Vec<_>>().join(", ")
}

fn write_option_list(writer: &mut dyn Writer, options: &[CommandOption], indent: usize) {
    let triggers: Vec<String> = options.iter().map(option_triggers).collect();
    let entries = options.iter().zip(&triggers).map(|(option, triggers)| {
        let prefix = if option.is_required() {
            REQUIRED_OPTION_PREFIX
        } else {
            OPTIONAL_OPTION_PREFIX
        };
        (triggers.as_str(), format!("{}{}", prefix, option.description()))
    });
    write_aligned(writer, entries, indent);
}

/// Prints a command's description and every option it accepts. When `problems`
/// is given, the missing, valueless and unexpected options are listed after.
pub fn print_command_usage(
    writer: &mut dyn Writer,
    command: &Command,
    problems: Option<&CommandUsage>,
    indent: usize,
    step: usize,
) {
    let pad = spaces(indent);
    writer.write(&format!("{}Command: {}", pad, command.name()));
    writer.write(&format!("{}Description: {}", pad, command.description()));
    if let Some(usage_description) = command.usage_description() {
        writer.write(&format!("{}Usage: {}", pad, usage_description));
    }

    let has_options = !command.options().is_empty();
    let has_groups = !command.option_groups().is_empty();

    if has_options || has_groups {
        writer.write("");
        writer.write("Available Arguments:");
        writer.write("");
    }

    if has_options {
        write_option_list(writer, command.options(), indent + step);
    }

    if has_options && has_groups {
        writer.write("");
    }

    for group in command.option_groups() {
        writer.write(group.name());
        if let Some(description) = group.description() {
            let text = format!("{}{}", spaces(indent + step), description);
            let wrapped = writer.wrap(&text, None, indent + step);
            writer.write(&wrapped);
            writer.write("");
        }
        write_option_list(writer, group.options(), indent + step);
        writer.write("");
    }

    let Some(problems) = problems else {
        return;
    };
    let item_pad = spaces(indent + step);

    if !problems.missing.is_empty() {
        writer.write("The following options are required but were not specified:");
        for name in &problems.missing {
            writer.write(&format!("{}{}", item_pad, name));
        }
    }

    if !problems.missing_values.is_empty() {
        writer.write("The following options require a value but none was given:");
        for trigger in &problems.missing_values {
            writer.write(&format!("{}{}", item_pad, trigger));
        }
    }

    if !problems.unexpected.is_empty() {
        writer.write("The following options were specified but do not exist on the command:");
        for token in &problems.unexpected {
            writer.write(&format!("{}{}", item_pad, token));
        }
    }
}

/// Reports a value rejected by an option's validate or transform hook.
pub fn print_validation_error(writer: &mut dyn Writer, option: &str, message: &str) {
    writer.write(&format!("Validation failed for argument [{}]:", option));
    writer.write(&format!("  {}", message));
}

/// Colours and options used while rendering the tree map.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapStyle {
    /// List each command's options under it.
    pub show_options: bool,
    /// Colour of section names.
    pub section_color: Option<Color>,
    /// Colour of command names.
    pub command_color: Option<Color>,
    /// Spaces per nesting level.
    pub step: usize,
}

/// Prints the whole tree below `root`, one level of indentation per section.
///
/// The root itself is not shown, so its commands and top-level sections start
/// at column zero. A blank line follows each top-level section.
pub fn print_cli_map(writer: &mut dyn Writer, root: &Section, style: MapStyle) {
    print_map_level(writer, root, 0, style);
}

fn print_map_level(writer: &mut dyn Writer, section: &Section, depth: usize, style: MapStyle) {
    let step = style.step;

    if depth > 0 {
        let indent = (depth - 1) * step;
        let description = writer.wrap(section.description(), None, indent + section.name().len() + 2);
        let name = writer.color(section.name(), style.section_color);
        writer.write(&format!("{}{}: {}", spaces(indent), name, description));
    }

    let max_width = section
        .commands()
        .map(|c| c.name().len() + 1)
        .max()
        .unwrap_or(0);
    for command in section.commands() {
        // Pad on the plain name so colour codes do not skew the alignment.
        let padding = spaces(max_width - (command.name().len() + 1));
        let name = writer.color(command.name(), style.command_color);
        writer.write(&format!(
            "{}{}:{} {}",
            spaces(depth * step),
            name,
            padding,
            command.description()
        ));

        if style.show_options {
            for option in command.all_options() {
                let option_name = writer.color(option.name(), style.command_color);
                writer.write(&format!(
                    "{}{}: {}",
                    spaces((depth + 1) * step),
                    option_name,
                    option.description()
                ));
            }
        }
    }

    for subsection in section.subsections() {
        print_map_level(writer, subsection, depth + 1, style);
    }

    if depth <= 1 {
        writer.write("");
    }
}

// MARK: --- UNIT TESTS ---
