// src/core/resolver.rs

use std::fmt;

use crate::{
    constants::OPTION_PREFIX,
    core::{command::Command, section::Section},
};

/// The node a resolution ends on.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// Resolution stopped at a section.
    Section(&'a Section),
    /// Resolution reached a command.
    Command(&'a Command),
}

impl<'a> Node<'a> {
    /// Name of the section or command.
    pub fn name(&self) -> &'a str {
        match self {
            Self::Section(section) => section.name(),
            Self::Command(command) => command.name(),
        }
    }

    /// The section, if resolution stopped at one.
    pub fn as_section(&self) -> Option<&'a Section> {
        match self {
            Self::Section(section) => Some(section),
            Self::Command(_) => None,
        }
    }

    /// The command, if resolution reached one.
    pub fn as_command(&self) -> Option<&'a Command> {
        match self {
            Self::Command(command) => Some(command),
            Self::Section(_) => None,
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section(section) => write!(f, "{}", section),
            Self::Command(command) => write!(f, "{}", command),
        }
    }
}

/// Finds the deepest node of the tree under `base` that `args` names.
///
/// Returns the node together with the arguments it did not consume, which is
/// always a suffix of `args`.
///
/// # Logic:
/// 1. No arguments: `base` is the answer and nothing remains.
/// 2. `args[0]` names a command of `base`: that command, with everything after it.
/// 3. `args[0]` names a subsection: if the next token is option-shaped (e.g.
///    `users --help`) stop at the subsection, otherwise descend into it.
/// 4. Anything else: `base` with `args` untouched, so the unmatched token
///    can still be reported.
///
/// Commands are checked first, though [`Section`] never lets a command and a
/// subsection share a name. There is no backtracking once a subsection is entered.
pub fn resolve<'a, 'b>(base: &'a Section, args: &'b [String]) -> (Node<'a>, &'b [String]) {
    let Some((first, rest)) = args.split_first() else {
        return (Node::Section(base), &[]);
    };

    if let Some(command) = base.find_command(first) {
        log::trace!("'{}' matched command in '{}'", first, base.name());
        return (Node::Command(command), rest);
    }

    if let Some(subsection) = base.find_subsection(first) {
        if let Some(next) = rest.first().filter(|next| next.starts_with(OPTION_PREFIX)) {
            log::trace!("Stopping at section '{}' before option '{}'", first, next);
            return (Node::Section(subsection), rest);
        }
        return resolve(subsection, rest);
    }

    (Node::Section(base), args)
}

// MARK: --- UNIT TESTS ---
