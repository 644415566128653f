// src/core/section.rs

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::core::command::{Action, Command};

/// Raised while assembling the tree when a new node would break its structure.
/// These are programming errors in the embedding application, never user errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StructureError {
    /// Two siblings would share a name.
    #[error("Section '{section}' already has a subsection or command named '{name}'.")]
    Conflict {
        /// The section being added to.
        section: String,
        /// The name already in use.
        name: String,
    },
    /// Two options of one command would share a trigger or keyword.
    #[error("Command '{command}' already has an option triggered by '{trigger}'.")]
    DuplicateTrigger {
        /// The command being added to.
        command: String,
        /// The trigger that clashes.
        trigger: String,
    },
    /// An option trigger is not dash-prefixed.
    #[error("'{trigger}' is not a valid option trigger; expected '-x' or '--name'.")]
    MalformedTrigger {
        /// The rejected trigger.
        trigger: String,
    },
}

/// A namespace node in the command tree, holding subsections and commands.
///
/// Children are kept in name order. A name identifies at most one child: a
/// section may not hold a subsection and a command with the same name.
pub struct Section {
    name: String,
    description: String,
    subsections: BTreeMap<String, Section>,
    commands: BTreeMap<String, Command>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            subsections: BTreeMap::new(),
            commands: BTreeMap::new(),
        }
    }

    /// The name the section is reached by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description shown in listings.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Child sections in name order.
    pub fn subsections(&self) -> impl Iterator<Item = &Section> {
        self.subsections.values()
    }

    /// Child commands in name order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Whether the section has child sections.
    pub fn has_subsections(&self) -> bool {
        !self.subsections.is_empty()
    }

    /// Whether the section has child commands.
    pub fn has_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Adds a subsection, returning a handle to it for further assembly.
    pub fn add_subsection(&mut self, section: Section) -> Result<&mut Section, StructureError> {
        self.verify_new_structure(&section.name)?;
        log::debug!("Adding subsection '{}' to '{}'", section.name, self.name);
        Ok(self
            .subsections
            .entry(section.name.clone())
            .or_insert(section))
    }

    /// Adds a command, returning a handle to it for further assembly.
    pub fn add_command(&mut self, command: Command) -> Result<&mut Command, StructureError> {
        self.verify_new_structure(command.name())?;
        log::debug!("Adding command '{}' to '{}'", command.name(), self.name);
        Ok(self
            .commands
            .entry(command.name().to_string())
            .or_insert(command))
    }

    /// Creates and adds an empty subsection.
    pub fn create_subsection(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&mut Section, StructureError> {
        self.add_subsection(Section::new(name, description))
    }

    /// Creates and adds a command bound to `action`.
    pub fn create_command<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        action: F,
    ) -> Result<&mut Command, StructureError>
    where
        F: Fn(&[String], &crate::models::NamedArgs) -> anyhow::Result<Option<i32>> + 'static,
    {
        let action: Action = Box::new(action);
        self.add_command(Command::from_action(name, description, action))
    }

    /// Looks up a direct subsection.
    pub fn find_subsection(&self, name: &str) -> Option<&Section> {
        self.subsections.get(name)
    }

    /// Looks up a direct subsection, mutably.
    pub fn find_subsection_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.subsections.get_mut(name)
    }

    /// Looks up a direct command.
    pub fn find_command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Looks up a direct command, mutably.
    pub fn find_command_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.commands.get_mut(name)
    }

    /// Removes and returns the subsection with the given name; `None` if there is none.
    pub fn remove_subsection(&mut self, name: &str) -> Option<Section> {
        self.subsections.remove(name)
    }

    /// Removes and returns the command with the given name; `None` if there is none.
    pub fn remove_command(&mut self, name: &str) -> Option<Command> {
        self.commands.remove(name)
    }

    /// Checks that no subsection or command already uses `name`.
    pub fn verify_new_structure(&self, name: &str) -> Result<(), StructureError> {
        if self.subsections.contains_key(name) || self.commands.contains_key(name) {
            return Err(StructureError::Conflict {
                section: self.name.clone(),
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("name", &self.name)
            .field("subsections", &self.subsections.keys().collect::<Vec<_>>())
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Section [{}]", self.name)
    }
}

// MARK: --- UNIT TESTS ---
