//! Name → handler table populated at startup.
//!
//! The registry is an owned value handed to each module's init routine.
//! Once `activate`d it accepts no more registrations and starts dispatching.

use crate::commands::{CmdStatus, CommandContext};
use crate::params::{ParamError, ParamSchema};
use arrayvec::ArrayString;
use heapless::Vec;
use thiserror::Error;

pub const MAX_COMMANDS: usize = 32;
pub const MAX_COMMAND_NAME_LEN: usize = 24;

pub type CommandName = ArrayString<MAX_COMMAND_NAME_LEN>;

/// Handler signature: context, parameter schema, raw parameters, expected argument count.
pub type CommandHandler = fn(&mut CommandContext<'_>, &ParamSchema, Option<&[u8]>, usize) -> CmdStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("command {0} is already registered")]
    Duplicate(CommandName),
    #[error("command name {0:?} is longer than {} bytes", MAX_COMMAND_NAME_LEN)]
    NameTooLong(String),
    #[error("registry is full ({} commands)", MAX_COMMANDS)]
    Full,
    #[error("registry is active, registration is closed")]
    Active,
    #[error("registry is not active yet")]
    Inactive,
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("invalid parameter schema: {0}")]
    Schema(#[from] ParamError),
}

#[derive(Clone)]
pub struct CommandEntry {
    pub name: CommandName,
    pub handler: CommandHandler,
    pub schema: ParamSchema,
    pub expected_args: usize,
}

impl core::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("schema", &format_args!("{:?}", self.schema.to_string()))
            .field("expected_args", &self.expected_args)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry, MAX_COMMANDS>,
    active: bool,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &str,
        handler: CommandHandler,
        schema: ParamSchema,
        expected_args: usize,
    ) -> Result<(), RegistryError> {
        if self.active {
            return Err(RegistryError::Active);
        }

        let name = CommandName::from(name).map_err(|_| RegistryError::NameTooLong(name.to_string()))?;
        if self.get(&name).is_some() {
            return Err(RegistryError::Duplicate(name));
        }

        self.entries
            .push(CommandEntry {
                name,
                handler,
                schema,
                expected_args,
            })
            .map_err(|_| RegistryError::Full)?;

        tracing::debug!(command = name.as_str(), expected_args, "command registered");
        Ok(())
    }

    /// Close registration and allow dispatch.
    pub fn activate(&mut self) {
        self.active = true;
        tracing::info!(commands = self.entries.len(), "command registry active");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.entries.iter().find(|e| e.name.as_str() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the named command with its registered schema and argument count.
    pub fn execute(
        &self,
        name: &str,
        params: Option<&[u8]>,
        ctx: &mut CommandContext<'_>,
    ) -> Result<CmdStatus, RegistryError> {
        if !self.active {
            return Err(RegistryError::Inactive);
        }

        let entry = self
            .get(name)
            .ok_or_else(|| RegistryError::UnknownCommand(name.to_string()))?;

        let status = (entry.handler)(ctx, &entry.schema, params, entry.expected_args);
        tracing::debug!(command = name, code = status.code(), "command finished");
        Ok(status)
    }
}
