//! Command handlers and the context they run in.

pub mod tm;

use crate::config::TmConfig;
use crate::params::ParamError;
use crate::store::DataStore;
use crate::transport::Transport;

pub const CMD_OK: i32 = 1;
pub const CMD_FAIL: i32 = 0;
pub const CMD_ERROR: i32 = -1;

/// Result a handler reports back to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdStatus {
    Ok,
    /// Malformed or unusable parameters, or the command could not complete.
    Fail,
    /// A required parameter buffer was absent.
    Error,
}

impl CmdStatus {
    pub fn code(self) -> i32 {
        match self {
            CmdStatus::Ok => CMD_OK,
            CmdStatus::Fail => CMD_FAIL,
            CmdStatus::Error => CMD_ERROR,
        }
    }
}

impl From<&ParamError> for CmdStatus {
    fn from(error: &ParamError) -> Self {
        match error {
            ParamError::Missing => CmdStatus::Error,
            _ => CmdStatus::Fail,
        }
    }
}

impl core::fmt::Display for CmdStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CmdStatus::Ok => write!(f, "CMD_OK"),
            CmdStatus::Fail => write!(f, "CMD_FAIL"),
            CmdStatus::Error => write!(f, "CMD_ERROR"),
        }
    }
}

/// Collaborators borrowed for the duration of one invocation.
pub struct CommandContext<'a> {
    pub config: &'a TmConfig,
    pub store: &'a dyn DataStore,
    pub transport: &'a mut dyn Transport,
    /// Where diagnostic commands render their output.
    pub console: &'a mut dyn core::fmt::Write,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        config: &'a TmConfig,
        store: &'a dyn DataStore,
        transport: &'a mut dyn Transport,
        console: &'a mut dyn core::fmt::Write,
    ) -> Self {
        Self {
            config,
            store,
            transport,
            console,
        }
    }
}
