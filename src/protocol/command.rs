//! Command definitions

use serde::Serialize;
use serde_json::Value;

use crate::types::CommandResult;

/// Command definition returned by `commands/list`
#[derive(Serialize, Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Server information returned by `initialize`
#[derive(Clone, Debug)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

impl ServerInfo {
    pub fn new(name: String, version: String) -> Self {
        Self { name, version }
    }
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: crate::NAME.to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// A command callable through `commands/call`
///
/// Every command must implement this trait to be registered with the
/// command server.
pub trait SwitchCommand: Send + Sync {
    fn definition(&self) -> CommandSpec;

    /// Execute the command with the given arguments
    fn execute(&self, params: Value) -> CommandResult<Value>;

    fn name(&self) -> String {
        self.definition().name
    }
}
