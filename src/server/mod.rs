//! Command server
//!
//! Exposes the switchboard's command surface as JSON-RPC 2.0 over a pair
//! of line-oriented streams (stdin/stdout for `lonet-switch serve`), so a
//! tray or other front end can drive the switch without linking the
//! crate.

mod handlers;

use std::collections::BTreeMap;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::protocol::{CommandSpec, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerInfo, SwitchCommand};
use crate::types::CommandResult;

pub use handlers::*;

/// JSON-RPC server dispatching to registered commands
pub struct CommandServer<R, W> {
    server_info: ServerInfo,
    commands: BTreeMap<String, Box<dyn SwitchCommand>>,
    reader: R,
    writer: W,
}

impl CommandServer<BufReader<io::Stdin>, BufWriter<io::Stdout>> {
    /// Serve on stdin/stdout
    pub fn stdio(info: ServerInfo) -> Self {
        Self::with_io(info, BufReader::new(io::stdin()), BufWriter::new(io::stdout()))
    }
}

impl<R: BufRead, W: Write> CommandServer<R, W> {
    pub fn with_io(server_info: ServerInfo, reader: R, writer: W) -> Self {
        Self {
            server_info,
            commands: BTreeMap::new(),
            reader,
            writer,
        }
    }

    /// Register a command with the server
    pub fn register_command(&mut self, command: Box<dyn SwitchCommand>) -> &mut Self {
        self.commands.insert(command.name(), command);
        self
    }

    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Run until the input stream closes
    pub fn run(&mut self) -> CommandResult<()> {
        let mut line = String::new();
        while self.reader.read_line(&mut line)? > 0 {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                let request = trimmed.to_string();
                self.handle_request(&request)?;
            }
            line.clear();
        }
        Ok(())
    }

    /// Handle a single JSON-RPC request line
    fn handle_request(&mut self, request_str: &str) -> CommandResult<()> {
        let request: JsonRpcRequest = match serde_json::from_str(request_str) {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, "unparseable request");
                return self.send(&JsonRpcError::parse_error(e.to_string()));
            }
        };

        let id = request.id.clone().unwrap_or(Value::Null);
        if !request.is_valid() {
            return self.send(&JsonRpcError::invalid_request(id, "jsonrpc must be '2.0'"));
        }

        if request.is_notification() {
            debug!(method = %request.method, "ignoring notification");
            return Ok(());
        }

        debug!(method = %request.method, "request");
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "commands/list" => self.handle_commands_list(id),
            "commands/call" => self.handle_command_call(id, request.params),
            "ping" => self.send(&JsonRpcResponse::new(id, json!({}))),
            other => {
                let response = JsonRpcError::method_not_found(id, other);
                self.send(&response)
            }
        }
    }

    fn handle_initialize(&mut self, id: Value) -> CommandResult<()> {
        let result = json!({
            "serverInfo": {
                "name": self.server_info.name,
                "version": self.server_info.version
            },
            "capabilities": { "commands": {} }
        });
        self.send(&JsonRpcResponse::new(id, result))
    }

    fn handle_commands_list(&mut self, id: Value) -> CommandResult<()> {
        let commands: Vec<CommandSpec> = self.commands.values().map(|c| c.definition()).collect();
        self.send(&JsonRpcResponse::new(id, json!({ "commands": commands })))
    }

    fn handle_command_call(&mut self, id: Value, params: Option<Value>) -> CommandResult<()> {
        let params = params.unwrap_or(Value::Null);
        let name = match extract_command_name(&params) {
            Some(name) => name.to_string(),
            None => {
                return self.send(&JsonRpcError::invalid_params(id, "missing command name"));
            }
        };

        let result = match self.commands.get(&name) {
            Some(command) => command.execute(extract_arguments(&params)),
            None => return self.send(&JsonRpcError::unknown_command(id, &name)),
        };

        match result {
            Ok(value) => self.send(&JsonRpcResponse::new(id, value)),
            Err(e) => {
                warn!(command = %name, error = %e, "command failed");
                self.send(&JsonRpcError::command_failed(id, e.to_string()))
            }
        }
    }

    fn send<T: Serialize>(&mut self, response: &T) -> CommandResult<()> {
        let json = serde_json::to_string(response)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}
