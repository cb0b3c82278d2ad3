//! History command

use std::sync::Arc;

use serde_json::{json, Value};

use crate::protocol::{CommandSpec, SwitchCommand};
use crate::server::{command_response, optional_str};
use crate::switchboard::Switchboard;
use crate::types::CommandResult;

/// Raw switch events, oldest first
pub struct HistoryCommand {
    board: Arc<Switchboard>,
}

impl HistoryCommand {
    pub fn new(board: Arc<Switchboard>) -> Self {
        Self { board }
    }
}

impl SwitchCommand for HistoryCommand {
    fn definition(&self) -> CommandSpec {
        CommandSpec::new(
            "history",
            "List recorded switch events, optionally for one group only",
            json!({
                "type": "object",
                "properties": {
                    "group": {
                        "type": "string",
                        "description": "Only events recorded for this exact group"
                    }
                },
                "required": []
            }),
        )
    }

    fn execute(&self, params: Value) -> CommandResult<Value> {
        let events = self.board.history(optional_str(&params, "group"))?;
        command_response(format!("{} switch event(s)", events.len()), &events)
    }
}
