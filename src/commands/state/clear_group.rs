//! Clear group command

use std::sync::Arc;

use serde_json::{json, Value};

use crate::commands::messages;
use crate::protocol::{CommandSpec, SwitchCommand};
use crate::server::{command_response, required_str};
use crate::switchboard::Switchboard;
use crate::types::CommandResult;

/// Delete every event recorded for one group
pub struct ClearGroupCommand {
    board: Arc<Switchboard>,
}

impl ClearGroupCommand {
    pub fn new(board: Arc<Switchboard>) -> Self {
        Self { board }
    }
}

impl SwitchCommand for ClearGroupCommand {
    fn definition(&self) -> CommandSpec {
        CommandSpec::new(
            "clear_group",
            "Delete all switch events of a group. The group then falls back to the '*' state.",
            json!({
                "type": "object",
                "properties": {
                    "group": {
                        "type": "string",
                        "description": "Group to clear"
                    }
                },
                "required": ["group"]
            }),
        )
    }

    fn execute(&self, params: Value) -> CommandResult<Value> {
        let group = required_str(&params, "group")?;
        let deleted = self.board.clear_group(group)?;
        command_response(messages::group_cleared(group), &json!({ "deleted": deleted }))
    }
}
