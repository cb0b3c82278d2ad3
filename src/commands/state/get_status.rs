//! Get status command

use std::sync::Arc;

use serde_json::{json, Value};

use crate::commands::messages;
use crate::protocol::{CommandSpec, SwitchCommand};
use crate::server::{command_response, optional_str};
use crate::switchboard::Switchboard;
use crate::types::{CommandResult, GroupStatus, WILDCARD_GROUP};

/// Resolve the effective state of one group
pub struct GetStatusCommand {
    board: Arc<Switchboard>,
}

impl GetStatusCommand {
    pub fn new(board: Arc<Switchboard>) -> Self {
        Self { board }
    }
}

impl SwitchCommand for GetStatusCommand {
    fn definition(&self) -> CommandSpec {
        CommandSpec::new(
            "get_status",
            "Get the effective mode and locale of a group, taking '*' switches into account",
            json!({
                "type": "object",
                "properties": {
                    "group": {
                        "type": "string",
                        "description": "Group to resolve (default '*')"
                    }
                },
                "required": []
            }),
        )
    }

    fn execute(&self, params: Value) -> CommandResult<Value> {
        let group = optional_str(&params, "group").unwrap_or(WILDCARD_GROUP);
        let state = self.board.status(group)?;

        let message = messages::status(group, &state);
        let status = GroupStatus {
            group: group.to_string(),
            state,
        };
        command_response(message, &status)
    }
}
