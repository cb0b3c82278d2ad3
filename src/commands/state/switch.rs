//! Switch command

use std::sync::Arc;

use serde_json::{json, Value};

use crate::commands::messages;
use crate::protocol::{CommandSpec, SwitchCommand};
use crate::server::{command_response, optional_str, required_str};
use crate::switchboard::Switchboard;
use crate::types::{CommandResult, Mode, WILDCARD_GROUP};

/// Record a mode switch for a group, then render templates and notify plugins
pub struct SwitchModeCommand {
    board: Arc<Switchboard>,
}

impl SwitchModeCommand {
    pub fn new(board: Arc<Switchboard>) -> Self {
        Self { board }
    }
}

impl SwitchCommand for SwitchModeCommand {
    fn definition(&self) -> CommandSpec {
        CommandSpec::new(
            "switch",
            "Switch a group to local (lo) or network (net) mode. Group '*' switches everything and clears per-group history.",
            json!({
                "type": "object",
                "properties": {
                    "mode": {
                        "type": "string",
                        "enum": ["lo", "net"],
                        "description": "Target mode"
                    },
                    "group": {
                        "type": "string",
                        "description": "Group to switch, '*' for all (default '*')"
                    },
                    "locale": {
                        "type": "string",
                        "description": "Free-form locale tag (default empty)"
                    }
                },
                "required": ["mode"]
            }),
        )
    }

    fn execute(&self, params: Value) -> CommandResult<Value> {
        let mode: Mode = required_str(&params, "mode")?.parse()?;
        let group = optional_str(&params, "group").unwrap_or(WILDCARD_GROUP);
        let locale = optional_str(&params, "locale").unwrap_or("");

        let outcome = self.board.switch(mode, group, locale)?;
        command_response(messages::switched(&outcome), &outcome)
    }
}
