//! Remove template command

use std::sync::Arc;

use serde_json::{json, Value};

use crate::commands::messages;
use crate::protocol::{CommandSpec, SwitchCommand};
use crate::server::{command_response, required_str};
use crate::switchboard::Switchboard;
use crate::types::CommandResult;

pub struct RemoveTemplateCommand {
    board: Arc<Switchboard>,
}

impl RemoveTemplateCommand {
    pub fn new(board: Arc<Switchboard>) -> Self {
        Self { board }
    }
}

impl SwitchCommand for RemoveTemplateCommand {
    fn definition(&self) -> CommandSpec {
        CommandSpec::new(
            "remove_template",
            "Unregister a template path. Rendered output files are left in place.",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Registered template path"
                    }
                },
                "required": ["path"]
            }),
        )
    }

    fn execute(&self, params: Value) -> CommandResult<Value> {
        let path = required_str(&params, "path")?;
        let removed = self.board.remove_template(path)?;
        command_response(
            messages::template_removed(path, removed),
            &json!({ "removed": removed }),
        )
    }
}
