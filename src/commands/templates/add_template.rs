//! Add template command

use std::sync::Arc;

use serde_json::{json, Value};

use crate::commands::messages;
use crate::protocol::{CommandSpec, SwitchCommand};
use crate::server::{command_response, optional_str, required_str};
use crate::switchboard::Switchboard;
use crate::types::{CommandResult, WILDCARD_GROUP};

/// Register a template; adding a known path again is not an error
pub struct AddTemplateCommand {
    board: Arc<Switchboard>,
}

impl AddTemplateCommand {
    pub fn new(board: Arc<Switchboard>) -> Self {
        Self { board }
    }
}

impl SwitchCommand for AddTemplateCommand {
    fn definition(&self) -> CommandSpec {
        CommandSpec::new(
            "add_template",
            "Register a .jinja template to re-render after switches of a group",
            json!({
                "type": "object",
                "properties": {
                    "path": {
                        "type": "string",
                        "description": "Absolute path of the template, must end in .jinja"
                    },
                    "group": {
                        "type": "string",
                        "description": "Group whose switches re-render the template (default '*')"
                    }
                },
                "required": ["path"]
            }),
        )
    }

    fn execute(&self, params: Value) -> CommandResult<Value> {
        let path = required_str(&params, "path")?;
        let group = optional_str(&params, "group").unwrap_or(WILDCARD_GROUP);

        let added = self.board.add_template(path, group)?;
        command_response(messages::template_added(&added), &added)
    }
}
