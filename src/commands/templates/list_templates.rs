//! List templates command

use std::sync::Arc;

use serde_json::{json, Value};

use crate::commands::messages;
use crate::protocol::{CommandSpec, SwitchCommand};
use crate::server::command_response;
use crate::switchboard::Switchboard;
use crate::types::CommandResult;

pub struct ListTemplatesCommand {
    board: Arc<Switchboard>,
}

impl ListTemplatesCommand {
    pub fn new(board: Arc<Switchboard>) -> Self {
        Self { board }
    }
}

impl SwitchCommand for ListTemplatesCommand {
    fn definition(&self) -> CommandSpec {
        CommandSpec::new(
            "list_templates",
            "List registered .jinja templates in registration order",
            json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        )
    }

    fn execute(&self, _params: Value) -> CommandResult<Value> {
        let templates = self.board.list_templates()?;
        command_response(messages::template_listing(&templates), &templates)
    }
}
