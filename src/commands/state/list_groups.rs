//! List groups command

use std::sync::Arc;

use serde_json::{json, Value};

use crate::commands::messages;
use crate::protocol::{CommandSpec, SwitchCommand};
use crate::server::command_response;
use crate::switchboard::Switchboard;
use crate::types::CommandResult;

pub struct ListGroupsCommand {
    board: Arc<Switchboard>,
}

impl ListGroupsCommand {
    pub fn new(board: Arc<Switchboard>) -> Self {
        Self { board }
    }
}

impl SwitchCommand for ListGroupsCommand {
    fn definition(&self) -> CommandSpec {
        CommandSpec::new(
            "list_groups",
            "List every group with a recorded switch and its effective state",
            json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        )
    }

    fn execute(&self, _params: Value) -> CommandResult<Value> {
        let groups = self.board.list_groups()?;
        command_response(messages::group_listing(&groups), &groups)
    }
}
