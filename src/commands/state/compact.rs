//! Compact command

use std::sync::Arc;

use serde_json::{json, Value};

use crate::commands::messages;
use crate::protocol::{CommandSpec, SwitchCommand};
use crate::server::command_response;
use crate::switchboard::Switchboard;
use crate::types::CommandResult;

pub struct CompactCommand {
    board: Arc<Switchboard>,
}

impl CompactCommand {
    pub fn new(board: Arc<Switchboard>) -> Self {
        Self { board }
    }
}

impl SwitchCommand for CompactCommand {
    fn definition(&self) -> CommandSpec {
        CommandSpec::new(
            "compact",
            "Keep only the latest switch event per group. Effective states are unchanged.",
            json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        )
    }

    fn execute(&self, _params: Value) -> CommandResult<Value> {
        let report = self.board.compact()?;
        command_response(messages::compacted(&report), &report)
    }
}
