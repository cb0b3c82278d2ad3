//! Commands exposed through the command server
//!
//! This module contains the 9 switch commands organized by category:
//! - State commands (6): switching, status and log maintenance
//! - Template commands (3): registry management

pub mod messages;
pub mod state;
pub mod templates;

use std::io::{BufRead, Write};
use std::sync::Arc;

use crate::server::CommandServer;
use crate::switchboard::Switchboard;

pub use state::{
    ClearGroupCommand, CompactCommand, GetStatusCommand, HistoryCommand, ListGroupsCommand,
    SwitchModeCommand,
};
pub use templates::{AddTemplateCommand, ListTemplatesCommand, RemoveTemplateCommand};

/// Register all commands with the server
pub fn register_all_commands<R: BufRead, W: Write>(
    server: &mut CommandServer<R, W>,
    board: Arc<Switchboard>,
) {
    // State commands (6)
    server.register_command(Box::new(SwitchModeCommand::new(board.clone())));
    server.register_command(Box::new(GetStatusCommand::new(board.clone())));
    server.register_command(Box::new(ListGroupsCommand::new(board.clone())));
    server.register_command(Box::new(HistoryCommand::new(board.clone())));
    server.register_command(Box::new(CompactCommand::new(board.clone())));
    server.register_command(Box::new(ClearGroupCommand::new(board.clone())));

    // Template commands (3)
    server.register_command(Box::new(ListTemplatesCommand::new(board.clone())));
    server.register_command(Box::new(AddTemplateCommand::new(board.clone())));
    server.register_command(Box::new(RemoveTemplateCommand::new(board)));
}
