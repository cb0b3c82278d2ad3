//! Switch state commands

mod clear_group;
mod compact;
mod get_status;
mod history;
mod list_groups;
mod switch;

pub use clear_group::ClearGroupCommand;
pub use compact::CompactCommand;
pub use get_status::GetStatusCommand;
pub use history::HistoryCommand;
pub use list_groups::ListGroupsCommand;
pub use switch::SwitchModeCommand;
