//! Protocol types for the stdio command server
//!
//! JSON-RPC 2.0 framing plus the command definitions front ends discover
//! through `commands/list`.

mod command;
mod jsonrpc;

pub use command::{CommandSpec, ServerInfo, SwitchCommand};
pub use jsonrpc::{ErrorObject, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
