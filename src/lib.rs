//! lonet-switch
//!
//! Switches groups of machines or services between local (`lo`) and
//! network (`net`) mode, keeping every switch in an append-only SQLite
//! log and re-rendering registered Jinja templates after each one.
//!
//! # Features
//!
//! - **Event log**: every switch is an immutable, timestamped event
//! - **Wildcard group**: a `*` switch overrides every group and resets history
//! - **Compaction**: drop superseded events without changing any state
//! - **Templates**: `.jinja` files re-rendered per group after a switch
//! - **Plugins**: `switch_*` scripts and in-process callbacks notified per switch
//! - **Command server**: the same operations over JSON-RPC on stdio
//!
//! # Modules
//!
//! - `types`: Core data structures (Mode, SwitchStateChange, JinjaTemplate)
//! - `event_store`: SQLite store, event log, resolver, compactor, template registry
//! - `switchboard`: Orchestration of switches, rendering and plugins
//! - `protocol`: JSON-RPC protocol types and the command trait
//! - `commands`: 9 command implementations
//! - `server`: JSON-RPC command server
//! - `utils`: Utility functions (timestamps, atomic writes)
//!
//! # Example
//!
//! ```no_run
//! use lonet_switch::{Mode, StoreConfig, Switchboard};
//!
//! fn main() -> lonet_switch::SwitchResult<()> {
//!     let board = Switchboard::open(&StoreConfig::default())?;
//!     board.switch(Mode::Network, "lab1", "en-US")?;
//!     assert_eq!(board.status("lab1")?.mode, Mode::Network);
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod event_store;
pub mod protocol;
pub mod server;
pub mod switchboard;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use event_store::{CompactionReport, StoreConfig, SwitchStore};
pub use protocol::{CommandSpec, ServerInfo, SwitchCommand};
pub use server::CommandServer;
pub use switchboard::{SwitchOutcome, Switchboard, TemplateAdded};
pub use types::{
    CommandResult, GroupStatus, JinjaTemplate, Mode, SwitchContext, SwitchError, SwitchResult,
    SwitchState, SwitchStateChange, WILDCARD_GROUP,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
