//! Event Store Module
//!
//! This module provides the persistence layer of the switch:
//! - `SwitchStore`: SQLite handle, schema and transactions
//! - `EventLog`: append-only log of switch events
//! - `TemplateRegistry`: registered `.jinja` templates
//! - `resolve`: effective state of a group from the log
//! - `compact`: collapse the log to one event per group
//!
//! # Architecture
//!
//! ```text
//! Write Path (one IMMEDIATE transaction):
//! ┌─────────┐    ┌──────────────────┐    ┌──────────────┐    ┌────────┐
//! │ switch  │───►│ group == "*" ?   │───►│ append event │───►│ commit │
//! │ request │    │ clear whole log  │    │              │    │        │
//! └─────────┘    └──────────────────┘    └──────────────┘    └────────┘
//!
//! Read Path:
//! ┌────────────────────────┐    ┌──────────────────────┐
//! │ latest event of group  │───►│ newer one wins,      │───► (mode, locale)
//! │ latest event of "*"    │    │ ties go to "*"       │
//! └────────────────────────┘    └──────────────────────┘
//! ```

mod compaction;
mod log;
mod registry;
mod resolve;
mod store;

pub use compaction::{compact, CompactionReport};
pub use log::EventLog;
pub use registry::TemplateRegistry;
pub use resolve::{resolve, resolve_from};
pub use store::{StoreConfig, StoreTx, SwitchStore, DB_FILE_NAME, HOME_ENV_VAR};
