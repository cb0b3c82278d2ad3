//! Data types for the lo/net switch
//!
//! This module contains the core data structures used throughout the crate.

mod error;
mod switch;
mod template;

pub use error::{SwitchError, SwitchResult};
pub use switch::{
    is_wildcard, GroupStatus, Mode, SwitchContext, SwitchState, SwitchStateChange, WILDCARD_GROUP,
};
pub use template::{output_path_for, validate_template_path, JinjaTemplate, TEMPLATE_SUFFIX};

/// Result type for command and server operations
pub type CommandResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;
