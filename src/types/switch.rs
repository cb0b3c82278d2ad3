//! Switch state types
//!
//! A `SwitchStateChange` is one immutable entry in the append-only log.
//! Everything the resolver returns is derived from these events.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::SwitchError;

/// The reserved group name that applies to every group.
pub const WILDCARD_GROUP: &str = "*";

/// Two-valued switch mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    /// Local mode, stored and printed as `lo`
    #[default]
    #[serde(rename = "lo")]
    Local,
    /// Network mode, stored and printed as `net`
    #[serde(rename = "net")]
    Network,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Local => "lo",
            Mode::Network => "net",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SwitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lo" => Ok(Mode::Local),
            "net" => Ok(Mode::Network),
            other => Err(SwitchError::InvalidInput(format!(
                "invalid mode '{}': expected 'lo' or 'net'",
                other
            ))),
        }
    }
}

/// Returns true for the wildcard group `*`
pub fn is_wildcard(group: &str) -> bool {
    group == WILDCARD_GROUP
}

/// An immutable switch event in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchStateChange {
    /// Unique id, never reused
    pub id: Uuid,

    /// Creation time (UTC, microsecond precision once stored)
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    pub mode: Mode,

    /// Group name, `*` for the wildcard
    pub group: String,

    /// Locale, may be empty
    #[serde(default)]
    pub locale: String,
}

impl SwitchStateChange {
    /// Create a new event with a fresh id and the current time
    pub fn new(mode: Mode, group: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::with_timestamp(mode, group, locale, crate::utils::now())
    }

    /// Create a new event with an explicit creation time
    pub fn with_timestamp(
        mode: Mode,
        group: impl Into<String>,
        locale: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at,
            mode,
            group: group.into(),
            locale: locale.into(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        is_wildcard(&self.group)
    }

    /// The (mode, locale) pair this event sets
    pub fn state(&self) -> SwitchState {
        SwitchState {
            mode: self.mode,
            locale: self.locale.clone(),
        }
    }
}

/// Effective state of a group after resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SwitchState {
    pub mode: Mode,
    pub locale: String,
}

impl SwitchState {
    pub fn new(mode: Mode, locale: impl Into<String>) -> Self {
        Self {
            mode,
            locale: locale.into(),
        }
    }
}

/// A group together with its resolved state, as shown by `list-all`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStatus {
    pub group: String,
    #[serde(flatten)]
    pub state: SwitchState,
}

/// Context handed to the renderer and to plugins after a committed switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchContext {
    #[serde(rename = "switch_to")]
    pub mode: Mode,
    pub group: String,
    pub locale: String,
}

impl SwitchContext {
    pub fn new(mode: Mode, group: impl Into<String>, locale: impl Into<String>) -> Self {
        Self {
            mode,
            group: group.into(),
            locale: locale.into(),
        }
    }
}

impl From<&SwitchStateChange> for SwitchContext {
    fn from(change: &SwitchStateChange) -> Self {
        Self::new(change.mode, change.group.clone(), change.locale.clone())
    }
}
