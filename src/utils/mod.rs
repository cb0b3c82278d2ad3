//! Utility functions and helpers
//!
//! Timestamp conversions for the event log and atomic file writes for
//! rendered templates.

pub mod atomic;
pub mod time;

pub use atomic::atomic_write;
pub use time::{from_micros, now, to_micros};
