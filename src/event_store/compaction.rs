//! Compactor - collapse the log to one event per group
//!
//! Only the latest event of a group can ever take part in resolution, so
//! dropping the rest reclaims space without changing any answer. The
//! resolved state of every group is checked before and after the swap and
//! a mismatch aborts the enclosing transaction.

use serde::Serialize;
use tracing::info;

use crate::types::{SwitchError, SwitchResult};

use super::log::EventLog;
use super::resolve::resolve;

/// Outcome of a compaction run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactionReport {
    #[serde(rename = "eventsBefore")]
    pub events_before: usize,
    #[serde(rename = "eventsAfter")]
    pub events_after: usize,
    pub groups: Vec<String>,
}

impl CompactionReport {
    pub fn removed(&self) -> usize {
        self.events_before - self.events_after
    }
}

/// Replace the log with the latest event of each group
///
/// Must run inside a write transaction; any error leaves the log as it
/// was once the transaction rolls back.
pub fn compact(log: &EventLog<'_>) -> SwitchResult<CompactionReport> {
    let events_before = log.count()?;
    let groups = log.distinct_groups()?;

    let mut keep = Vec::with_capacity(groups.len());
    let mut expected = Vec::with_capacity(groups.len());
    for group in &groups {
        keep.push(log.latest_for_group(group)?);
        expected.push(resolve(log, group)?);
    }

    log.replace_all(&keep)?;

    for (group, before) in groups.iter().zip(&expected) {
        let after = resolve(log, group)?;
        if &after != before {
            return Err(SwitchError::Corrupt(format!(
                "compaction changed state of group '{}' from {:?} to {:?}",
                group, before, after
            )));
        }
    }

    let events_after = log.count()?;
    info!(events_before, events_after, groups = groups.len(), "compacted switch log");

    Ok(CompactionReport {
        events_before,
        events_after,
        groups,
    })
}
