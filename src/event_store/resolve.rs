//! State Resolver
//!
//! Computes the effective (mode, locale) of a group from the latest event
//! of that group and the latest wildcard event. When both exist, the group
//! event wins only if it is strictly newer; equal timestamps go to the
//! wildcard.

use crate::types::{SwitchResult, SwitchState, SwitchStateChange, WILDCARD_GROUP};

use super::log::EventLog;

/// Merge the latest group event with the latest wildcard event
pub fn resolve_from(
    group_latest: Option<&SwitchStateChange>,
    wildcard_latest: Option<&SwitchStateChange>,
) -> SwitchState {
    match (group_latest, wildcard_latest) {
        (None, None) => SwitchState::default(),
        (None, Some(w)) => w.state(),
        (Some(g), None) => g.state(),
        (Some(g), Some(w)) => {
            if g.created_at > w.created_at {
                g.state()
            } else {
                w.state()
            }
        }
    }
}

/// Resolve the effective state of `group` from the log
pub fn resolve(log: &EventLog<'_>, group: &str) -> SwitchResult<SwitchState> {
    let group_latest = latest_or_none(log, group)?;
    let wildcard_latest = latest_or_none(log, WILDCARD_GROUP)?;
    Ok(resolve_from(group_latest.as_ref(), wildcard_latest.as_ref()))
}

fn latest_or_none(log: &EventLog<'_>, group: &str) -> SwitchResult<Option<SwitchStateChange>> {
    match log.latest_for_group(group) {
        Ok(change) => Ok(Some(change)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
