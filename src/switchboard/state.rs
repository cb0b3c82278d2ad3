//! Switch, status and log maintenance operations

use tracing::{error, info};

use crate::event_store::{compact as compact_log, resolve, CompactionReport};
use crate::types::{
    GroupStatus, Mode, SwitchContext, SwitchError, SwitchResult, SwitchState, SwitchStateChange,
};

use super::{render_templates, SwitchOutcome, Switchboard};

fn validate_group(group: &str) -> SwitchResult<()> {
    if group.trim().is_empty() {
        return Err(SwitchError::InvalidInput(
            "group must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Record a switch, then re-render templates and notify plugins
///
/// The event is committed before any side effect runs. Render and plugin
/// failures end up in the outcome and never undo the switch.
pub fn switch(sb: &Switchboard, mode: Mode, group: &str, locale: &str) -> SwitchResult<SwitchOutcome> {
    validate_group(group)?;

    let change = SwitchStateChange::new(mode, group, locale);
    let cleared = sb.store.write(|tx| tx.events().record_switch(&change))?;
    info!(mode = %mode, group, locale, cleared, "switched");

    let ctx = SwitchContext::from(&change);

    let (renders, registry_error) = match sb.store.read(|tx| tx.templates().list_for_group(group)) {
        Ok(templates) => (render_templates(sb.renderer.as_ref(), &templates, &ctx), None),
        Err(e) => {
            error!(error = %e, "could not read template registry, skipping renders");
            (Vec::new(), Some(e.to_string()))
        }
    };

    let plugins = sb.plugins.notify_plugins(&ctx);

    Ok(SwitchOutcome {
        change,
        cleared,
        renders,
        registry_error,
        plugins,
    })
}

pub fn status(sb: &Switchboard, group: &str) -> SwitchResult<SwitchState> {
    sb.store.read(|tx| resolve(&tx.events(), group))
}

/// Every group with history and its resolved state
pub fn list_groups(sb: &Switchboard) -> SwitchResult<Vec<GroupStatus>> {
    sb.store.read(|tx| {
        let log = tx.events();
        let mut statuses = Vec::new();
        for group in log.distinct_groups()? {
            let state = resolve(&log, &group)?;
            statuses.push(GroupStatus { group, state });
        }
        Ok(statuses)
    })
}

/// Raw events, oldest first, optionally restricted to one group
pub fn history(sb: &Switchboard, group: Option<&str>) -> SwitchResult<Vec<SwitchStateChange>> {
    sb.store.read(|tx| match group {
        Some(group) => tx.events().events_for_group(group),
        None => tx.events().all_events(),
    })
}

pub fn compact(sb: &Switchboard) -> SwitchResult<CompactionReport> {
    sb.store.write(|tx| compact_log(&tx.events()))
}

/// Delete every event of `group`; clearing an unknown group is a no-op
pub fn clear_group(sb: &Switchboard, group: &str) -> SwitchResult<usize> {
    validate_group(group)?;
    let deleted = sb.store.write(|tx| tx.events().delete_for_group(group))?;
    info!(group, deleted, "cleared group");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use crate::event_store::SwitchStore;
    use crate::switchboard::Switchboard;
    use crate::types::{Mode, SwitchError, SwitchState};

    fn board() -> Switchboard {
        Switchboard::with_store(SwitchStore::open_in_memory().unwrap())
    }

    #[test]
    fn test_status_defaults_to_local() {
        let sb = board();
        assert_eq!(sb.status("anything").unwrap(), SwitchState::new(Mode::Local, ""));
    }

    #[test]
    fn test_wildcard_switch_leaves_single_event() {
        let sb = board();
        sb.switch(Mode::Local, "lab1", "").unwrap();
        sb.switch(Mode::Local, "lab2", "").unwrap();

        let outcome = sb.switch(Mode::Network, "*", "en-US").unwrap();

        assert_eq!(outcome.cleared, 2);
        assert_eq!(sb.history(None).unwrap(), vec![outcome.change]);
        assert_eq!(sb.status("*").unwrap(), SwitchState::new(Mode::Network, "en-US"));
    }

    #[test]
    fn test_empty_group_rejected() {
        let sb = board();
        assert!(matches!(
            sb.switch(Mode::Local, "", ""),
            Err(SwitchError::InvalidInput(_))
        ));
        assert!(matches!(sb.clear_group(" "), Err(SwitchError::InvalidInput(_))));
    }

    #[test]
    fn test_list_groups_resolves_each_group() {
        let sb = board();
        sb.switch(Mode::Network, "*", "en-US").unwrap();
        // an equal timestamp would hand lab1 to the wildcard
        std::thread::sleep(std::time::Duration::from_millis(2));
        sb.switch(Mode::Local, "lab1", "").unwrap();

        let groups = sb.list_groups().unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group, "*");
        assert_eq!(groups[0].state, SwitchState::new(Mode::Network, "en-US"));
        assert_eq!(groups[1].group, "lab1");
        assert_eq!(groups[1].state, SwitchState::new(Mode::Local, ""));
    }
}
