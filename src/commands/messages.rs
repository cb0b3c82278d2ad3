//! Human-readable messages shared by the CLI and the command server

use crate::event_store::CompactionReport;
use crate::switchboard::{SwitchOutcome, TemplateAdded};
use crate::types::{GroupStatus, JinjaTemplate, SwitchState};

pub fn switched(outcome: &SwitchOutcome) -> String {
    let change = &outcome.change;
    let mut msg = format!(
        "Switched to {} (group: {}, locale: {})",
        change.mode, change.group, change.locale
    );
    if let Some(error) = &outcome.registry_error {
        msg.push_str(&format!("\nTemplates were not rendered: {}", error));
    }
    let failures = outcome.failed_side_effects();
    if failures > 0 {
        msg.push_str(&format!(
            "\n{} side effect(s) failed; the switch itself was recorded.",
            failures
        ));
    }
    msg
}

pub fn status(group: &str, state: &SwitchState) -> String {
    format!(
        "Current state for group '{}': {} (locale: {})",
        group, state.mode, state.locale
    )
}

pub fn group_listing(groups: &[GroupStatus]) -> String {
    if groups.is_empty() {
        return "No groups found in the database.".to_string();
    }
    groups
        .iter()
        .map(|g| {
            format!(
                "Group: {} | State: {} | Locale: {}",
                g.group, g.state.mode, g.state.locale
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn compacted(report: &CompactionReport) -> String {
    format!(
        "Database compacted: only the latest state per group is kept. ({} of {} events removed)",
        report.removed(),
        report.events_before
    )
}

pub fn group_cleared(group: &str) -> String {
    format!("All switch state changes for group '{}' have been deleted.", group)
}

pub fn template_listing(templates: &[JinjaTemplate]) -> String {
    if templates.is_empty() {
        return "No templates registered.".to_string();
    }
    templates
        .iter()
        .map(|t| t.path.clone())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn template_added(added: &TemplateAdded) -> String {
    match added {
        TemplateAdded::Added(t) => format!("Added {}", t.path),
        TemplateAdded::AlreadyPresent(t) => format!("{} is already registered", t.path),
    }
}

pub fn template_removed(path: &str, removed: bool) -> String {
    if removed {
        format!("Deleted {}", path)
    } else {
        format!("{} was not registered", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;

    #[test]
    fn test_status_message() {
        let state = SwitchState::new(Mode::Local, "");
        assert_eq!(status("x", &state), "Current state for group 'x': lo (locale: )");
    }

    #[test]
    fn test_group_listing() {
        assert_eq!(group_listing(&[]), "No groups found in the database.");

        let groups = vec![GroupStatus {
            group: "lab1".to_string(),
            state: SwitchState::new(Mode::Network, "en-US"),
        }];
        assert_eq!(
            group_listing(&groups),
            "Group: lab1 | State: net | Locale: en-US"
        );
    }
}
