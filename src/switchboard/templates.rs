//! Template registry management

use tracing::info;

use crate::types::{JinjaTemplate, SwitchResult};

use super::{Switchboard, TemplateAdded};

pub fn list_templates(sb: &Switchboard) -> SwitchResult<Vec<JinjaTemplate>> {
    sb.store.read(|tx| tx.templates().list_all())
}

/// Register a template; an already registered path is left untouched
pub fn add_template(sb: &Switchboard, path: &str, group: &str) -> SwitchResult<TemplateAdded> {
    let template = JinjaTemplate::new(path, group)?;

    sb.store.write(|tx| {
        let registry = tx.templates();
        match registry.get_by_path(path) {
            Ok(existing) => Ok(TemplateAdded::AlreadyPresent(existing)),
            Err(e) if e.is_not_found() => {
                registry.add(&template)?;
                info!(path, group, "registered template");
                Ok(TemplateAdded::Added(template))
            }
            Err(e) => Err(e),
        }
    })
}

/// Unregister a template; returns whether it was registered
pub fn remove_template(sb: &Switchboard, path: &str) -> SwitchResult<bool> {
    let removed = sb.store.write(|tx| tx.templates().remove_by_path(path))?;
    if removed {
        info!(path, "removed template");
    }
    Ok(removed)
}
