//! Switchboard - the command surface over the store
//!
//! This module composes the event store, the template registry, the
//! renderer and the plugin host into the operations front ends call:
//! switch, status, listing, compaction, group clearing and template
//! management.

mod plugins;
mod render;
mod state;
mod templates;

use serde::Serialize;

use crate::event_store::{CompactionReport, StoreConfig, SwitchStore};
use crate::types::{GroupStatus, JinjaTemplate, Mode, SwitchResult, SwitchState, SwitchStateChange};

pub use plugins::{
    FnPlugin, PluginError, PluginHost, PluginOutcome, PluginReport, ScriptPlugin, SwitchPlugin,
    SCRIPT_PREFIX,
};
pub use render::{
    render_templates, JinjaRenderer, RenderError, RenderOutcome, RenderReport, TemplateRenderer,
};

/// Result of a committed switch and its side effects
#[derive(Debug, Clone, Serialize)]
pub struct SwitchOutcome {
    pub change: SwitchStateChange,
    /// Events erased by a wildcard switch
    pub cleared: usize,
    pub renders: Vec<RenderReport>,
    /// Set when the template registry could not be read after the commit;
    /// `renders` is empty then
    #[serde(rename = "registryError", skip_serializing_if = "Option::is_none")]
    pub registry_error: Option<String>,
    pub plugins: Vec<PluginReport>,
}

impl SwitchOutcome {
    /// True when every template rendered and every plugin succeeded
    pub fn all_side_effects_ok(&self) -> bool {
        self.registry_error.is_none()
            && self.renders.iter().all(|r| r.is_ok())
            && self.plugins.iter().all(|p| p.is_ok())
    }

    /// Number of failed side effects, a registry read failure counting once
    pub fn failed_side_effects(&self) -> usize {
        usize::from(self.registry_error.is_some())
            + self.renders.iter().filter(|r| !r.is_ok()).count()
            + self.plugins.iter().filter(|p| !p.is_ok()).count()
    }
}

/// Result of adding a template path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "template", rename_all = "snake_case")]
pub enum TemplateAdded {
    Added(JinjaTemplate),
    AlreadyPresent(JinjaTemplate),
}

/// Store, renderer and plugins behind one handle
pub struct Switchboard {
    pub(crate) store: SwitchStore,
    pub(crate) renderer: Box<dyn TemplateRenderer>,
    pub(crate) plugins: PluginHost,
}

impl Switchboard {
    /// Open the store described by `config` with the default renderer and
    /// the scripts directory of `config`
    pub fn open(config: &StoreConfig) -> SwitchResult<Self> {
        let store = SwitchStore::open(config)?;
        Ok(Self::with_store(store).with_plugins(PluginHost::with_scripts_dir(config.scripts_dir())))
    }

    /// Wrap an existing store; no plugins are registered
    pub fn with_store(store: SwitchStore) -> Self {
        Self {
            store,
            renderer: Box::new(JinjaRenderer::new()),
            plugins: PluginHost::new(),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_plugins(mut self, plugins: PluginHost) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn store(&self) -> &SwitchStore {
        &self.store
    }

    pub fn plugins_mut(&mut self) -> &mut PluginHost {
        &mut self.plugins
    }
}

// Operations live in the submodules; these are the public entry points
impl Switchboard {
    // Switch state (from state.rs)
    pub fn switch(&self, mode: Mode, group: &str, locale: &str) -> SwitchResult<SwitchOutcome> {
        state::switch(self, mode, group, locale)
    }

    pub fn status(&self, group: &str) -> SwitchResult<SwitchState> {
        state::status(self, group)
    }

    pub fn list_groups(&self) -> SwitchResult<Vec<GroupStatus>> {
        state::list_groups(self)
    }

    pub fn history(&self, group: Option<&str>) -> SwitchResult<Vec<SwitchStateChange>> {
        state::history(self, group)
    }

    pub fn compact(&self) -> SwitchResult<CompactionReport> {
        state::compact(self)
    }

    pub fn clear_group(&self, group: &str) -> SwitchResult<usize> {
        state::clear_group(self, group)
    }

    // Template registry (from templates.rs)
    pub fn list_templates(&self) -> SwitchResult<Vec<JinjaTemplate>> {
        templates::list_templates(self)
    }

    pub fn add_template(&self, path: &str, group: &str) -> SwitchResult<TemplateAdded> {
        templates::add_template(self, path, group)
    }

    pub fn remove_template(&self, path: &str) -> SwitchResult<bool> {
        templates::remove_template(self, path)
    }
}
