//! Plugin notification after a committed switch
//!
//! Plugins are either executables named `switch_*` in the scripts
//! directory, run as `<script> <mode> <group> <locale>`, or in-process
//! callbacks registered on the `PluginHost`. Every plugin is notified once
//! per switch and a failure is reported without stopping the others.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::types::SwitchContext;

/// File name prefix of discoverable plugin scripts
pub const SCRIPT_PREFIX: &str = "switch_";

/// Errors raised by one plugin
#[derive(Debug)]
pub enum PluginError {
    Spawn(io::Error),
    Exit { code: Option<i32>, stderr: String },
    Callback(String),
}

impl std::fmt::Display for PluginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginError::Spawn(e) => write!(f, "could not run script: {}", e),
            PluginError::Exit { code: Some(code), stderr } => {
                write!(f, "script exited with status {}: {}", code, stderr.trim())
            }
            PluginError::Exit { code: None, stderr } => {
                write!(f, "script terminated by signal: {}", stderr.trim())
            }
            PluginError::Callback(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for PluginError {}

/// Something to notify after every committed switch
pub trait SwitchPlugin: Send + Sync {
    fn id(&self) -> String;

    fn on_switch(&self, ctx: &SwitchContext) -> Result<(), PluginError>;
}

/// A `switch_*` executable run as a subprocess
#[derive(Debug, Clone)]
pub struct ScriptPlugin {
    path: PathBuf,
}

impl ScriptPlugin {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Find `switch_*` files in `dir`, sorted by name
    ///
    /// A missing directory yields no scripts.
    pub fn discover<P: AsRef<Path>>(dir: P) -> io::Result<Vec<ScriptPlugin>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let is_script = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(SCRIPT_PREFIX))
                .unwrap_or(false);
            if is_script && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths.into_iter().map(ScriptPlugin::new).collect())
    }
}

impl SwitchPlugin for ScriptPlugin {
    fn id(&self) -> String {
        self.path.display().to_string()
    }

    fn on_switch(&self, ctx: &SwitchContext) -> Result<(), PluginError> {
        debug!(script = %self.path.display(), "running switch script");
        let output = Command::new(&self.path)
            .arg(ctx.mode.as_str())
            .arg(&ctx.group)
            .arg(&ctx.locale)
            .output()
            .map_err(PluginError::Spawn)?;

        if output.status.success() {
            Ok(())
        } else {
            Err(PluginError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            })
        }
    }
}

/// An in-process callback plugin
pub struct FnPlugin<F> {
    id: String,
    callback: F,
}

impl<F> FnPlugin<F>
where
    F: Fn(&SwitchContext) -> Result<(), String> + Send + Sync,
{
    pub fn new(id: impl Into<String>, callback: F) -> Self {
        Self {
            id: id.into(),
            callback,
        }
    }
}

impl<F> SwitchPlugin for FnPlugin<F>
where
    F: Fn(&SwitchContext) -> Result<(), String> + Send + Sync,
{
    fn id(&self) -> String {
        self.id.clone()
    }

    fn on_switch(&self, ctx: &SwitchContext) -> Result<(), PluginError> {
        (self.callback)(ctx).map_err(PluginError::Callback)
    }
}

/// What happened to one plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PluginOutcome {
    Ok,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginReport {
    #[serde(rename = "scriptId")]
    pub script_id: String,
    #[serde(flatten)]
    pub outcome: PluginOutcome,
}

impl PluginReport {
    pub fn is_ok(&self) -> bool {
        self.outcome == PluginOutcome::Ok
    }
}

/// Registered callbacks plus scripts discovered at notification time
#[derive(Default)]
pub struct PluginHost {
    scripts_dir: Option<PathBuf>,
    plugins: Vec<Box<dyn SwitchPlugin>>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also run `switch_*` scripts found in `dir` on every notification
    pub fn with_scripts_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            scripts_dir: Some(dir.as_ref().to_path_buf()),
            plugins: Vec::new(),
        }
    }

    pub fn register(&mut self, plugin: Box<dyn SwitchPlugin>) -> &mut Self {
        self.plugins.push(plugin);
        self
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Notify every plugin of a switch and report each outcome
    ///
    /// Scripts run first, in file name order, then registered callbacks in
    /// registration order.
    pub fn notify_plugins(&self, ctx: &SwitchContext) -> Vec<PluginReport> {
        let mut reports = Vec::new();

        let scripts = match &self.scripts_dir {
            Some(dir) => match ScriptPlugin::discover(dir) {
                Ok(scripts) => scripts,
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "could not scan for switch scripts");
                    reports.push(PluginReport {
                        script_id: dir.display().to_string(),
                        outcome: PluginOutcome::Failed {
                            error: e.to_string(),
                        },
                    });
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        for script in &scripts {
            reports.push(Self::notify_one(script, ctx));
        }
        for plugin in &self.plugins {
            reports.push(Self::notify_one(plugin.as_ref(), ctx));
        }

        reports
    }

    fn notify_one(plugin: &dyn SwitchPlugin, ctx: &SwitchContext) -> PluginReport {
        let script_id = plugin.id();
        let outcome = match plugin.on_switch(ctx) {
            Ok(()) => {
                info!(plugin = %script_id, "notified plugin");
                PluginOutcome::Ok
            }
            Err(e) => {
                warn!(plugin = %script_id, error = %e, "plugin failed");
                PluginOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        PluginReport { script_id, outcome }
    }
}
