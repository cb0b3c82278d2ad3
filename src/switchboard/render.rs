//! Template rendering after a committed switch
//!
//! The switchboard only needs "render template T with this context"; the
//! `TemplateRenderer` trait is that seam. `JinjaRenderer` is the default
//! and writes the output next to the template with `.jinja` removed.

use std::fs;
use std::path::{Path, PathBuf};

use minijinja::Environment;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::types::{output_path_for, JinjaTemplate, SwitchContext};
use crate::utils::atomic_write;

/// Errors raised while rendering one template
#[derive(Debug)]
pub enum RenderError {
    Io(std::io::Error),
    Template(minijinja::Error),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "IO error: {}", e),
            RenderError::Template(e) => write!(f, "Template error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(e) => Some(e),
            RenderError::Template(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

impl From<minijinja::Error> for RenderError {
    fn from(e: minijinja::Error) -> Self {
        RenderError::Template(e)
    }
}

/// Renders one template file for a switch
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` with `ctx` and return the path written
    fn render(&self, template: &Path, ctx: &SwitchContext) -> Result<PathBuf, RenderError>;
}

/// Renderer backed by minijinja
///
/// Templates see the switch under `fie_lonet_switch.switch`, e.g.
/// `{{ fie_lonet_switch.switch.switch_to }}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JinjaRenderer;

impl JinjaRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render template source to a string without touching the filesystem
    pub fn render_source(&self, source: &str, ctx: &SwitchContext) -> Result<String, RenderError> {
        let env = Environment::new();
        let rendered = env.render_str(source, json!({ "fie_lonet_switch": { "switch": ctx } }))?;
        Ok(rendered)
    }
}

impl TemplateRenderer for JinjaRenderer {
    fn render(&self, template: &Path, ctx: &SwitchContext) -> Result<PathBuf, RenderError> {
        let source = fs::read_to_string(template)?;
        let rendered = self.render_source(&source, ctx)?;
        let output = output_path_for(template);
        atomic_write(&output, &rendered)?;
        Ok(output)
    }
}

/// What happened to one template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RenderOutcome {
    Rendered { output: PathBuf },
    /// The registered file does not exist
    Missing,
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderReport {
    pub template: String,
    #[serde(flatten)]
    pub outcome: RenderOutcome,
}

impl RenderReport {
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, RenderOutcome::Rendered { .. })
    }
}

/// Render every template, isolating failures per template
pub fn render_templates(
    renderer: &dyn TemplateRenderer,
    templates: &[JinjaTemplate],
    ctx: &SwitchContext,
) -> Vec<RenderReport> {
    templates
        .iter()
        .map(|tmpl| {
            let path = tmpl.template_path();
            let outcome = if !path.exists() {
                warn!(template = %tmpl.path, "template does not exist");
                RenderOutcome::Missing
            } else {
                match renderer.render(path, ctx) {
                    Ok(output) => {
                        info!(template = %tmpl.path, output = ?output, "rendered template");
                        RenderOutcome::Rendered { output }
                    }
                    Err(e) => {
                        warn!(template = %tmpl.path, error = %e, "failed to render template");
                        RenderOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                }
            };
            RenderReport {
                template: tmpl.path.clone(),
                outcome,
            }
        })
        .collect()
}
