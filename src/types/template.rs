//! Template registry row

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{SwitchError, SwitchResult};
use super::switch::WILDCARD_GROUP;

/// Required suffix for registered template files
pub const TEMPLATE_SUFFIX: &str = ".jinja";

/// A registered template and the group it re-renders for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JinjaTemplate {
    pub id: Uuid,
    pub path: String,
    #[serde(default = "default_group")]
    pub group: String,
}

fn default_group() -> String {
    WILDCARD_GROUP.to_string()
}

impl JinjaTemplate {
    /// Create a template row after validating the path
    pub fn new(path: impl Into<String>, group: impl Into<String>) -> SwitchResult<Self> {
        let path = path.into();
        validate_template_path(&path)?;
        Ok(Self {
            id: Uuid::new_v4(),
            path,
            group: group.into(),
        })
    }

    /// Whether this template re-renders on a switch of `group`
    ///
    /// `*` on either side matches everything; otherwise the comparison
    /// ignores case.
    pub fn matches_group(&self, group: &str) -> bool {
        self.group == WILDCARD_GROUP
            || group == WILDCARD_GROUP
            || self.group.to_lowercase() == group.to_lowercase()
    }

    pub fn template_path(&self) -> &Path {
        Path::new(&self.path)
    }

    /// Rendered output goes next to the template with `.jinja` stripped
    pub fn output_path(&self) -> PathBuf {
        output_path_for(self.template_path())
    }
}

/// Check that a path follows the `*.jinja` naming convention
pub fn validate_template_path(path: &str) -> SwitchResult<()> {
    let stem_len = path.len().saturating_sub(TEMPLATE_SUFFIX.len());
    if !path.ends_with(TEMPLATE_SUFFIX) || stem_len == 0 {
        return Err(SwitchError::InvalidInput(format!(
            "template path '{}' must end with {}",
            path, TEMPLATE_SUFFIX
        )));
    }
    Ok(())
}

pub fn output_path_for(template: &Path) -> PathBuf {
    template.with_extension("")
}
