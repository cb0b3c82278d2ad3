//! Template registry commands

mod add_template;
mod list_templates;
mod remove_template;

pub use add_template::AddTemplateCommand;
pub use list_templates::ListTemplatesCommand;
pub use remove_template::RemoveTemplateCommand;
