//! Template Registry - `.jinja` files re-rendered after a switch

use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::types::{validate_template_path, JinjaTemplate, SwitchError, SwitchResult};

const SELECT_TEMPLATES: &str = "SELECT id, path, group_name FROM jinja_templates";

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn decode((id, path, group): (String, String, String)) -> SwitchResult<JinjaTemplate> {
    let id = Uuid::parse_str(&id)
        .map_err(|e| SwitchError::Corrupt(format!("template id '{}': {}", id, e)))?;
    Ok(JinjaTemplate { id, path, group })
}

/// The template registry inside one transaction
pub struct TemplateRegistry<'c> {
    conn: &'c Connection,
}

impl<'c> TemplateRegistry<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Insert a template row
    ///
    /// Fails with `InvalidInput` for a path without the `.jinja` suffix and
    /// with `Duplicate` when the id or path is already registered.
    pub fn add(&self, template: &JinjaTemplate) -> SwitchResult<()> {
        validate_template_path(&template.path)?;
        self.conn
            .execute(
                "INSERT INTO jinja_templates (id, path, group_name) VALUES (?1, ?2, ?3)",
                params![template.id.to_string(), template.path, template.group],
            )
            .map_err(|e| {
                SwitchError::from_insert(e, || {
                    format!("template with id {} or path {}", template.id, template.path)
                })
            })?;
        Ok(())
    }

    pub fn get(&self, id: &Uuid) -> SwitchResult<JinjaTemplate> {
        self.find_one(&format!("{} WHERE id = ?1", SELECT_TEMPLATES), &id.to_string())?
            .ok_or_else(|| SwitchError::NotFound(format!("template with id {}", id)))
    }

    pub fn get_by_path(&self, path: &str) -> SwitchResult<JinjaTemplate> {
        self.find_one(&format!("{} WHERE path = ?1", SELECT_TEMPLATES), path)?
            .ok_or_else(|| SwitchError::NotFound(format!("template with path {}", path)))
    }

    /// Remove the row for `path`; returns whether a row existed
    pub fn remove_by_path(&self, path: &str) -> SwitchResult<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM jinja_templates WHERE path = ?1", [path])?;
        Ok(deleted > 0)
    }

    /// Every registered template in insertion order
    pub fn list_all(&self) -> SwitchResult<Vec<JinjaTemplate>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY rowid", SELECT_TEMPLATES))?;
        let rows = stmt.query_map([], template_from_row)?;

        let mut templates = Vec::new();
        for row in rows {
            templates.push(decode(row?)?);
        }
        Ok(templates)
    }

    /// Templates that re-render on a switch of `group`
    ///
    /// Rows registered for `*` always match, other rows match the group
    /// case-insensitively, and a `*` switch matches every row.
    pub fn list_for_group(&self, group: &str) -> SwitchResult<Vec<JinjaTemplate>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|t| t.matches_group(group))
            .collect())
    }

    fn find_one(&self, sql: &str, key: &str) -> SwitchResult<Option<JinjaTemplate>> {
        let row = self
            .conn
            .query_row(sql, [key], template_from_row)
            .optional()?;
        row.map(decode).transpose()
    }
}
