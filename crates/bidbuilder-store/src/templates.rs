//! CRUD operations for [`Template`] records.

use bidbuilder_shared::TemplateId;
use chrono::Utc;
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::{NewTemplate, Template};
use crate::row;

const TEMPLATE_COLUMNS: &str = "id, name, category, description, sections, estimated_value,
     timeline, usage_count, content, created_at";

impl Database {
    /// Insert a template. A duplicate name yields [`StoreError::Conflict`].
    pub fn insert_template(&self, template: &NewTemplate) -> Result<Template> {
        self.conn().execute(
            "INSERT INTO templates (name, category, description, sections, estimated_value,
                 timeline, usage_count, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8)",
            params![
                template.name,
                template.category,
                template.description,
                serde_json::to_string(&template.sections)?,
                template.estimated_value,
                template.timeline,
                template.content,
                Utc::now().to_rfc3339(),
            ],
        )?;
        self.get_template(self.conn().last_insert_rowid())
    }

    pub fn get_template(&self, id: TemplateId) -> Result<Template> {
        Ok(self.conn().query_row(
            &format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?1"),
            params![id],
            row_to_template,
        )?)
    }

    /// Templates ordered by popularity, then name.
    pub fn list_templates(&self) -> Result<Vec<Template>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates ORDER BY usage_count DESC, name ASC"
        ))?;
        let rows = stmt.query_map([], row_to_template)?;
        Ok(row::collect(rows)?)
    }

    /// Replace every editable field. The usage counter is preserved.
    pub fn update_template(&self, id: TemplateId, template: &NewTemplate) -> Result<Template> {
        let affected = self.conn().execute(
            "UPDATE templates
             SET name = ?2, category = ?3, description = ?4, sections = ?5,
                 estimated_value = ?6, timeline = ?7, content = ?8
             WHERE id = ?1",
            params![
                id,
                template.name,
                template.category,
                template.description,
                serde_json::to_string(&template.sections)?,
                template.estimated_value,
                template.timeline,
                template.content,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_template(id)
    }

    pub fn delete_template(&self, id: TemplateId) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    /// Bump the usage counter by one.
    pub fn increment_template_usage(&self, id: TemplateId) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE templates SET usage_count = usage_count + 1 WHERE id = ?1",
            params![id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

fn row_to_template(row: &rusqlite::Row<'_>) -> rusqlite::Result<Template> {
    Ok(Template {
        id: row.get(0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        sections: row::json(row, 4)?,
        estimated_value: row.get(5)?,
        timeline: row.get(6)?,
        usage_count: row.get(7)?,
        content: row.get(8)?,
        created_at: row::timestamp(row, 9)?,
    })
}
