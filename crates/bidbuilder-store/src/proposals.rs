//! CRUD operations for [`Proposal`] records.

use bidbuilder_shared::constants::DEFAULT_PROPOSAL_STATUS;
use bidbuilder_shared::{ProposalId, TemplateId, UserId};
use chrono::Utc;
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;
use crate::models::{NewProposal, Proposal, ProposalChanges};
use crate::row;

const PROPOSAL_COLUMNS: &str = "p.id, p.title, p.description, p.category, p.status, p.owner_id,
     p.assigned_by_manager_id, p.return_to_manager_id, p.template_id, p.estimated_value,
     p.timeline, p.priority, p.requirements, p.client_name, p.created_at, p.updated_at";

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a proposal owned by `owner_id`. The status defaults to
    /// `Draft` when the caller supplies none.
    pub fn insert_proposal(
        &self,
        owner_id: UserId,
        fields: &NewProposal,
        template_id: Option<TemplateId>,
    ) -> Result<Proposal> {
        let now = Utc::now().to_rfc3339();
        let status = fields
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_PROPOSAL_STATUS);

        self.conn().execute(
            "INSERT INTO proposals (title, description, category, status, owner_id, template_id,
                 estimated_value, timeline, priority, requirements, client_name,
                 created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
            params![
                fields.title,
                fields.description,
                fields.category,
                status,
                owner_id,
                template_id,
                fields.estimated_value,
                fields.timeline,
                fields.priority,
                fields.requirements,
                fields.client_name,
                now,
            ],
        )?;

        self.get_proposal(self.conn().last_insert_rowid())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    pub fn get_proposal(&self, id: ProposalId) -> Result<Proposal> {
        Ok(self.conn().query_row(
            &format!("SELECT {PROPOSAL_COLUMNS} FROM proposals p WHERE p.id = ?1"),
            params![id],
            row_to_proposal,
        )?)
    }

    /// Proposals currently owned by `owner_id`, newest first.
    pub fn list_proposals_owned_by(&self, owner_id: UserId) -> Result<Vec<Proposal>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {PROPOSAL_COLUMNS} FROM proposals p
             WHERE p.owner_id = ?1
             ORDER BY p.created_at DESC, p.id DESC"
        ))?;
        let rows = stmt.query_map(params![owner_id], row_to_proposal)?;
        Ok(row::collect(rows)?)
    }

    /// Case-insensitive substring search over the description of, and the
    /// section content within, proposals owned by `owner_id`.
    pub fn search_proposals_owned_by(&self, owner_id: UserId, query: &str) -> Result<Vec<Proposal>> {
        let pattern = format!("%{}%", escape_like(&query.to_lowercase()));
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {PROPOSAL_COLUMNS} FROM proposals p
             WHERE p.owner_id = ?1
               AND (lower(p.description) LIKE ?2 ESCAPE '\\'
                    OR EXISTS (SELECT 1 FROM proposal_sections s
                               WHERE s.proposal_id = p.id
                                 AND lower(s.content) LIKE ?2 ESCAPE '\\'))
             ORDER BY p.created_at DESC, p.id DESC"
        ))?;
        let rows = stmt.query_map(params![owner_id, pattern], row_to_proposal)?;
        Ok(row::collect(rows)?)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Apply the `Some` fields of `changes`.
    pub fn update_proposal(&self, id: ProposalId, changes: &ProposalChanges) -> Result<Proposal> {
        let affected = self.conn().execute(
            "UPDATE proposals SET
                 title           = COALESCE(?2, title),
                 description     = COALESCE(?3, description),
                 category        = COALESCE(?4, category),
                 estimated_value = COALESCE(?5, estimated_value),
                 timeline        = COALESCE(?6, timeline),
                 priority        = COALESCE(?7, priority),
                 requirements    = COALESCE(?8, requirements),
                 client_name     = COALESCE(?9, client_name),
                 updated_at      = ?10
             WHERE id = ?1",
            params![
                id,
                changes.title,
                changes.description,
                changes.category,
                changes.estimated_value,
                changes.timeline,
                changes.priority,
                changes.requirements,
                changes.client_name,
                Utc::now().to_rfc3339(),
            ],
        )?;
        if affected == 0 {
            return Err(crate::StoreError::NotFound);
        }
        self.get_proposal(id)
    }

    /// Overwrite the status label. No transition rules are applied.
    pub fn set_proposal_status(&self, id: ProposalId, status: &str) -> Result<Proposal> {
        let affected = self.conn().execute(
            "UPDATE proposals SET status = ?2, updated_at = ?3 WHERE id = ?1",
            params![id, status, Utc::now().to_rfc3339()],
        )?;
        if affected == 0 {
            return Err(crate::StoreError::NotFound);
        }
        self.get_proposal(id)
    }

    /// Hand the proposal from `manager_id` to `user_id`, recording the
    /// manager both as the assigner and as the return target.
    pub fn reassign_proposal(
        &self,
        id: ProposalId,
        user_id: UserId,
        manager_id: UserId,
    ) -> Result<Proposal> {
        let affected = self.conn().execute(
            "UPDATE proposals
             SET owner_id = ?2, assigned_by_manager_id = ?3, return_to_manager_id = ?3,
                 updated_at = ?4
             WHERE id = ?1",
            params![id, user_id, manager_id, Utc::now().to_rfc3339()],
        )?;
        if affected == 0 {
            return Err(crate::StoreError::NotFound);
        }
        self.get_proposal(id)
    }

    /// Give ownership back to `manager_id` and clear the return target.
    pub fn return_proposal(&self, id: ProposalId, manager_id: UserId) -> Result<Proposal> {
        let affected = self.conn().execute(
            "UPDATE proposals
             SET owner_id = ?2, return_to_manager_id = NULL, updated_at = ?3
             WHERE id = ?1",
            params![id, manager_id, Utc::now().to_rfc3339()],
        )?;
        if affected == 0 {
            return Err(crate::StoreError::NotFound);
        }
        self.get_proposal(id)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a proposal. Sections, comments and chat messages go with it.
    /// Returns `true` if a row was deleted.
    pub fn delete_proposal(&self, id: ProposalId) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM proposals WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn row_to_proposal(row: &rusqlite::Row<'_>) -> rusqlite::Result<Proposal> {
    Ok(Proposal {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        status: row.get(4)?,
        owner_id: row.get(5)?,
        assigned_by_manager_id: row.get(6)?,
        return_to_manager_id: row.get(7)?,
        template_id: row.get(8)?,
        estimated_value: row.get(9)?,
        timeline: row.get(10)?,
        priority: row.get(11)?,
        requirements: row.get(12)?,
        client_name: row.get(13)?,
        created_at: row::timestamp(row, 14)?,
        updated_at: row::timestamp(row, 15)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bidbuilder_shared::Role;

    fn setup() -> (Database, UserId, UserId) {
        let db = Database::open_in_memory().unwrap();
        let manager = db.create_user("mgr", "m@x.io", "h", Role::Manager).unwrap();
        let user = db.create_user("usr", "u@x.io", "h", Role::User).unwrap();
        (db, manager.id, user.id)
    }

    fn new_proposal(title: &str, description: &str) -> NewProposal {
        NewProposal {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    #[test]
    fn insert_defaults_status_to_draft() {
        let (db, mgr, _) = setup();
        let p = db.insert_proposal(mgr, &new_proposal("A", "desc"), None).unwrap();
        assert_eq!(p.status, "Draft");
        assert_eq!(p.owner_id, mgr);
        assert_eq!(p.return_to_manager_id, None);
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let (db, mgr, _) = setup();
        let p = db.insert_proposal(mgr, &new_proposal("A", "desc"), None).unwrap();
        let changes = ProposalChanges {
            client_name: Some("ACME".into()),
            ..Default::default()
        };
        let updated = db.update_proposal(p.id, &changes).unwrap();
        assert_eq!(updated.client_name.as_deref(), Some("ACME"));
        assert_eq!(updated.title, "A");
        assert_eq!(updated.description, "desc");
    }

    #[test]
    fn reassign_and_return_round_trip() {
        let (db, mgr, usr) = setup();
        let p = db.insert_proposal(mgr, &new_proposal("A", ""), None).unwrap();

        let moved = db.reassign_proposal(p.id, usr, mgr).unwrap();
        assert_eq!(moved.owner_id, usr);
        assert_eq!(moved.assigned_by_manager_id, Some(mgr));
        assert_eq!(moved.return_to_manager_id, Some(mgr));

        let back = db.return_proposal(p.id, mgr).unwrap();
        assert_eq!(back.owner_id, mgr);
        assert_eq!(back.return_to_manager_id, None);
        assert_eq!(back.assigned_by_manager_id, Some(mgr));
    }

    #[test]
    fn search_is_scoped_and_case_insensitive() {
        let (db, mgr, usr) = setup();
        db.insert_proposal(mgr, &new_proposal("A", "Cloud MIGRATION plan"), None)
            .unwrap();
        db.insert_proposal(mgr, &new_proposal("B", "CRM rollout"), None)
            .unwrap();
        db.insert_proposal(usr, &new_proposal("C", "cloud for someone else"), None)
            .unwrap();

        let hits = db.search_proposals_owned_by(mgr, "cloud").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "A");
    }

    #[test]
    fn search_matches_section_content_and_escapes_wildcards() {
        let (db, mgr, _) = setup();
        let p = db.insert_proposal(mgr, &new_proposal("A", "nothing here"), None).unwrap();
        db.insert_section(p.id, "Pricing", "Discount of 10% applies", false)
            .unwrap();
        db.insert_proposal(mgr, &new_proposal("B", "100 percent"), None)
            .unwrap();

        let hits = db.search_proposals_owned_by(mgr, "10%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, p.id);
    }

    #[test]
    fn delete_cascades_to_children() {
        let (db, mgr, _) = setup();
        let p = db.insert_proposal(mgr, &new_proposal("A", ""), None).unwrap();
        db.insert_section(p.id, "Intro", "", false).unwrap();
        db.insert_comment(p.id, None, mgr, "hello").unwrap();
        db.insert_chat_message(p.id, mgr, "hi", true).unwrap();

        assert!(db.delete_proposal(p.id).unwrap());
        assert!(!db.delete_proposal(p.id).unwrap());

        for table in ["proposal_sections", "comments", "proposal_chat_messages"] {
            let n: i64 = db
                .conn()
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
                .unwrap();
            assert_eq!(n, 0, "{table} should be empty");
        }
    }
}
