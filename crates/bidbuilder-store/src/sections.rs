//! CRUD operations for [`ProposalSection`] records.

use bidbuilder_shared::{ProposalId, SectionId, UserId};
use rusqlite::params;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::ProposalSection;
use crate::row;

impl Database {
    pub fn insert_section(
        &self,
        proposal_id: ProposalId,
        title: &str,
        content: &str,
        is_sensitive: bool,
    ) -> Result<ProposalSection> {
        self.conn().execute(
            "INSERT INTO proposal_sections (proposal_id, title, content, is_sensitive)
             VALUES (?1, ?2, ?3, ?4)",
            params![proposal_id, title, content, is_sensitive],
        )?;
        self.get_section(self.conn().last_insert_rowid())
    }

    pub fn get_section(&self, id: SectionId) -> Result<ProposalSection> {
        Ok(self.conn().query_row(
            "SELECT id, proposal_id, title, content, is_sensitive, assigned_user_id
             FROM proposal_sections WHERE id = ?1",
            params![id],
            row_to_section,
        )?)
    }

    /// Sections of a proposal in creation order.
    pub fn list_sections(&self, proposal_id: ProposalId) -> Result<Vec<ProposalSection>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, proposal_id, title, content, is_sensitive, assigned_user_id
             FROM proposal_sections
             WHERE proposal_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![proposal_id], row_to_section)?;
        Ok(row::collect(rows)?)
    }

    /// Point the section at a new assignee.
    pub fn set_section_assignee(&self, id: SectionId, user_id: UserId) -> Result<ProposalSection> {
        let affected = self.conn().execute(
            "UPDATE proposal_sections SET assigned_user_id = ?2 WHERE id = ?1",
            params![id, user_id],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        self.get_section(id)
    }
}

fn row_to_section(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProposalSection> {
    Ok(ProposalSection {
        id: row.get(0)?,
        proposal_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        is_sensitive: row.get(4)?,
        assigned_user_id: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProposal;
    use bidbuilder_shared::Role;

    #[test]
    fn sections_keep_insertion_order_and_assignee() {
        let db = Database::open_in_memory().unwrap();
        let mgr = db.create_user("mgr", "m@x.io", "h", Role::Manager).unwrap();
        let usr = db.create_user("usr", "u@x.io", "h", Role::User).unwrap();
        let p = db
            .insert_proposal(
                mgr.id,
                &NewProposal {
                    title: "A".into(),
                    ..Default::default()
                },
                None,
            )
            .unwrap();

        let first = db.insert_section(p.id, "Exec Summary", "", false).unwrap();
        db.insert_section(p.id, "Pricing", "secret", true).unwrap();

        let titles: Vec<_> = db
            .list_sections(p.id)
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["Exec Summary", "Pricing"]);

        let assigned = db.set_section_assignee(first.id, usr.id).unwrap();
        assert_eq!(assigned.assigned_user_id, Some(usr.id));
        assert!(matches!(
            db.set_section_assignee(999, usr.id),
            Err(StoreError::NotFound)
        ));
    }
}
