//! Append-only [`Comment`] records.

use bidbuilder_shared::{ProposalId, SectionId, UserId};
use chrono::Utc;
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;
use crate::models::Comment;
use crate::row;

impl Database {
    pub fn insert_comment(
        &self,
        proposal_id: ProposalId,
        section_id: Option<SectionId>,
        user_id: UserId,
        content: &str,
    ) -> Result<Comment> {
        let now = Utc::now();
        self.conn().execute(
            "INSERT INTO comments (proposal_id, section_id, user_id, content, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![proposal_id, section_id, user_id, content, now.to_rfc3339()],
        )?;

        Ok(Comment {
            id: self.conn().last_insert_rowid(),
            proposal_id,
            section_id,
            user_id,
            content: content.to_string(),
            created_at: now,
        })
    }

    /// All comments on a proposal (including section comments), oldest first.
    pub fn list_comments(&self, proposal_id: ProposalId) -> Result<Vec<Comment>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, proposal_id, section_id, user_id, content, created_at
             FROM comments
             WHERE proposal_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let rows = stmt.query_map(params![proposal_id], |row| {
            Ok(Comment {
                id: row.get(0)?,
                proposal_id: row.get(1)?,
                section_id: row.get(2)?,
                user_id: row.get(3)?,
                content: row.get(4)?,
                created_at: row::timestamp(row, 5)?,
            })
        })?;
        Ok(row::collect(rows)?)
    }
}
