//! Append-only proposal chat.

use bidbuilder_shared::{ProposalId, UserId};
use chrono::Utc;
use rusqlite::params;

use crate::database::Database;
use crate::error::Result;
use crate::models::ChatMessage;
use crate::row;

impl Database {
    pub fn insert_chat_message(
        &self,
        proposal_id: ProposalId,
        sender_id: UserId,
        content: &str,
        visible_to_user: bool,
    ) -> Result<ChatMessage> {
        let now = Utc::now();
        self.conn().execute(
            "INSERT INTO proposal_chat_messages
                 (proposal_id, sender_id, content, visible_to_user, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![proposal_id, sender_id, content, visible_to_user, now.to_rfc3339()],
        )?;

        Ok(ChatMessage {
            id: self.conn().last_insert_rowid(),
            proposal_id,
            sender_id,
            content: content.to_string(),
            visible_to_user,
            created_at: now,
        })
    }

    /// Messages in send order. With `only_visible` set, messages flagged
    /// hidden at write time are skipped.
    pub fn list_chat_messages(
        &self,
        proposal_id: ProposalId,
        only_visible: bool,
    ) -> Result<Vec<ChatMessage>> {
        let mut stmt = self.conn().prepare(
            "SELECT id, proposal_id, sender_id, content, visible_to_user, created_at
             FROM proposal_chat_messages
             WHERE proposal_id = ?1 AND (?2 = 0 OR visible_to_user = 1)
             ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![proposal_id, only_visible], |row| {
            Ok(ChatMessage {
                id: row.get(0)?,
                proposal_id: row.get(1)?,
                sender_id: row.get(2)?,
                content: row.get(3)?,
                visible_to_user: row.get(4)?,
                created_at: row::timestamp(row, 5)?,
            })
        })?;
        Ok(row::collect(rows)?)
    }
}
